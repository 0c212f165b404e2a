// src/queries/mod.rs

//! Read-only queries against the `students` table.
//!
//! Every query takes the request's [`FilterCriteria`](crate::filters::FilterCriteria)
//! and builds its `WHERE` clause through [`WhereClause`](crate::filters::WhereClause).

pub mod stats;
pub mod students;
