// src/lib.rs

use sqlx::{Pool, Postgres};

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod funnel;
pub mod models;
pub mod package;
pub mod queries;
pub mod router;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
}
