// src/filters.rs

//! Filter criteria and the predicate builder shared by every reporting query.
//!
//! Filters arrive as optional query-string values. They are normalized into
//! [`FilterCriteria`], turned into typed [`Predicate`]s, and rendered by
//! [`WhereClause`] into a `WHERE` clause with numbered placeholders plus the
//! values to bind, in the same order. Nothing user-supplied is ever written
//! into the SQL text.

use serde::Deserialize;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// Legacy query-string value the dashboard sends for "no constraint".
const UNCONSTRAINED: &str = "All";

/// Raw `?department=&year=&company=&search=` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct StudentFilterParams {
    pub department: Option<String>,
    pub year: Option<String>,
    pub company: Option<String>,
    pub search: Option<String>,
}

/// Normalized filters: `None` means the dimension is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub department: Option<String>,
    pub year: Option<String>,
    pub company: Option<String>,
    pub search: Option<String>,
}

fn dimension(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.is_empty() && v != UNCONSTRAINED)
}

impl From<StudentFilterParams> for FilterCriteria {
    fn from(p: StudentFilterParams) -> Self {
        Self {
            department: dimension(p.department),
            year: dimension(p.year),
            company: dimension(p.company),
            search: p.search.filter(|s| !s.is_empty()),
        }
    }
}

impl FilterCriteria {
    /// Filter-derived predicates, in fixed order: department, year, company, search.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(department) = &self.department {
            out.push(Predicate::Equals { column: Column::Department, value: department.clone() });
        }
        if let Some(year) = &self.year {
            out.push(Predicate::Equals { column: Column::Year, value: year.clone() });
        }
        if let Some(company) = &self.company {
            out.push(Predicate::Equals { column: Column::Company, value: company.clone() });
        }
        if let Some(search) = &self.search {
            out.push(Predicate::Contains { column: Column::Name, term: search.clone() });
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Department,
    Year,
    Company,
    Name,
    Package,
    Cgpa,
}

impl Column {
    pub fn as_sql(self) -> &'static str {
        match self {
            Column::Department => "department",
            Column::Year => "year",
            Column::Company => "company",
            Column::Name => "name",
            Column::Package => "package",
            Column::Cgpa => "cgpa",
        }
    }

    /// Expression compared against a text bind value.
    fn as_text(self) -> &'static str {
        match self {
            // year is numeric in the table; a text comparison lets a
            // non-numeric filter value match nothing instead of failing.
            Column::Year => "CAST(year AS TEXT)",
            other => other.as_sql(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = $n`
    Equals { column: Column, value: String },
    /// Case-insensitive substring match: `column ILIKE $n`.
    Contains { column: Column, term: String },
    /// Student has a non-null, non-empty company.
    Placed,
    NotNull(Column),
}

impl Predicate {
    /// The value this predicate binds, if any.
    pub fn bind_value(&self) -> Option<String> {
        match self {
            Predicate::Equals { value, .. } => Some(value.clone()),
            Predicate::Contains { term, .. } => Some(format!("%{}%", escape_like(term))),
            Predicate::Placed | Predicate::NotNull(_) => None,
        }
    }

    /// Render with `$index` as the placeholder; ignored by predicates that bind nothing.
    pub fn render(&self, index: usize) -> String {
        match self {
            Predicate::Equals { column, .. } => format!("{} = ${index}", column.as_text()),
            Predicate::Contains { column, .. } => format!("{} ILIKE ${index}", column.as_sql()),
            Predicate::Placed => "company IS NOT NULL AND company <> ''".to_string(),
            Predicate::NotNull(column) => format!("{} IS NOT NULL", column.as_sql()),
        }
    }
}

/// Escape LIKE wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Rendered predicate list plus the positionally-aligned bind values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    clauses: Vec<String>,
    binds: Vec<String>,
}

impl WhereClause {
    /// Filter predicates first, then `additional`, all ANDed together.
    pub fn build(criteria: &FilterCriteria, additional: &[Predicate]) -> Self {
        let mut out = Self::default();
        for predicate in criteria.predicates().iter().chain(additional) {
            let index = out.binds.len() + 1;
            out.clauses.push(predicate.render(index));
            if let Some(value) = predicate.bind_value() {
                out.binds.push(value);
            }
        }
        out
    }

    #[cfg(test)]
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    /// `WHERE a AND b ...`, or an empty string when there is nothing to filter on.
    pub fn to_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn bind_all<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for value in &self.binds {
            q = q.bind(value.as_str());
        }
        q
    }

    pub fn bind_all_scalar<'q, O>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for value in &self.binds {
            q = q.bind(value.as_str());
        }
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(department: &str, year: &str, company: &str, search: &str) -> StudentFilterParams {
        let opt = |s: &str| if s == "-" { None } else { Some(s.to_string()) };
        StudentFilterParams {
            department: opt(department),
            year: opt(year),
            company: opt(company),
            search: opt(search),
        }
    }

    #[test]
    fn all_empty_or_absent_never_produce_clauses() {
        for raw in ["All", "", "-"] {
            let criteria = FilterCriteria::from(params(raw, raw, raw, if raw == "All" { "" } else { raw }));
            assert_eq!(criteria, FilterCriteria::default());
            let clause = WhereClause::build(&criteria, &[]);
            assert!(clause.clauses().is_empty());
            assert!(clause.binds().is_empty());
            assert_eq!(clause.to_sql(), "");
        }
    }

    #[test]
    fn all_in_search_is_a_literal_term() {
        let criteria = FilterCriteria::from(params("-", "-", "-", "All"));
        assert_eq!(criteria.search.as_deref(), Some("All"));
    }

    #[test]
    fn filters_render_in_fixed_order_with_aligned_placeholders() {
        let criteria = FilterCriteria::from(params("CSE", "2024", "Acme", "ann"));
        let clause = WhereClause::build(&criteria, &[]);

        assert_eq!(
            clause.clauses(),
            &[
                "department = $1".to_string(),
                "CAST(year AS TEXT) = $2".to_string(),
                "company = $3".to_string(),
                "name ILIKE $4".to_string(),
            ]
        );
        assert_eq!(clause.binds(), &["CSE", "2024", "Acme", "%ann%"]);
    }

    #[test]
    fn every_filter_combination_keeps_binds_aligned() {
        for mask in 0u8..16 {
            let pick = |bit: u8, value: &str| {
                if mask & (1 << bit) != 0 { value.to_string() } else { "All".to_string() }
            };
            let criteria = FilterCriteria::from(StudentFilterParams {
                department: Some(pick(0, "ECE")),
                year: Some(pick(1, "2023")),
                company: Some(pick(2, "Globex")),
                search: Some(if mask & 8 != 0 { "li".into() } else { String::new() }),
            });
            let clause = WhereClause::build(&criteria, &[]);

            assert_eq!(clause.clauses().len(), mask.count_ones() as usize);
            assert_eq!(clause.binds().len(), clause.clauses().len());
            for (i, sql) in clause.clauses().iter().enumerate() {
                assert!(sql.ends_with(&format!("${}", i + 1)), "clause {sql} at {i}");
            }
        }
    }

    #[test]
    fn additional_predicates_follow_filters_and_bind_nothing() {
        let criteria = FilterCriteria::from(params("IT", "-", "-", "-"));
        let clause = WhereClause::build(
            &criteria,
            &[Predicate::Placed, Predicate::NotNull(Column::Package)],
        );

        assert_eq!(
            clause.to_sql(),
            "WHERE department = $1 AND company IS NOT NULL AND company <> '' AND package IS NOT NULL"
        );
        assert_eq!(clause.binds(), &["IT"]);
    }

    #[test]
    fn additional_predicates_alone_still_emit_where() {
        let clause = WhereClause::build(&FilterCriteria::default(), &[Predicate::NotNull(Column::Cgpa)]);
        assert_eq!(clause.to_sql(), "WHERE cgpa IS NOT NULL");
        assert!(clause.binds().is_empty());
    }

    #[test]
    fn search_values_are_bound_never_interpolated() {
        let criteria = FilterCriteria::from(params("-", "-", "-", "x'; DROP TABLE students; --"));
        let clause = WhereClause::build(&criteria, &[]);

        assert_eq!(clause.to_sql(), "WHERE name ILIKE $1");
        assert_eq!(clause.binds(), &["%x'; DROP TABLE students; --%"]);
    }

    #[test]
    fn like_wildcards_in_search_match_literally() {
        let criteria = FilterCriteria::from(params("-", "-", "-", "50%_off\\"));
        let clause = WhereClause::build(&criteria, &[]);
        assert_eq!(clause.binds(), &["%50\\%\\_off\\\\%"]);
    }
}
