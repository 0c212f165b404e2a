// src/queries/students.rs

use sqlx::PgPool;

use crate::filters::{FilterCriteria, WhereClause};
use crate::models::{FilterOptions, Student};

/// Column list for `students` SELECTs, cast to the types `Student` decodes.
const COLUMNS: &str = "\
    id::bigint AS id, name, department, year::int4 AS year, gender, company, \
    package::text AS package, cgpa::float8 AS cgpa, \
    COALESCE(rounds, '{}'::text[]) AS rounds";

pub async fn list(pool: &PgPool, criteria: &FilterCriteria) -> Result<Vec<Student>, sqlx::Error> {
    let filter = WhereClause::build(criteria, &[]);
    let sql = format!("SELECT {COLUMNS} FROM students {} ORDER BY id", filter.to_sql());

    filter
        .bind_all(sqlx::query_as::<_, Student>(&sql))
        .fetch_all(pool)
        .await
}

/// Distinct values of each filter dimension across the whole table.
pub async fn options(pool: &PgPool) -> Result<FilterOptions, sqlx::Error> {
    let (departments, years, companies) = tokio::try_join!(
        sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT department FROM students
               WHERE department IS NOT NULL AND department <> ''
               ORDER BY department"#,
        )
        .fetch_all(pool),
        sqlx::query_scalar::<_, i32>(
            r#"SELECT DISTINCT year::int4 FROM students WHERE year IS NOT NULL ORDER BY 1"#,
        )
        .fetch_all(pool),
        sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT company FROM students
               WHERE company IS NOT NULL AND company <> ''
               ORDER BY company"#,
        )
        .fetch_all(pool),
    )?;

    Ok(FilterOptions { departments, years, companies })
}
