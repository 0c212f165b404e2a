// src/queries/stats.rs

//! Summary metrics and chart series for the dashboard.
//!
//! Each endpoint's queries are independent reads and run concurrently; the
//! first failure fails the whole set.

use sqlx::PgPool;

use crate::filters::{Column, FilterCriteria, Predicate, WhereClause};
use crate::funnel::RoundDrop;
use crate::models::{
    Charts, CompanyCount, CompanyScore, GenderCount, StageProgress, Summary, YearCount,
};
use crate::package::{average_package, package_distribution};

pub const TOP_COMPANIES_LIMIT: i64 = 5;

const PLACED: &[Predicate] = &[Predicate::Placed];
const WITH_PACKAGE: &[Predicate] = &[Predicate::NotNull(Column::Package)];
const PLACED_WITH_PACKAGE: &[Predicate] = &[Predicate::Placed, Predicate::NotNull(Column::Package)];
const WITH_SCORE: &[Predicate] = &[Predicate::NotNull(Column::Cgpa)];

/// `SELECT COUNT(<counted>)`; `counted` is a fixed expression, never user input.
async fn count(
    pool: &PgPool,
    criteria: &FilterCriteria,
    additional: &[Predicate],
    counted: &'static str,
) -> Result<i64, sqlx::Error> {
    let filter = WhereClause::build(criteria, additional);
    let sql = format!("SELECT COUNT({counted}) FROM students {}", filter.to_sql());

    filter
        .bind_all_scalar(sqlx::query_scalar::<_, i64>(&sql))
        .fetch_one(pool)
        .await
}

/// Raw package text of matching rows; parsing happens in Rust.
async fn package_values(
    pool: &PgPool,
    criteria: &FilterCriteria,
    additional: &[Predicate],
) -> Result<Vec<String>, sqlx::Error> {
    let filter = WhereClause::build(criteria, additional);
    let sql = format!("SELECT package::text FROM students {}", filter.to_sql());

    filter
        .bind_all_scalar(sqlx::query_scalar::<_, String>(&sql))
        .fetch_all(pool)
        .await
}

pub async fn summary(pool: &PgPool, criteria: &FilterCriteria) -> Result<Summary, sqlx::Error> {
    let (placed, total, packages, companies) = tokio::try_join!(
        count(pool, criteria, PLACED, "*"),
        count(pool, criteria, &[], "*"),
        package_values(pool, criteria, WITH_PACKAGE),
        count(pool, criteria, PLACED, "DISTINCT company"),
    )?;

    Ok(Summary::new(placed, total, average_package(&packages), companies))
}

pub async fn gender_distribution(
    pool: &PgPool,
    criteria: &FilterCriteria,
) -> Result<Vec<GenderCount>, sqlx::Error> {
    let filter = WhereClause::build(criteria, &[]);
    let sql = format!(
        "SELECT gender, COUNT(*) AS count FROM students {} GROUP BY gender ORDER BY gender",
        filter.to_sql()
    );

    filter
        .bind_all(sqlx::query_as::<_, GenderCount>(&sql))
        .fetch_all(pool)
        .await
}

/// Highest average first; ties by company name.
pub async fn average_score_by_company(
    pool: &PgPool,
    criteria: &FilterCriteria,
) -> Result<Vec<CompanyScore>, sqlx::Error> {
    let filter = WhereClause::build(criteria, PLACED);
    let sql = format!(
        "SELECT company, ROUND(AVG(cgpa)::numeric, 2)::float8 AS avg_cgpa \
         FROM students {} \
         GROUP BY company \
         ORDER BY avg_cgpa DESC NULLS LAST, company",
        filter.to_sql()
    );

    filter
        .bind_all(sqlx::query_as::<_, CompanyScore>(&sql))
        .fetch_all(pool)
        .await
}

pub async fn top_companies(
    pool: &PgPool,
    criteria: &FilterCriteria,
) -> Result<Vec<CompanyCount>, sqlx::Error> {
    let filter = WhereClause::build(criteria, PLACED);
    let sql = format!(
        "SELECT company, COUNT(*) AS count \
         FROM students {} \
         GROUP BY company \
         ORDER BY COUNT(*) DESC, company \
         LIMIT {TOP_COMPANIES_LIMIT}",
        filter.to_sql()
    );

    filter
        .bind_all(sqlx::query_as::<_, CompanyCount>(&sql))
        .fetch_all(pool)
        .await
}

pub async fn round_drop(pool: &PgPool, criteria: &FilterCriteria) -> Result<RoundDrop, sqlx::Error> {
    let filter = WhereClause::build(criteria, WITH_SCORE);
    let sql = format!(
        "SELECT COALESCE(rounds, '{{}}'::text[]) AS rounds, cgpa::float8 AS cgpa FROM students {}",
        filter.to_sql()
    );

    let students = filter
        .bind_all(sqlx::query_as::<_, StageProgress>(&sql))
        .fetch_all(pool)
        .await?;

    Ok(RoundDrop::tally(&students))
}

pub async fn yearly_trends(
    pool: &PgPool,
    criteria: &FilterCriteria,
) -> Result<Vec<YearCount>, sqlx::Error> {
    let filter = WhereClause::build(criteria, PLACED);
    let sql = format!(
        "SELECT year::int4 AS year, COUNT(*) AS count \
         FROM students {} \
         GROUP BY year \
         ORDER BY year",
        filter.to_sql()
    );

    filter
        .bind_all(sqlx::query_as::<_, YearCount>(&sql))
        .fetch_all(pool)
        .await
}

pub async fn charts(pool: &PgPool, criteria: &FilterCriteria) -> Result<Charts, sqlx::Error> {
    let (gender_dist, avg_cgpa, top_companies, round_drop, yearly_trends, packages) = tokio::try_join!(
        gender_distribution(pool, criteria),
        average_score_by_company(pool, criteria),
        top_companies(pool, criteria),
        round_drop(pool, criteria),
        yearly_trends(pool, criteria),
        package_values(pool, criteria, PLACED_WITH_PACKAGE),
    )?;

    tracing::debug!(
        companies = avg_cgpa.len(),
        packages = packages.len(),
        "chart series computed"
    );

    Ok(Charts {
        gender_dist,
        avg_cgpa,
        top_companies,
        round_drop,
        yearly_trends,
        package_distribution: package_distribution(&packages),
    })
}
