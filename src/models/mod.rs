// src/models/mod.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::funnel::RoundDrop;
use crate::package::round_dp;

// ───────────────────────────────────────
// Table rows
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub gender: Option<String>,
    pub company: Option<String>,   // null or '' = not placed
    pub package: Option<String>,   // LPA, may be free text
    pub cgpa: Option<f64>,
    pub rounds: Vec<String>,       // cleared stages
}

/// The slice of a student the round-drop funnel looks at.
#[derive(Debug, Clone, FromRow)]
pub struct StageProgress {
    pub rounds: Vec<String>,
    pub cgpa: f64,
}

// ───────────────────────────────────────
// /students/options
// ───────────────────────────────────────
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub departments: Vec<String>,
    pub years: Vec<i32>,
    pub companies: Vec<String>,
}

// ───────────────────────────────────────
// /stats/summary
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub placed: i64,
    pub total_students: i64,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub avg_package: Option<Decimal>,
    pub companies: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub placement_rate: Decimal,   // percent, 1 decimal
}

impl Summary {
    pub fn new(placed: i64, total_students: i64, avg_package: Option<Decimal>, companies: i64) -> Self {
        Self {
            placed,
            total_students,
            avg_package,
            companies,
            placement_rate: placement_rate(placed, total_students),
        }
    }
}

pub fn placement_rate(placed: i64, total_students: i64) -> Decimal {
    if total_students <= 0 {
        return Decimal::ZERO;
    }
    let share = Decimal::from(placed) * Decimal::ONE_HUNDRED / Decimal::from(total_students);
    round_dp(share, 1)
}

// ───────────────────────────────────────
// /stats/charts
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct GenderCount {
    pub gender: Option<String>,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CompanyScore {
    pub company: String,
    pub avg_cgpa: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CompanyCount {
    pub company: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct YearCount {
    pub year: Option<i32>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageBandCount {
    pub range: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub gender_dist: Vec<GenderCount>,
    pub avg_cgpa: Vec<CompanyScore>,
    pub top_companies: Vec<CompanyCount>,
    pub round_drop: RoundDrop,
    pub yearly_trends: Vec<YearCount>,
    pub package_distribution: Vec<PackageBandCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::average_package;

    #[test]
    fn placement_rate_with_no_students_is_zero() {
        assert_eq!(placement_rate(0, 0), Decimal::ZERO);
        assert_eq!(Summary::new(0, 0, None, 0).placement_rate, Decimal::ZERO);
    }

    #[test]
    fn placement_rate_is_a_rounded_percentage() {
        assert_eq!(placement_rate(1, 3), Decimal::new(333, 1));
        assert_eq!(placement_rate(2, 2), Decimal::ONE_HUNDRED);
        assert_eq!(placement_rate(1, 8), Decimal::new(125, 1));
    }

    #[test]
    fn summary_for_one_placed_and_one_unplaced_student() {
        // Only the placed student has a package; the other row is filtered
        // out by `package IS NOT NULL` before averaging.
        let summary = Summary::new(1, 2, average_package(["5"]), 1);

        assert_eq!(summary.placed, 1);
        assert_eq!(summary.total_students, 2);
        assert_eq!(summary.avg_package, Some(Decimal::from(5)));
        assert_eq!(summary.companies, 1);
        assert_eq!(summary.placement_rate, Decimal::from(50));
    }

    #[test]
    fn summary_serializes_camel_case() {
        let json = serde_json::to_value(Summary::new(3, 10, None, 2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "placed": 3,
                "totalStudents": 10,
                "avgPackage": null,
                "companies": 2,
                "placementRate": 30.0
            })
        );
    }

    #[test]
    fn charts_serialize_with_dashboard_keys() {
        let charts = Charts {
            gender_dist: vec![GenderCount { gender: Some("F".into()), count: 4 }],
            avg_cgpa: vec![CompanyScore { company: "Acme".into(), avg_cgpa: Some(8.25) }],
            top_companies: vec![CompanyCount { company: "Acme".into(), count: 4 }],
            round_drop: RoundDrop::default(),
            yearly_trends: vec![YearCount { year: Some(2024), count: 4 }],
            package_distribution: vec![PackageBandCount { range: "8+".into(), count: 1 }],
        };
        let json = serde_json::to_value(&charts).unwrap();

        for key in ["genderDist", "avgCgpa", "topCompanies", "roundDrop", "yearlyTrends", "packageDistribution"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["avgCgpa"][0]["avg_cgpa"], 8.25);
        assert_eq!(json["packageDistribution"][0]["range"], "8+");
    }
}
