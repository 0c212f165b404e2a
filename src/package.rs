// src/package.rs

//! Package (LPA) normalization and banding.
//!
//! The `package` column may hold free text. Values are only counted when they
//! are a plain non-negative decimal such as `7` or `12.5`; anything else is
//! treated as absent.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PackageBandCount;

/// Parse a package value, or `None` if it is not a plain decimal number.
pub fn parse_package(raw: &str) -> Option<Decimal> {
    let value = raw.trim();
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.map_or(true, all_digits) {
        return None;
    }
    Decimal::from_str(value).ok()
}

/// Mean of the parseable packages, rounded to 2 decimals (half away from zero).
pub fn average_package<I, S>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sum = Decimal::ZERO;
    let mut count = 0i64;
    for value in values.into_iter().filter_map(|v| parse_package(v.as_ref())) {
        sum = sum.checked_add(value)?;
        count += 1;
    }

    if count == 0 {
        return None;
    }
    sum.checked_div(Decimal::from(count)).map(|avg| round_dp(avg, 2))
}

/// Round half away from zero, the way Postgres rounds `NUMERIC`.
pub fn round_dp(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageBand {
    Below2,
    From2To4,
    From4To6,
    From6To8,
    From8,
}

impl PackageBand {
    pub const ALL: [PackageBand; 5] = [
        PackageBand::Below2,
        PackageBand::From2To4,
        PackageBand::From4To6,
        PackageBand::From6To8,
        PackageBand::From8,
    ];

    /// Exclusive upper bound; `None` for the open-ended top band.
    fn upper_bound(self) -> Option<Decimal> {
        match self {
            PackageBand::Below2 => Some(Decimal::from(2)),
            PackageBand::From2To4 => Some(Decimal::from(4)),
            PackageBand::From4To6 => Some(Decimal::from(6)),
            PackageBand::From6To8 => Some(Decimal::from(8)),
            PackageBand::From8 => None,
        }
    }

    /// Lower bounds are inclusive, upper bounds exclusive.
    pub fn of(value: Decimal) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| band.upper_bound().map_or(true, |upper| value < upper))
            .unwrap_or(PackageBand::From8)
    }

    pub fn label(self) -> &'static str {
        match self {
            PackageBand::Below2 => "Below 2",
            PackageBand::From2To4 => "2 - 4",
            PackageBand::From4To6 => "4 - 6",
            PackageBand::From6To8 => "6 - 8",
            PackageBand::From8 => "8+",
        }
    }
}

/// Count parseable packages per band, in ascending band order.
///
/// Bands nobody falls into are left out.
pub fn package_distribution<I, S>(values: I) -> Vec<PackageBandCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts: BTreeMap<PackageBand, i64> = BTreeMap::new();
    for value in values.into_iter().filter_map(|v| parse_package(v.as_ref())) {
        *counts.entry(PackageBand::of(value)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(band, count)| PackageBandCount { range: band.label().to_string(), count })
        .collect()
}
