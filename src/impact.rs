//! Impact figures for a resolved record
//!
//! Rounding is half away from zero throughout (`f64::round`). Percentages are
//! whole numbers; dollar figures are millions with one decimal place. A missing
//! or zero denominator yields 0, never an error.

use serde::{Deserialize, Serialize};

use crate::models::DatasetRecord;

const DOLLARS_PER_MILLION: f64 = 1_000_000.0;

/// Percentage and monetary exposure derived from one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    /// Share of county establishments inside the zone
    pub pct_establishments: u64,
    /// Share of county jobs inside the zone
    pub pct_employment: u64,
    /// One week of lost wages, in millions of dollars
    pub lost_wages_millions: f64,
    /// One week of lost sales, in millions of dollars
    pub lost_sales_millions: f64,
}

impl ImpactSummary {
    /// Whether both percentages fall in `[0, 100]`.
    ///
    /// Values are never clamped, so source rows with zone counts above the
    /// county totals show up here.
    #[must_use]
    pub const fn percentages_in_range(&self) -> bool {
        self.pct_establishments <= 100 && self.pct_employment <= 100
    }
}

/// Compute the impact summary for `record`
#[must_use]
pub fn compute_impact(record: &DatasetRecord) -> ImpactSummary {
    ImpactSummary {
        pct_establishments: rounded_percent(record.establishments, record.county_establishments),
        pct_employment: rounded_percent(record.employment, record.county_employment),
        lost_wages_millions: round_millions(record.wages_per_week),
        lost_sales_millions: round_millions(record.sales_per_week),
    }
}

/// `part / whole * 100` rounded to a whole number, or 0 without a positive denominator
#[must_use]
pub fn rounded_percent(part: u64, whole: Option<u64>) -> u64 {
    match whole {
        Some(whole) if whole > 0 => {
            // Scale before dividing so exact ratios stay exact
            let pct = (part as f64 * 100.0 / whole as f64).round();
            if pct.is_finite() { pct as u64 } else { 0 }
        }
        _ => 0,
    }
}

/// Dollars to millions, rounded to one decimal place.
///
/// Divides by 100,000 first so that the tie case (e.g. 350,000 → 3.5) is an
/// exact float and rounds away from zero.
#[must_use]
pub fn round_millions(dollars: f64) -> f64 {
    if !dollars.is_finite() || dollars <= 0.0 {
        return 0.0;
    }
    (dollars / (DOLLARS_PER_MILLION / 10.0)).round() / 10.0
}

/// Round an already-scaled value to one decimal place
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
