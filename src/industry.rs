//! Ranked industry groups
//!
//! The source already ranks the affected industry groups. Slots are read in
//! fixed rank order and never re-sorted; an empty slot is skipped without
//! renumbering the ones after it.

use serde::{Deserialize, Serialize};

use crate::impact::rounded_percent;
use crate::models::{DatasetRecord, INDUSTRY_SLOTS};

/// One populated industry slot with its share of zone employment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedIndustry {
    /// Source slot rank, gaps preserved
    pub rank: u8,
    pub naics_code: Option<u32>,
    pub group_label: String,
    /// Share of total zone employment, whole percent
    pub pct_of_zone_employment: u64,
}

/// Rank the populated industry slots of `record`
#[must_use]
pub fn rank_industries(record: &DatasetRecord) -> Vec<RankedIndustry> {
    let max_rank = u8::try_from(INDUSTRY_SLOTS).unwrap_or(u8::MAX);

    (1..=max_rank)
        .filter_map(|rank| record.slot(rank))
        .filter_map(|slot| {
            let label = slot.label()?;
            Some(RankedIndustry {
                rank: slot.rank,
                naics_code: slot.naics_code,
                group_label: label.to_string(),
                pct_of_zone_employment: rounded_percent(
                    slot.group_employment.unwrap_or(0),
                    record.total_zone_employment,
                ),
            })
        })
        .collect()
}
