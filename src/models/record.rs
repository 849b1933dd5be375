//! Dataset row model
//!
//! One `DatasetRecord` per row of the losses table. Columns that only the rich
//! dataset variant carries are modelled as `Option` fields instead of being
//! probed at runtime.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::models::selection::RecordKey;

/// Number of ranked industry slots a row can carry
pub const INDUSTRY_SLOTS: usize = 5;

/// Which column set the dataset was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetVariant {
    /// `inundation_zone` category column with county denominators and industry slots
    Rich,
    /// `SLOSH` category column with zone counts and weekly dollars only
    Simple,
}

impl DatasetVariant {
    /// Name of the column holding the category label
    #[must_use]
    pub const fn category_column(self) -> &'static str {
        match self {
            Self::Rich => "inundation_zone",
            Self::Simple => "SLOSH",
        }
    }

    /// Whether asset names drop a trailing `" County"` when not configured explicitly
    #[must_use]
    pub const fn strips_county_suffix(self) -> bool {
        matches!(self, Self::Rich)
    }
}

/// One pre-ranked industry group affected within the zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustrySlot {
    /// Source rank, 1 through 5
    pub rank: u8,
    /// Four-digit NAICS industry group code
    pub naics_code: Option<u32>,
    /// Industry group label; an empty slot has none
    pub group_label: Option<String>,
    /// Employment in this group inside the zone
    pub group_employment: Option<u64>,
}

impl IndustrySlot {
    /// Create a populated slot
    #[must_use]
    pub fn new(rank: u8, naics_code: u32, group_label: &str, group_employment: u64) -> Self {
        Self {
            rank,
            naics_code: Some(naics_code),
            group_label: Some(group_label.to_string()),
            group_employment: Some(group_employment),
        }
    }

    /// Create a slot with no industry at this rank
    #[must_use]
    pub const fn empty(rank: u8) -> Self {
        Self {
            rank,
            naics_code: None,
            group_label: None,
            group_employment: None,
        }
    }

    /// The label, if the slot holds an industry
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.group_label.as_deref().filter(|label| !label.trim().is_empty())
    }
}

/// One row of the source table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub state: String,
    pub county: String,
    /// Inundation or storm-category label
    pub category: String,
    /// Establishments inside the zone
    pub establishments: u64,
    /// Jobs inside the zone
    pub employment: u64,
    /// County-wide establishment count
    pub county_establishments: Option<u64>,
    /// County-wide employment count
    pub county_employment: Option<u64>,
    /// Weekly wages at zone establishments, in dollars
    pub wages_per_week: f64,
    /// Weekly sales at zone establishments, in dollars
    pub sales_per_week: f64,
    /// Total employment in the zone, the industry-share denominator
    pub total_zone_employment: Option<u64>,
    /// Industry slots in source rank order
    pub industry_slots: SmallVec<[IndustrySlot; INDUSTRY_SLOTS]>,
}

impl DatasetRecord {
    /// Create a record with zeroed figures and no optional columns
    #[must_use]
    pub fn new(state: &str, county: &str, category: &str) -> Self {
        Self {
            state: state.to_string(),
            county: county.to_string(),
            category: category.to_string(),
            establishments: 0,
            employment: 0,
            county_establishments: None,
            county_employment: None,
            wages_per_week: 0.0,
            sales_per_week: 0.0,
            total_zone_employment: None,
            industry_slots: SmallVec::new(),
        }
    }

    /// Set zone establishment and employment counts
    #[must_use]
    pub fn with_zone_counts(mut self, establishments: u64, employment: u64) -> Self {
        self.establishments = establishments;
        self.employment = employment;
        self
    }

    /// Set county-wide denominators
    #[must_use]
    pub fn with_county_totals(mut self, establishments: u64, employment: u64) -> Self {
        self.county_establishments = Some(establishments);
        self.county_employment = Some(employment);
        self
    }

    /// Set weekly wage and sales exposure
    #[must_use]
    pub fn with_weekly_dollars(mut self, wages: f64, sales: f64) -> Self {
        self.wages_per_week = wages;
        self.sales_per_week = sales;
        self
    }

    /// Set the zone employment denominator
    #[must_use]
    pub fn with_zone_employment(mut self, total: u64) -> Self {
        self.total_zone_employment = Some(total);
        self
    }

    /// Append an industry slot
    #[must_use]
    pub fn with_slot(mut self, slot: IndustrySlot) -> Self {
        self.industry_slots.push(slot);
        self
    }

    /// The slot stored for `rank`, if any
    #[must_use]
    pub fn slot(&self, rank: u8) -> Option<&IndustrySlot> {
        self.industry_slots.iter().find(|slot| slot.rank == rank)
    }

    /// Whether this row matches the given natural key exactly
    #[must_use]
    pub fn matches(&self, state: &str, county: &str, category: &str) -> bool {
        self.state == state && self.county == county && self.category == category
    }

    /// Owned natural key of this row
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.state, &self.county, &self.category)
    }
}
