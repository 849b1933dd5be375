//! Record resolution
//!
//! Finds the row matching a fully specified `(state, county, category)` key.
//! Matching is exact and case-sensitive. When the dataset holds more than one
//! row for a key the outcome is decided by [`MatchPolicy`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ImpactError, Result};
use crate::models::{DatasetRecord, RecordKey};

/// Row positions for each natural key, in storage order
pub type KeyIndex = FxHashMap<RecordKey, Vec<usize>>;

/// What to do when a key matches several rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Return the first row in storage order and log a warning
    #[default]
    FirstMatch,
    /// Fail with `AmbiguousMatch`
    Strict,
}

/// Build a key index over `records`
#[must_use]
pub fn build_key_index(records: &[DatasetRecord]) -> KeyIndex {
    let mut index = KeyIndex::default();
    for (position, record) in records.iter().enumerate() {
        index.entry(record.key()).or_default().push(position);
    }
    index
}

/// Resolves a full selection key to a single record
#[derive(Debug, Clone, Copy)]
pub struct RecordResolver<'a> {
    records: &'a [DatasetRecord],
    key_index: Option<&'a KeyIndex>,
    policy: MatchPolicy,
}

impl<'a> RecordResolver<'a> {
    /// Resolver that scans `records` on every lookup
    #[must_use]
    pub const fn new(records: &'a [DatasetRecord], policy: MatchPolicy) -> Self {
        Self {
            records,
            key_index: None,
            policy,
        }
    }

    /// Use a prebuilt key index instead of scanning
    #[must_use]
    pub fn with_key_index(mut self, key_index: &'a KeyIndex) -> Self {
        self.key_index = Some(key_index);
        self
    }

    /// Positions of every row matching the key, in storage order
    #[must_use]
    pub fn matching_rows(&self, state: &str, county: &str, category: &str) -> Vec<usize> {
        if let Some(index) = self.key_index {
            return index
                .get(&RecordKey::new(state, county, category))
                .cloned()
                .unwrap_or_default();
        }

        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.matches(state, county, category))
            .map(|(position, _)| position)
            .collect()
    }

    /// Resolve the record for a full key.
    ///
    /// All three components must be non-empty.
    pub fn resolve(&self, state: &str, county: &str, category: &str) -> Result<&'a DatasetRecord> {
        for (value, level) in [(state, "state"), (county, "county"), (category, "category")] {
            if value.is_empty() {
                return Err(ImpactError::IncompleteSelection { missing: level });
            }
        }

        let rows = self.matching_rows(state, county, category);
        let Some(&first) = rows.first() else {
            return Err(ImpactError::NotFound {
                state: state.to_string(),
                county: county.to_string(),
                category: category.to_string(),
            });
        };

        if rows.len() > 1 {
            match self.policy {
                MatchPolicy::Strict => {
                    return Err(ImpactError::AmbiguousMatch {
                        state: state.to_string(),
                        county: county.to_string(),
                        category: category.to_string(),
                        count: rows.len(),
                    });
                }
                MatchPolicy::FirstMatch => {
                    log::warn!(
                        "{} rows match {state} / {county} / {category}, using row {first}",
                        rows.len()
                    );
                }
            }
        }

        log::debug!("Resolved {state} / {county} / {category} to row {first}");
        self.records.get(first).ok_or_else(|| ImpactError::NotFound {
            state: state.to_string(),
            county: county.to_string(),
            category: category.to_string(),
        })
    }

    /// Resolve using an owned key
    pub fn resolve_key(&self, key: &RecordKey) -> Result<&'a DatasetRecord> {
        self.resolve(&key.state, &key.county, &key.category)
    }
}
