//! Cascading candidate lists
//!
//! The index is built once from the loaded records. Every list it hands out is
//! distinct and sorted lexicographically, and each level is keyed by the full
//! prefix above it, so changing the state never yields a stale county list.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{DatasetRecord, Selection, SelectionLevel};

type CategorySet = BTreeSet<String>;
type CountyMap = BTreeMap<String, CategorySet>;

/// Distinct, sorted candidates for each selection level
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    states: BTreeMap<String, CountyMap>,
}

impl DatasetIndex {
    /// Build the index from records in storage order
    #[must_use]
    pub fn build(records: &[DatasetRecord]) -> Self {
        let mut states: BTreeMap<String, CountyMap> = BTreeMap::new();
        for record in records {
            states
                .entry(record.state.clone())
                .or_default()
                .entry(record.county.clone())
                .or_default()
                .insert(record.category.clone());
        }
        Self { states }
    }

    /// Candidates for `level` given the higher levels of `selection`.
    ///
    /// The state list ignores the selection. County and category lists are
    /// empty until every level above them is set.
    #[must_use]
    pub fn candidates_for(&self, level: SelectionLevel, selection: &Selection) -> Vec<String> {
        match level {
            SelectionLevel::State => self.states(),
            SelectionLevel::County => selection
                .get(SelectionLevel::State)
                .map(|state| self.counties(state))
                .unwrap_or_default(),
            SelectionLevel::Category => {
                match (
                    selection.get(SelectionLevel::State),
                    selection.get(SelectionLevel::County),
                ) {
                    (Some(state), Some(county)) => self.categories(state, county),
                    _ => Vec::new(),
                }
            }
        }
    }

    /// All distinct states
    #[must_use]
    pub fn states(&self) -> Vec<String> {
        self.states.keys().cloned().collect()
    }

    /// Distinct counties within `state`
    #[must_use]
    pub fn counties(&self, state: &str) -> Vec<String> {
        self.states
            .get(state)
            .map(|counties| counties.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Distinct categories within `state` and `county`
    #[must_use]
    pub fn categories(&self, state: &str, county: &str) -> Vec<String> {
        self.states
            .get(state)
            .and_then(|counties| counties.get(county))
            .map(|categories| categories.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of distinct natural keys
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.states
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }
}
