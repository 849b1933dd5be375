//! Selection keys
//!
//! A `Selection` is the partial key a caller builds level by level. Lower
//! levels only mean something once the levels above them are fixed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ImpactError, Result};

/// One level of the cascading selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionLevel {
    State,
    County,
    Category,
}

impl SelectionLevel {
    /// All levels from the top down
    pub const ALL: [Self; 3] = [Self::State, Self::County, Self::Category];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::County => "county",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for SelectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A partial or complete selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub state: Option<String>,
    pub county: Option<String>,
    pub category: Option<String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the state level
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Fix the county level
    #[must_use]
    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    /// Fix the category level
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Value at `level`, treating empty strings as unset
    #[must_use]
    pub fn get(&self, level: SelectionLevel) -> Option<&str> {
        let value = match level {
            SelectionLevel::State => self.state.as_deref(),
            SelectionLevel::County => self.county.as_deref(),
            SelectionLevel::Category => self.category.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// The first level still to be chosen, honouring the cascade.
    ///
    /// A county without a state does not count as chosen.
    #[must_use]
    pub fn next_level(&self) -> Option<SelectionLevel> {
        SelectionLevel::ALL
            .into_iter()
            .find(|level| self.get(*level).is_none())
    }

    /// Whether all three levels are set
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_level().is_none()
    }

    /// Convert into a full key, failing on the first missing level
    pub fn to_key(&self) -> Result<RecordKey> {
        match self.next_level() {
            Some(level) => Err(ImpactError::IncompleteSelection {
                missing: level.name(),
            }),
            None => Ok(RecordKey::new(
                self.get(SelectionLevel::State).unwrap_or_default(),
                self.get(SelectionLevel::County).unwrap_or_default(),
                self.get(SelectionLevel::Category).unwrap_or_default(),
            )),
        }
    }
}

/// A fully specified natural key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub state: String,
    pub county: String,
    pub category: String,
}

impl RecordKey {
    #[must_use]
    pub fn new(state: &str, county: &str, category: &str) -> Self {
        Self {
            state: state.to_string(),
            county: county.to_string(),
            category: category.to_string(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.state, self.county, self.category)
    }
}

impl From<RecordKey> for Selection {
    fn from(key: RecordKey) -> Self {
        Self {
            state: Some(key.state),
            county: Some(key.county),
            category: Some(key.category),
        }
    }
}
