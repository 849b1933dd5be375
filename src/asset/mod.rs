//! Map asset naming
//!
//! Derives the expected map filename from a selection. The name depends only
//! on the selection strings, never on the resolved record, and nothing here
//! checks whether the file exists.

pub mod store;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use store::{AssetStore, DirectoryAssetStore};

const COUNTY_SUFFIX: &str = " County";

/// Identifier of a map asset, e.g. `Mobile_AL_cat3.jpg`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// State name to postal abbreviation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateAbbreviations(BTreeMap<String, String>);

impl Default for StateAbbreviations {
    fn default() -> Self {
        Self::from_pairs([("Alabama", "AL"), ("Mississippi", "MS")])
    }
}

impl StateAbbreviations {
    /// Build a table from `(state, abbreviation)` pairs
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(state, abbr)| (state.to_string(), abbr.to_string()))
                .collect(),
        )
    }

    /// Add or replace one entry
    pub fn insert(&mut self, state: impl Into<String>, abbreviation: impl Into<String>) {
        self.0.insert(state.into(), abbreviation.into());
    }

    /// Merge `other` into this table, `other` winning on conflicts
    pub fn extend(&mut self, other: &Self) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Abbreviation for `state`; unknown states map to an empty string
    #[must_use]
    pub fn lookup(&self, state: &str) -> &str {
        self.0.get(state).map_or("", String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// County name as shown in titles and asset names
#[must_use]
pub fn display_county(county: &str, strip_county_suffix: bool) -> &str {
    if strip_county_suffix {
        county.strip_suffix(COUNTY_SUFFIX).unwrap_or(county)
    } else {
        county
    }
}

/// Every ASCII digit in `category`, in order
#[must_use]
pub fn category_digits(category: &str) -> String {
    category.chars().filter(char::is_ascii_digit).collect()
}

/// Derives asset identifiers from selections
#[derive(Debug, Clone, Default)]
pub struct ImagePathResolver {
    abbreviations: StateAbbreviations,
    strip_county_suffix: bool,
}

impl ImagePathResolver {
    #[must_use]
    pub const fn new(abbreviations: StateAbbreviations, strip_county_suffix: bool) -> Self {
        Self {
            abbreviations,
            strip_county_suffix,
        }
    }

    #[must_use]
    pub const fn strips_county_suffix(&self) -> bool {
        self.strip_county_suffix
    }

    #[must_use]
    pub const fn abbreviations(&self) -> &StateAbbreviations {
        &self.abbreviations
    }

    /// `{county}_{abbr}_cat{digits}.jpg` for the selection
    #[must_use]
    pub fn resolve_asset_id(&self, state: &str, county: &str, category: &str) -> AssetId {
        let county = display_county(county, self.strip_county_suffix);
        let abbr = self.abbreviations.lookup(state);
        if abbr.is_empty() {
            log::debug!("No abbreviation configured for state {state}");
        }
        AssetId(format!("{county}_{abbr}_cat{}.jpg", category_digits(category)))
    }
}
