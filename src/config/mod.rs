//! Configuration for the impact engine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asset::{ImagePathResolver, StateAbbreviations};
use crate::error::util::safe_read_to_string;
use crate::error::{ImpactError, Result};
use crate::models::DatasetVariant;
use crate::resolver::MatchPolicy;

/// Default dataset file name
pub const DEFAULT_DATA_PATH: &str = "Expected losses by county and zone.csv";
/// Default directory holding the map images
pub const DEFAULT_ASSET_DIR: &str = "Inundation Maps";

/// Configuration for the impact engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dataset to load, CSV or Parquet
    pub data_path: PathBuf,
    /// Directory the map assets are served from
    pub asset_dir: PathBuf,
    /// Strip a trailing `" County"` from asset names; `None` follows the dataset variant
    pub strip_county_suffix: Option<bool>,
    /// How to treat keys that match more than one row
    pub match_policy: MatchPolicy,
    /// Extra or overriding state abbreviations, merged over the built-in table
    pub state_abbreviations: StateAbbreviations,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            strip_county_suffix: None,
            match_policy: MatchPolicy::default(),
            state_abbreviations: StateAbbreviations::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "reading configuration")
            .map_err(|e| ImpactError::Config(e.to_string()))?;
        Self::from_json_str(&content)
            .map_err(|e| ImpactError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut config: Self =
            serde_json::from_str(content).map_err(|e| ImpactError::Config(e.to_string()))?;

        // User entries extend the built-in table rather than replacing it
        let mut abbreviations = StateAbbreviations::default();
        abbreviations.extend(&config.state_abbreviations);
        config.state_abbreviations = abbreviations;
        Ok(config)
    }

    /// Effective suffix policy for a dataset variant
    #[must_use]
    pub fn strip_county_suffix_for(&self, variant: DatasetVariant) -> bool {
        self.strip_county_suffix
            .unwrap_or_else(|| variant.strips_county_suffix())
    }

    /// Asset name resolver for a dataset variant
    #[must_use]
    pub fn image_path_resolver(&self, variant: DatasetVariant) -> ImagePathResolver {
        ImagePathResolver::new(
            self.state_abbreviations.clone(),
            self.strip_county_suffix_for(variant),
        )
    }
}
