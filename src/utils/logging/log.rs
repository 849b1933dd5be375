//! Log lines for dataset loading and map lookup
//!
//! A load emits one start line and one summary line. Data quality problems
//! found on the way are reported as warnings next to the summary.

use std::path::Path;
use std::time::Duration;

use crate::asset::AssetId;
use crate::models::DatasetVariant;

/// Counts gathered while loading one dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub variant: DatasetVariant,
    /// Rows kept after dropping rows with empty keys
    pub rows: usize,
    pub skipped_rows: usize,
    /// Distinct state/county/category keys
    pub distinct_keys: usize,
    /// Keys with more than one row
    pub duplicate_keys: usize,
}

impl LoadSummary {
    /// Whether the load found nothing worth a warning
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.skipped_rows == 0 && self.duplicate_keys == 0
    }
}

pub fn log_load_start(path: &Path) {
    log::info!("Loading dataset from {}", path.display());
}

/// Log the outcome of a successful load
///
/// # Arguments
/// * `path` - Source file of the dataset
/// * `summary` - Counts gathered while loading
/// * `elapsed` - Time spent reading and indexing
pub fn log_load_summary(path: &Path, summary: &LoadSummary, elapsed: Duration) {
    log::info!(
        "Loaded {} rows ({} keys, {:?} variant) from {} in {:?}",
        summary.rows,
        summary.distinct_keys,
        summary.variant,
        path.display(),
        elapsed
    );

    if summary.is_clean() {
        return;
    }
    if summary.skipped_rows > 0 {
        log::warn!(
            "Skipped {} rows with an empty state, county or category in {}",
            summary.skipped_rows,
            path.display()
        );
    }
    if summary.duplicate_keys > 0 {
        log::warn!(
            "{} state/county/category keys occur more than once in {}",
            summary.duplicate_keys,
            path.display()
        );
    }
}

/// Log a map image the asset store cannot deliver
pub fn log_missing_asset(asset: &AssetId, location: &str) {
    log::warn!("Map file not found for {asset}: {location}");
}
