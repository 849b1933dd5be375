//! Economic exposure of businesses in coastal inundation zones.
//!
//! Narrows a losses table by state, county and storm category, resolves the
//! matching row and derives the impact figures, the ranked industry groups
//! and the expected map asset name for it.

pub mod asset;
pub mod config;
pub mod dataset;
pub mod error;
pub mod impact;
pub mod index;
pub mod industry;
pub mod loader;
pub mod models;
pub mod report;
pub mod resolver;
pub mod utils;

// Re-export the most common types for easier use
pub use asset::{AssetId, AssetStore, DirectoryAssetStore, ImagePathResolver, StateAbbreviations};
pub use config::EngineConfig;
pub use dataset::{Dataset, DatasetCache};
pub use error::{ImpactError, Result};
pub use impact::{ImpactSummary, compute_impact};
pub use index::DatasetIndex;
pub use industry::{RankedIndustry, rank_industries};
pub use models::{DatasetRecord, DatasetVariant, IndustrySlot, RecordKey, Selection, SelectionLevel};
pub use report::{ImpactReport, SelectionOutcome, evaluate};
pub use resolver::{MatchPolicy, RecordResolver};
