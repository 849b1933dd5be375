//! Error handling for dataset loading and selection resolution.

pub mod util;

use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Specialized error type for the impact engine
#[derive(Debug, Error)]
pub enum ImpactError {
    /// The dataset could not be opened or parsed
    #[error("Data source unavailable at {}: {reason}", .path.display())]
    DataSourceUnavailable { path: PathBuf, reason: String },

    /// The dataset lacks a column every variant requires
    #[error("Data source {} is missing required column '{column}'", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// No record matches a fully specified selection
    #[error("No data for {county}, {state} ({category})")]
    NotFound {
        state: String,
        county: String,
        category: String,
    },

    /// More than one record matches and the match policy is strict
    #[error("{count} records match {county}, {state} ({category})")]
    AmbiguousMatch {
        state: String,
        county: String,
        category: String,
        count: usize,
    },

    /// A selection was resolved before all three levels were chosen
    #[error("Selection is incomplete: missing {missing}")]
    IncompleteSelection { missing: &'static str },

    /// The asset store could not deliver an asset
    #[error("Asset {asset} unavailable: {reason}")]
    AssetUnavailable { asset: String, reason: String },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImpactError {
    /// Create a data source error for `path`
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataSourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the session can continue after this error.
    ///
    /// Load failures are fatal to the session; a bad selection is not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::AmbiguousMatch { .. }
                | Self::IncompleteSelection { .. }
                | Self::AssetUnavailable { .. }
        )
    }
}

/// Result type for impact engine operations
pub type Result<T> = std::result::Result<T, ImpactError>;
