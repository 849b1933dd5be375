//! Asset store collaborator
//!
//! Existence checks and delivery of map images live behind this trait. The
//! engine only computes identifiers; shells decide how to fetch them.

use std::fs;
use std::path::PathBuf;

use crate::asset::AssetId;
use crate::error::{ImpactError, Result};

/// Source of map image bytes keyed by asset id
pub trait AssetStore: std::fmt::Debug {
    /// Whether the asset can be delivered
    fn exists(&self, asset: &AssetId) -> bool;

    /// Read the asset bytes
    fn read(&self, asset: &AssetId) -> Result<Vec<u8>>;

    /// Where the asset is expected, for messages
    fn location(&self, asset: &AssetId) -> String;
}

/// Assets stored as files in one directory
#[derive(Debug, Clone)]
pub struct DirectoryAssetStore {
    root: PathBuf,
}

impl DirectoryAssetStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path an asset is expected at
    #[must_use]
    pub fn path_for(&self, asset: &AssetId) -> PathBuf {
        self.root.join(asset.as_str())
    }
}

impl AssetStore for DirectoryAssetStore {
    fn exists(&self, asset: &AssetId) -> bool {
        self.path_for(asset).is_file()
    }

    fn read(&self, asset: &AssetId) -> Result<Vec<u8>> {
        let path = self.path_for(asset);
        fs::read(&path).map_err(|e| ImpactError::AssetUnavailable {
            asset: asset.to_string(),
            reason: format!("{}: {e}", path.display()),
        })
    }

    fn location(&self, asset: &AssetId) -> String {
        self.path_for(asset).display().to_string()
    }
}
