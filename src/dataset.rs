//! Loaded dataset and its process-wide cache
//!
//! A `Dataset` is built once from its source file and never mutated. The
//! cache loads it on first use and hands out the same `Arc` for the rest of
//! the process. Only callers racing the first load wait on a lock.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::index::DatasetIndex;
use crate::loader::load_table;
use crate::models::{DatasetRecord, DatasetVariant, RecordKey, Selection, SelectionLevel};
use crate::resolver::{KeyIndex, MatchPolicy, RecordResolver, build_key_index};
use crate::utils::logging::{LoadSummary, log_load_start, log_load_summary};

/// Immutable, indexed dataset
#[derive(Debug)]
pub struct Dataset {
    source: PathBuf,
    variant: DatasetVariant,
    records: Vec<DatasetRecord>,
    index: DatasetIndex,
    key_index: KeyIndex,
    duplicate_keys: usize,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Load and index the dataset at `path`
    pub fn load(path: &Path) -> Result<Self> {
        log_load_start(path);
        let start = Instant::now();

        let table = load_table(path)?;
        let dataset = Self::from_records(path, table.variant, table.records);

        let summary = LoadSummary {
            variant: dataset.variant,
            rows: dataset.len(),
            skipped_rows: table.skipped_rows,
            distinct_keys: dataset.index.key_count(),
            duplicate_keys: dataset.duplicate_keys,
        };
        log_load_summary(path, &summary, start.elapsed());
        Ok(dataset)
    }

    /// Index records that are already in memory
    #[must_use]
    pub fn from_records(
        source: impl Into<PathBuf>,
        variant: DatasetVariant,
        records: Vec<DatasetRecord>,
    ) -> Self {
        let index = DatasetIndex::build(&records);
        let key_index = build_key_index(&records);
        let duplicate_keys = key_index.values().filter(|rows| rows.len() > 1).count();

        Self {
            source: source.into(),
            variant,
            records,
            index,
            key_index,
            duplicate_keys,
            loaded_at: Utc::now(),
        }
    }

    /// The process-wide dataset.
    ///
    /// The first successful call loads `path`. Later calls return the dataset
    /// already loaded, even if they name a different path. A failed load
    /// binds nothing, so a later call may load another path.
    pub fn shared(path: &Path) -> Result<Arc<Self>> {
        static SHARED: LoadOnce = LoadOnce::new();

        let dataset = SHARED.get_or_load(path)?;
        if dataset.source() != path {
            log::warn!(
                "Dataset already bound to {}, ignoring {}",
                dataset.source().display(),
                path.display()
            );
        }
        Ok(dataset)
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub const fn variant(&self) -> DatasetVariant {
        self.variant
    }

    /// Records in storage order
    #[must_use]
    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn index(&self) -> &DatasetIndex {
        &self.index
    }

    /// Number of natural keys shared by more than one row
    #[must_use]
    pub const fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }

    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Candidates for the given level under `selection`
    #[must_use]
    pub fn candidates_for(&self, level: SelectionLevel, selection: &Selection) -> Vec<String> {
        self.index.candidates_for(level, selection)
    }

    /// Resolver backed by this dataset's key index
    #[must_use]
    pub fn resolver(&self, policy: MatchPolicy) -> RecordResolver<'_> {
        RecordResolver::new(&self.records, policy).with_key_index(&self.key_index)
    }

    /// Resolve a complete selection
    pub fn resolve(&self, selection: &Selection, policy: MatchPolicy) -> Result<&DatasetRecord> {
        let key: RecordKey = selection.to_key()?;
        self.resolver(policy).resolve_key(&key)
    }
}

/// Slot filled by the first successful load.
///
/// Loads are serialized, so concurrent callers wait for the one in flight
/// instead of reading the file themselves.
#[derive(Debug)]
struct LoadOnce {
    cell: OnceLock<Arc<Dataset>>,
    loading: Mutex<()>,
}

impl LoadOnce {
    const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }

    fn get(&self) -> Option<Arc<Dataset>> {
        self.cell.get().map(Arc::clone)
    }

    fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.get() {
            return Ok(dataset);
        }

        // A panicked loader stored nothing, so the guard is still usable
        let _guard = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = self.get() {
            return Ok(dataset);
        }

        let loaded = Arc::new(Dataset::load(path)?);
        Ok(Arc::clone(self.cell.get_or_init(|| loaded)))
    }
}

/// Load-once cache for the dataset at one path.
///
/// A failed load is returned to the caller and nothing is stored, so the next
/// `get` tries again only if the caller asks it to.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    slot: LoadOnce,
}

impl DatasetCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: LoadOnce::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The cached dataset, loading it on first use
    pub fn get(&self) -> Result<Arc<Dataset>> {
        self.slot.get_or_load(&self.path)
    }
}
