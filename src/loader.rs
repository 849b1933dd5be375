//! Tabular dataset loading
//!
//! Reads the losses table from CSV or Parquet into Arrow record batches,
//! adapts the known columns to canonical types and deserializes each row with
//! `serde_arrow`. Columns a variant does not carry come through as `None`.

use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, StringArray};
use arrow::datatypes::Float64Type;
use arrow::compute::kernels::cast::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use smallvec::SmallVec;

use crate::error::util::safe_open_file;
use crate::error::{ImpactError, Result};
use crate::models::{DatasetRecord, DatasetVariant, INDUSTRY_SLOTS, IndustrySlot};

/// Source column holding the state name
pub const STATE_COLUMN: &str = "State";
/// Source column holding the county name
pub const COUNTY_COLUMN: &str = "County";

/// Records read from one source file
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub variant: DatasetVariant,
    pub records: Vec<DatasetRecord>,
    /// Rows dropped because a key column was empty
    pub skipped_rows: usize,
}

/// Canonical type a source column is adapted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Number,
}

impl ColumnKind {
    const fn data_type(self) -> DataType {
        match self {
            Self::Text => DataType::Utf8,
            Self::Number => DataType::Float64,
        }
    }
}

/// Mapping from a source column to its canonical name and type
#[derive(Debug, Clone)]
struct ColumnSpec {
    source: String,
    target: String,
    kind: ColumnKind,
}

impl ColumnSpec {
    fn new(source: impl Into<String>, target: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

fn column_specs(variant: DatasetVariant) -> Vec<ColumnSpec> {
    let mut specs = vec![
        ColumnSpec::new(STATE_COLUMN, "state", ColumnKind::Text),
        ColumnSpec::new(COUNTY_COLUMN, "county", ColumnKind::Text),
        ColumnSpec::new(variant.category_column(), "category", ColumnKind::Text),
        ColumnSpec::new("Establishments", "establishments", ColumnKind::Number),
        ColumnSpec::new("Employment", "employment", ColumnKind::Number),
        ColumnSpec::new("wages_week", "wages_week", ColumnKind::Number),
        ColumnSpec::new("sales_week", "sales_week", ColumnKind::Number),
    ];

    if variant == DatasetVariant::Rich {
        specs.extend([
            ColumnSpec::new("county_establishments", "county_establishments", ColumnKind::Number),
            ColumnSpec::new("county_employment", "county_employment", ColumnKind::Number),
            ColumnSpec::new("baEMP", "zone_employment", ColumnKind::Number),
        ]);
        for rank in 1..=INDUSTRY_SLOTS {
            specs.extend([
                ColumnSpec::new(
                    format!("impacted_indgrp_{rank}"),
                    format!("indgrp_{rank}"),
                    ColumnKind::Text,
                ),
                ColumnSpec::new(
                    format!("impacted_naics4_{rank}"),
                    format!("naics_{rank}"),
                    ColumnKind::Number,
                ),
                ColumnSpec::new(
                    format!("emp_naics4_{rank}"),
                    format!("emp_{rank}"),
                    ColumnKind::Number,
                ),
            ]);
        }
    }

    specs
}

/// One adapted row as deserialized by `serde_arrow`
#[derive(Debug, Deserialize)]
struct RawRow {
    state: Option<String>,
    county: Option<String>,
    category: Option<String>,
    establishments: Option<f64>,
    employment: Option<f64>,
    wages_week: Option<f64>,
    sales_week: Option<f64>,
    county_establishments: Option<f64>,
    county_employment: Option<f64>,
    zone_employment: Option<f64>,
    indgrp_1: Option<String>,
    naics_1: Option<f64>,
    emp_1: Option<f64>,
    indgrp_2: Option<String>,
    naics_2: Option<f64>,
    emp_2: Option<f64>,
    indgrp_3: Option<String>,
    naics_3: Option<f64>,
    emp_3: Option<f64>,
    indgrp_4: Option<String>,
    naics_4: Option<f64>,
    emp_4: Option<f64>,
    indgrp_5: Option<String>,
    naics_5: Option<f64>,
    emp_5: Option<f64>,
}

impl RawRow {
    fn slot_columns(&self) -> [(Option<&String>, Option<f64>, Option<f64>); INDUSTRY_SLOTS] {
        [
            (self.indgrp_1.as_ref(), self.naics_1, self.emp_1),
            (self.indgrp_2.as_ref(), self.naics_2, self.emp_2),
            (self.indgrp_3.as_ref(), self.naics_3, self.emp_3),
            (self.indgrp_4.as_ref(), self.naics_4, self.emp_4),
            (self.indgrp_5.as_ref(), self.naics_5, self.emp_5),
        ]
    }

    /// Convert into a record, or `None` when a key column is empty
    fn into_record(self, variant: DatasetVariant) -> Option<DatasetRecord> {
        let state = non_empty(self.state.as_deref())?;
        let county = non_empty(self.county.as_deref())?;
        let category = non_empty(self.category.as_deref())?;

        let mut industry_slots = SmallVec::new();
        if variant == DatasetVariant::Rich {
            for (rank, (label, naics, emp)) in (1u8..).zip(self.slot_columns()) {
                industry_slots.push(IndustrySlot {
                    rank,
                    naics_code: to_count(naics).and_then(|code| u32::try_from(code).ok()),
                    group_label: non_empty(label.map(String::as_str)).map(str::to_string),
                    group_employment: to_count(emp),
                });
            }
        }

        Some(DatasetRecord {
            state: state.to_string(),
            county: county.to_string(),
            category: category.to_string(),
            establishments: to_count(self.establishments).unwrap_or(0),
            employment: to_count(self.employment).unwrap_or(0),
            county_establishments: to_count(self.county_establishments),
            county_employment: to_count(self.county_employment),
            wages_per_week: to_dollars(self.wages_week),
            sales_per_week: to_dollars(self.sales_week),
            total_zone_employment: to_count(self.zone_employment),
            industry_slots,
        })
    }
}

/// Keys are kept verbatim; only blank cells count as missing
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Truncate toward zero; negative values become 0 and NaN is absent
fn to_count(value: Option<f64>) -> Option<u64> {
    value
        .filter(|v| v.is_finite())
        .map(|v| if v <= 0.0 { 0 } else { v.trunc() as u64 })
}

fn to_dollars(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0)
}

/// Whether `path` should be read as Parquet
#[must_use]
pub fn is_parquet_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet") || ext.eq_ignore_ascii_case("pq"))
}

/// Record batches read from one file, with the schema the reader reported.
///
/// The schema is kept separately so a file with a header and no rows still
/// carries its columns.
#[derive(Debug)]
pub struct SourceBatches {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

/// Read a CSV file with a header row into record batches
pub fn read_csv(path: &Path) -> Result<SourceBatches> {
    let mut file = safe_open_file(path, "reading CSV dataset")?;

    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)
        .map_err(|e| ImpactError::unavailable(path, format!("Failed to infer CSV schema: {e}")))?;
    file.rewind()
        .map_err(|e| ImpactError::unavailable(path, format!("Failed to rewind CSV file: {e}")))?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .build(file)
        .map_err(|e| ImpactError::unavailable(path, format!("Failed to build CSV reader: {e}")))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            ImpactError::unavailable(path, format!("Failed to read CSV record batch: {e}"))
        })?;
    Ok(SourceBatches { schema, batches })
}

/// Read a Parquet file into record batches
pub fn read_parquet(path: &Path) -> Result<SourceBatches> {
    let file = safe_open_file(path, "reading parquet dataset")?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
        ImpactError::unavailable(path, format!("Failed to open parquet file: {e}"))
    })?;
    let schema = Arc::clone(builder.schema());
    let reader = builder.build().map_err(|e| {
        ImpactError::unavailable(path, format!("Failed to build parquet reader: {e}"))
    })?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            ImpactError::unavailable(path, format!("Failed to read parquet record batch: {e}"))
        })?;
    Ok(SourceBatches { schema, batches })
}

/// Read `path` as Parquet or CSV depending on its extension
pub fn read_batches(path: &Path) -> Result<SourceBatches> {
    if is_parquet_path(path) {
        read_parquet(path)
    } else {
        read_csv(path)
    }
}

/// Detect the dataset variant from the source schema
pub fn detect_variant(schema: &Schema, path: &Path) -> Result<DatasetVariant> {
    for required in [STATE_COLUMN, COUNTY_COLUMN] {
        if schema.index_of(required).is_err() {
            return Err(ImpactError::MissingColumn {
                path: path.to_path_buf(),
                column: required.to_string(),
            });
        }
    }

    [DatasetVariant::Rich, DatasetVariant::Simple]
        .into_iter()
        .find(|variant| schema.index_of(variant.category_column()).is_ok())
        .ok_or_else(|| ImpactError::MissingColumn {
            path: path.to_path_buf(),
            column: format!(
                "{} or {}",
                DatasetVariant::Rich.category_column(),
                DatasetVariant::Simple.category_column()
            ),
        })
}

/// Label for a floating-point category value.
///
/// Whole values drop the fraction so `3.0` reads as `"3"`; others keep it.
fn float_label(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Some(format!("{}", value as i64))
    } else {
        Some(value.to_string())
    }
}

/// Convert a source column to its canonical type.
///
/// Values that cannot be converted become null.
fn convert_column(array: &ArrayRef, kind: ColumnKind) -> Result<ArrayRef> {
    let target = kind.data_type();
    if array.data_type() == &target {
        return Ok(array.clone());
    }

    if kind == ColumnKind::Text && array.data_type().is_floating() {
        let floats = cast(array, &DataType::Float64)?;
        let labels: StringArray = floats
            .as_primitive::<Float64Type>()
            .iter()
            .map(|value| value.and_then(float_label))
            .collect();
        return Ok(Arc::new(labels));
    }

    Ok(cast(array, &target)?)
}

/// Project and cast the known columns of `batch` to canonical names and types
pub fn adapt_batch(batch: &RecordBatch, variant: DatasetVariant) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields = Vec::new();
    let mut columns = Vec::new();

    for spec in column_specs(variant) {
        let Ok(idx) = schema.index_of(&spec.source) else {
            continue;
        };
        columns.push(convert_column(batch.column(idx), spec.kind)?);
        fields.push(Field::new(spec.target, spec.kind.data_type(), true));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Deserialize an adapted batch into records.
///
/// Returns the records and the number of rows skipped for empty keys.
pub fn records_from_batch(
    batch: &RecordBatch,
    variant: DatasetVariant,
    path: &Path,
) -> Result<(Vec<DatasetRecord>, usize)> {
    let rows: Vec<RawRow> = serde_arrow::from_record_batch(batch)
        .map_err(|e| ImpactError::unavailable(path, format!("Failed to deserialize rows: {e}")))?;

    let total = rows.len();
    let records: Vec<DatasetRecord> = rows
        .into_iter()
        .filter_map(|row| row.into_record(variant))
        .collect();
    let skipped = total - records.len();
    Ok((records, skipped))
}

/// Load every record from `path`, preserving storage order
pub fn load_table(path: &Path) -> Result<LoadedTable> {
    let source = read_batches(path)?;
    let variant = detect_variant(&source.schema, path)?;
    log::debug!("Detected {variant:?} dataset variant in {}", path.display());

    let mut records = Vec::new();
    let mut skipped_rows = 0;
    for batch in &source.batches {
        let adapted = adapt_batch(batch, variant)
            .map_err(|e| ImpactError::unavailable(path, format!("Failed to adapt columns: {e}")))?;
        let (batch_records, skipped) = records_from_batch(&adapted, variant, path)?;
        records.extend(batch_records);
        skipped_rows += skipped;
    }

    Ok(LoadedTable {
        variant,
        records,
        skipped_rows,
    })
}
