//! One request, end to end
//!
//! Runs resolution, impact, ranking and asset naming for a selection and
//! bundles the results for a presentation layer. A partial selection yields
//! the candidates for the next level instead of a report.

use std::fmt::Write as _;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetId, display_county};
use crate::config::EngineConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::impact::{ImpactSummary, compute_impact};
use crate::industry::{RankedIndustry, rank_industries};
use crate::models::{RecordKey, Selection, SelectionLevel};

/// Everything a presentation layer needs for one complete selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub key: RecordKey,
    /// County as used in asset names
    pub display_county: String,
    pub title: String,
    pub establishments: u64,
    pub employment: u64,
    pub impact: ImpactSummary,
    pub industries: Vec<RankedIndustry>,
    pub asset_id: AssetId,
    pub asset_caption: String,
}

impl ImpactReport {
    /// Build the report for a complete selection
    pub fn build(dataset: &Dataset, config: &EngineConfig, selection: &Selection) -> Result<Self> {
        let record = dataset.resolve(selection, config.match_policy)?;
        let key = record.key();

        let images = config.image_path_resolver(dataset.variant());
        // Asset names come from the selection, not the resolved row
        let asset_id = images.resolve_asset_id(&key.state, &key.county, &key.category);
        let shown = display_county(&key.county, images.strips_county_suffix()).to_string();

        let impact = compute_impact(record);
        if !impact.percentages_in_range() {
            log::warn!("Percentages out of range for {key}: {impact:?}");
        }

        Ok(Self {
            title: format!(
                "Employment in {}, {} inundation zones: {}",
                key.county,
                key.state,
                key.category.to_lowercase()
            ),
            asset_caption: format!(
                "Inundation zone map for {}, {} - {}",
                key.county, key.state, key.category
            ),
            establishments: record.establishments,
            employment: record.employment,
            impact,
            industries: rank_industries(record),
            display_county: shown,
            asset_id,
            key,
        })
    }

    /// Narrative summary and industry table as plain text
    #[must_use]
    pub fn render_text(&self) -> String {
        let county = &self.key.county;
        let zone = self.key.category.to_lowercase();
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "- There were approximately {} {county} employers in a {zone} inundation zone \
             ({}% of all employers in {county}).",
            with_thousands(self.establishments),
            self.impact.pct_establishments
        );
        let _ = writeln!(
            out,
            "- {} people worked at those businesses ({}% of all jobs in {county}).",
            with_thousands(self.employment),
            self.impact.pct_employment
        );
        let _ = writeln!(
            out,
            "- A one-week closure of establishments in this inundation zone would result in \
             about ${:.1} million in lost wages and about ${:.1} million in lost business sales.",
            self.impact.lost_wages_millions, self.impact.lost_sales_millions
        );

        if !self.industries.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "The industry groups most affected by inundation in this zone would be:"
            );
            let _ = writeln!(out, "  # | NAICS | Industry Group | % of Zone Employment");
            for industry in &self.industries {
                let naics = industry
                    .naics_code
                    .map_or_else(|| "-".to_string(), |code| code.to_string());
                let _ = writeln!(
                    out,
                    "  {} | {naics} | {} | {}%",
                    industry.rank, industry.group_label, industry.pct_of_zone_employment
                );
            }
        }

        out
    }
}

/// Result of evaluating a possibly partial selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// The selection is incomplete; choose one of `options` for `level`
    Candidates {
        level: SelectionLevel,
        options: Vec<String>,
    },
    /// The selection is complete
    Report(Box<ImpactReport>),
}

/// Evaluate `selection`, listing candidates until it is complete
pub fn evaluate(
    dataset: &Dataset,
    config: &EngineConfig,
    selection: &Selection,
) -> Result<SelectionOutcome> {
    match selection.next_level() {
        Some(level) => Ok(SelectionOutcome::Candidates {
            level,
            options: dataset.candidates_for(level, selection),
        }),
        None => ImpactReport::build(dataset, config, selection)
            .map(|report| SelectionOutcome::Report(Box::new(report))),
    }
}

/// Format a count with comma thousands separators
#[must_use]
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",")
}
