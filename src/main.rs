use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use inundation_impact::utils::logging::log_missing_asset;
use inundation_impact::{
    AssetStore, Dataset, DirectoryAssetStore, EngineConfig, ImpactReport, MatchPolicy, Selection,
    SelectionOutcome, evaluate,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Employment exposure in coastal inundation zones", long_about = None)]
struct Args {
    /// Dataset to load (CSV or Parquet); overrides the config file
    #[arg(long)]
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the map images; overrides the config file
    #[arg(long)]
    maps: Option<PathBuf>,

    #[arg(long)]
    state: Option<String>,

    #[arg(long)]
    county: Option<String>,

    /// Inundation zone or SLOSH category label
    #[arg(long)]
    category: Option<String>,

    /// Fail when a selection matches more than one row
    #[arg(long)]
    strict: bool,

    /// Strip a trailing " County" from map names
    #[arg(long, conflicts_with = "keep_county_suffix")]
    strip_county_suffix: bool,

    /// Keep the county name as-is in map names
    #[arg(long)]
    keep_county_suffix: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(data) = &self.data {
            config.data_path.clone_from(data);
        }
        if let Some(maps) = &self.maps {
            config.asset_dir.clone_from(maps);
        }
        if self.strict {
            config.match_policy = MatchPolicy::Strict;
        }
        if self.strip_county_suffix {
            config.strip_county_suffix = Some(true);
        } else if self.keep_county_suffix {
            config.strip_county_suffix = Some(false);
        }
        Ok(config)
    }

    fn selection(&self) -> Selection {
        Selection {
            state: self.state.clone(),
            county: self.county.clone(),
            category: self.category.clone(),
        }
    }
}

fn print_report(report: &ImpactReport, store: &DirectoryAssetStore) {
    println!("{}", report.render_text());
    if store.exists(&report.asset_id) {
        println!("{}: {}", report.asset_caption, store.location(&report.asset_id));
    } else {
        log_missing_asset(&report.asset_id, &store.location(&report.asset_id));
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.engine_config()?;
    let dataset = Dataset::shared(&config.data_path)
        .with_context(|| format!("Failed to load dataset {}", config.data_path.display()))?;
    info!(
        "Dataset ready: {} rows ({:?} variant, loaded {})",
        dataset.len(),
        dataset.variant(),
        dataset.loaded_at()
    );

    let outcome = match evaluate(&dataset, &config, &args.selection()) {
        Ok(outcome) => outcome,
        Err(e) if e.is_recoverable() => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        SelectionOutcome::Candidates { level, options } => {
            println!("Please complete all selections. Choose a {level}:");
            for option in options {
                println!("  {option}");
            }
        }
        SelectionOutcome::Report(report) => {
            print_report(&report, &DirectoryAssetStore::new(&config.asset_dir));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
