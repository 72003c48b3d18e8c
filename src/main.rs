use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use deal_ingest::config::Config;
use deal_ingest::observability::{init_logging, metrics};
use deal_ingest::pipeline::{FounderOverrides, IngestPipeline};
use deal_ingest::{ColumnMapping, NormalizedRecord};

#[derive(Parser)]
#[command(name = "deal_ingest")]
#[command(about = "Normalize startup deal-flow CSV exports")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to $DEAL_INGEST_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr when the command finishes
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show headers, the first rows and the row count of a CSV file
    Preview {
        file: PathBuf,
    },
    /// Print the heuristic column mapping for a CSV file's headers
    Suggest {
        file: PathBuf,
    },
    /// Normalize a CSV file into records and diagnostics
    Ingest {
        file: PathBuf,
        /// JSON column mapping (canonical field -> header); replaces the heuristics
        #[arg(long)]
        mapping: Option<PathBuf>,
        /// Also extract founder entities from each record
        #[arg(long)]
        founders: bool,
        /// JSON founder overrides keyed by record id
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// Write the JSON result here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write records (an ingest result or a JSON array of records) back to CSV
    Export {
        records: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Accepts either a full ingest result or a bare record list
#[derive(Deserialize)]
#[serde(untagged)]
enum ExportInput {
    Outcome { records: Vec<NormalizedRecord> },
    Records(Vec<NormalizedRecord>),
}

impl ExportInput {
    fn into_records(self) -> Vec<NormalizedRecord> {
        match self {
            ExportInput::Outcome { records } | ExportInput::Records(records) => records,
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create '{}'", parent.display()))?;
            }
            fs::write(path, content).with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn load_mapping(path: &Path) -> Result<ColumnMapping> {
    ColumnMapping::from_json(&read_text(path)?)
        .with_context(|| format!("Invalid column mapping in '{}'", path.display()))
}

fn load_overrides(path: &Path) -> Result<FounderOverrides> {
    FounderOverrides::from_json(&read_text(path)?)
        .with_context(|| format!("Invalid founder overrides in '{}'", path.display()))
}

fn default_export_path(config: &Config) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    config
        .export
        .output_dir
        .join(format!("companies-export-{}.csv", date))
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    let pipeline = IngestPipeline::new();

    match cli.command {
        Commands::Preview { file } => {
            let sample = pipeline.preview(&read_text(&file)?)?;
            println!("{}", serde_json::to_string_pretty(&sample)?);
        }
        Commands::Suggest { file } => {
            let mapping = pipeline.suggest(&read_text(&file)?)?;
            println!("{}", serde_json::to_string_pretty(&mapping)?);
        }
        Commands::Ingest {
            file,
            mapping,
            founders,
            overrides,
            output,
        } => {
            let text = read_text(&file)?;

            let mapping = match mapping.or_else(|| config.ingest.mapping_file.clone()) {
                Some(path) => Some(load_mapping(&path)?),
                None => None,
            };

            let outcome = if founders || config.ingest.extract_founders {
                let overrides = match overrides.or_else(|| config.ingest.founder_overrides_file.clone()) {
                    Some(path) => load_overrides(&path)?,
                    None => FounderOverrides::new(),
                };
                pipeline.ingest_with_founders(&text, mapping.as_ref(), &overrides)?
            } else {
                pipeline.ingest(&text, mapping.as_ref())?
            };

            if outcome.diagnostics.has_skips() {
                warn!("{} row(s) skipped in {}", outcome.diagnostics.skipped, file.display());
            }
            eprintln!("{}", outcome.diagnostics.summary());

            write_or_print(output.as_deref(), &serde_json::to_string_pretty(&outcome)?)?;
        }
        Commands::Export { records, output } => {
            let input: ExportInput = serde_json::from_str(&read_text(&records)?)
                .with_context(|| format!("Expected records JSON in '{}'", records.display()))?;
            let records = input.into_records();
            let csv = pipeline.export(&records);
            let path = output.unwrap_or_else(|| default_export_path(config));
            write_or_print(Some(&path), &csv)?;
            eprintln!("Exported {} record(s) to {}", records.len(), path.display());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Keep the guard alive so the file writer flushes on exit
    let _guard = init_logging(&config.logging);

    let handle = if cli.metrics {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        metrics::describe_all();
        Some(handle)
    } else {
        None
    };

    let result = run(cli, &config);

    if let Some(handle) = handle {
        eprintln!("{}", handle.render());
    }

    result
}
