//! Schema CLI
//!
//! Validates per-match batches and CSV exports against the soccer catalog,
//! exports accepted records as checksummed snapshots.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use soccer_schema::{BatchReport, SchemaRegistry, ValidatorConfig};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "soccer-schema")]
#[command(about = "Validate soccer event and tracking data before it is stored", long_about = None)]
struct Cli {
    /// Validator config (YAML or JSON); falls back to SOCCER_SCHEMA_CONFIG_PATH
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Validate and load data files
    Validate {
        /// Per-match JSON batch files, loaded in order
        #[arg(long)]
        batch: Vec<PathBuf>,

        /// CSV export of a single entity (requires --entity)
        #[arg(long, requires = "entity")]
        csv: Option<PathBuf>,

        /// Entity the CSV rows belong to
        #[arg(long)]
        entity: Option<String>,

        /// Write the full report as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Export accepted records to this MsgPack+LZ4 snapshot
        #[arg(long)]
        export: Option<PathBuf>,

        /// Output metadata JSON file (with --export)
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Print the entity catalog as JSON
    Describe,

    /// Verify a snapshot against its checksum
    Verify {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        checksum: String,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> Result<ValidatorConfig> {
    let config = match path {
        Some(path) => ValidatorConfig::from_path(path),
        None => ValidatorConfig::from_env(),
    };
    config.context("Failed to load validator config")
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let mut registry = SchemaRegistry::with_catalog(config)?;

    match cli.command {
        Commands::Validate {
            batch,
            csv,
            entity,
            report,
            export,
            metadata,
        } => {
            let mut reports = Vec::new();
            for path in &batch {
                println!("Loading batch {}", path.display());
                let parsed = schema_cli::read_batch(path)?;
                reports.extend(registry.load_match_file(parsed)?);
            }

            if let (Some(csv), Some(entity)) = (csv, entity) {
                println!("Loading {} rows from {}", entity, csv.display());
                reports.push(schema_cli::load_csv(&mut registry, &entity, &csv)?);
            }

            print_summary(&reports);

            if let Some(report_path) = report {
                let report_json = serde_json::to_string_pretty(&reports)?;
                std::fs::write(&report_path, report_json)
                    .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
                println!("\nReport saved to: {}", report_path.display());
            }

            if let Some(out) = export {
                let meta = schema_cli::export_snapshot(
                    &registry,
                    &out,
                    &soccer_schema::SCHEMA_VERSION.to_string(),
                )?;
                print_metadata(&meta);

                if let Some(metadata_path) = metadata {
                    save_metadata(&metadata_path, &meta)?;
                }
            }

            if reports.iter().any(|r| !r.is_clean()) {
                anyhow::bail!("Some records were rejected");
            }
        }

        Commands::Describe => {
            println!("{}", serde_json::to_string_pretty(&registry.describe()?)?);
        }

        Commands::Verify { snapshot, checksum } => {
            println!("Verifying snapshot integrity...");
            if schema_cli::verify_snapshot(&snapshot, &checksum)? {
                let restored = schema_cli::load_snapshot(&snapshot)?;
                println!("Snapshot verification passed ({} records)", restored.record_count());
            } else {
                anyhow::bail!("Snapshot verification failed - checksum mismatch!")
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_summary(reports: &[BatchReport]) {
    println!("\nValidation summary:");
    for report in reports {
        println!(
            "   {:<16} {:>6} accepted {:>6} rejected",
            report.entity,
            report.accepted,
            report.rejected.len()
        );
        for (kind, count) in report.violation_counts() {
            println!("      {kind}: {count}");
        }
    }

    for line in schema_cli::format_rejections(reports) {
        eprintln!("{line}");
    }
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &schema_cli::SnapshotMetadata) {
    println!("\nSnapshot exported:");
    println!("   Records:         {}", meta.record_count);
    println!(
        "   Original size:   {} bytes ({:.2} KB)",
        meta.original_size,
        meta.original_size as f64 / 1024.0
    );
    println!(
        "   Compressed size: {} bytes ({:.2} KB)",
        meta.compressed_size,
        meta.compressed_size as f64 / 1024.0
    );
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn save_metadata(path: &Path, meta: &schema_cli::SnapshotMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\nMetadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("soccer-schema CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
