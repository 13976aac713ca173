//! RadGraph serialization CLI
//!
//! Batch driver around the serialization engine: reads a JSON file of
//! RadGraph records and writes one JSON line per report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use radgraph_core::{read_records, ReportRecord};
use radgraph_serialize::{serialize_batch, FailurePolicy, OutputRow, Serializer, SerializerConfig};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// RadGraph serialization - turn report knowledge graphs into prompt text
#[derive(Parser)]
#[command(name = "radgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every command that serializes
#[derive(clap::Args)]
struct SerializeArgs {
    /// Serialization method: subgraphs, no_sep, with_anat or with_@_anat
    /// (defaults to RADGRAPH_METHOD, then subgraphs)
    #[arg(short, long)]
    method: Option<String>,

    /// Group output under FINDINGS / IMPRESSION headers
    #[arg(long, overrides_with = "no_separate_sections")]
    separate_sections: bool,

    /// Do not group output by section, even if RADGRAPH_SEPARATE_SECTIONS is set
    #[arg(long, overrides_with = "separate_sections")]
    no_separate_sections: bool,

    /// Prefix absent observations with "no" and uncertain ones with "maybe"
    #[arg(long, overrides_with = "no_mark_certainty")]
    mark_certainty: bool,

    /// Do not mark certainty, even if RADGRAPH_MARK_CERTAINTY is set
    #[arg(long, overrides_with = "mark_certainty")]
    no_mark_certainty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize every report in a file
    Serialize {
        /// Path to the RadGraph JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON Lines file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: SerializeArgs,

        /// Log and skip malformed reports instead of aborting
        #[arg(long)]
        skip_malformed: bool,

        /// Worker threads (0 = one per core)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Print the serialization of a single report
    Show {
        /// Path to the RadGraph JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Report id
        #[arg(long)]
        id: String,

        #[command(flatten)]
        settings: SerializeArgs,
    },

    /// Show entity, relation and component counts
    Stats {
        /// Path to the RadGraph JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging (stderr, so serialized rows on stdout stay clean)
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = SerializerConfig::from_env();

    match cli.command {
        Commands::Serialize {
            input,
            output,
            settings,
            skip_malformed,
            jobs,
        } => {
            settings.apply(&mut config);
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            let policy = if skip_malformed {
                FailurePolicy::Skip
            } else {
                FailurePolicy::Abort
            };
            cmd_serialize(&config, &input, output.as_deref(), policy)?;
        }
        Commands::Show {
            input,
            id,
            settings,
        } => {
            settings.apply(&mut config);
            cmd_show(&config, &input, &id)?;
        }
        Commands::Stats { input } => {
            cmd_stats(&input)?;
        }
    }

    Ok(())
}

impl SerializeArgs {
    /// Command-line flags win over the environment
    fn apply(self, config: &mut SerializerConfig) {
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(on) = switch(self.separate_sections, self.no_separate_sections) {
            config.separate_sections = on;
        }
        if let Some(on) = switch(self.mark_certainty, self.no_mark_certainty) {
            config.mark_certainty = on;
        }
    }
}

/// An `--x` / `--no-x` pair; `None` leaves the environment value in place
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn load_records(path: &Path) -> Result<Vec<ReportRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let records = read_records(&content)
        .with_context(|| format!("Failed to parse RadGraph records from: {}", path.display()))?;
    info!("Loaded {} reports from {}", records.len(), path.display());
    Ok(records)
}

fn cmd_serialize(
    config: &SerializerConfig,
    input: &Path,
    output: Option<&Path>,
    policy: FailurePolicy,
) -> Result<()> {
    // Validate the method before touching any record
    let serializer = config.serializer()?;
    let records = load_records(input)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .context("Failed to build worker pool")?;
    debug!("Serializing with {} worker threads", pool.current_num_threads());

    let outcome = pool.install(|| serialize_batch(&serializer, &records, policy))?;

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    write_rows(BufWriter::new(writer), &outcome.rows)?;

    if let Some(path) = output {
        eprintln!(
            "✓ Saved {} serializations ({}) to {}",
            outcome.rows.len(),
            serializer.strategy(),
            path.display()
        );
    }
    if !outcome.failures.is_empty() {
        eprintln!("  • Reports skipped: {}", outcome.failures.len());
        for failure in &outcome.failures {
            eprintln!("    - {}", failure.error);
        }
    }

    Ok(())
}

fn write_rows(mut writer: impl Write, rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn cmd_show(config: &SerializerConfig, input: &Path, id: &str) -> Result<()> {
    let serializer: Serializer = config.serializer()?;
    let records = load_records(input)?;

    let record = records
        .iter()
        .find(|record| record.id == id)
        .ok_or_else(|| anyhow::anyhow!("Report not found: {}", id))?;

    let row = serializer.serialize_record(record)?;
    println!("{}", row.serialization);
    Ok(())
}

fn cmd_stats(input: &Path) -> Result<()> {
    let records = load_records(input)?;

    let mut reports = 0;
    let mut malformed = 0;
    let mut entities = 0;
    let mut anatomy = 0;
    let mut relations = 0;
    let mut components = 0;

    for record in &records {
        match record.parse() {
            Ok(graph) => {
                reports += 1;
                entities += graph.len();
                anatomy += graph.anatomy_entities().len();
                relations += graph.relations().len();
                components += graph.connected_components().len();
            }
            Err(e) => {
                debug!("{}", e);
                malformed += 1;
            }
        }
    }

    println!("Report Statistics:");
    println!("  • Reports: {}", reports);
    println!("  • Malformed: {}", malformed);
    println!("  • Entities: {} ({} anatomy, {} observation)", entities, anatomy, entities - anatomy);
    println!("  • Relations: {}", relations);
    println!("  • Components: {}", components);

    Ok(())
}
