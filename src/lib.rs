//! Synaptrack: cross-slice synapse identity tracking along neuronal skeletons.
//!
//! Synapses are detected slice by slice in windows placed around the nodes
//! of a neuron's skeleton. Each slice's connected-component labels are only
//! meaningful within that slice; synaptrack reconciles them into global
//! synapse ids that stay stable while an object is visible in consecutive,
//! overlapping slices, and reports one record per object per slice.
//!
//! # Modules
//!
//! - [`geometry`]: ROI boxes, frames and intersection
//! - [`labels`]: raw/normalized label slices and class probabilities
//! - [`relabel`]: the stateful slice relabeler
//! - [`features`]: centroid, size and uncertainty per object
//! - [`pipeline`]: the per-node driver and its source/sink seams
//! - [`merge`]: folding per-node rows into one row per synapse
//! - [`io`]: synapse tables and recorded classifier output
//! - [`error`]: Error types for synaptrack operations

pub mod error;
pub mod features;
pub mod geometry;
pub mod io;
pub mod labels;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod relabel;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{debug, info};

pub use error::SynaptrackError;

use crate::io::tsv::SynapseTableWriter;
use crate::pipeline::{LocateOptions, LocateSummary};
use crate::relabel::MergePolicy;

/// The synaptrack CLI application.
#[derive(Parser)]
#[command(name = "synaptrack")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level specification (overridden by RUST_LOG).
    #[arg(long, global = true, env = "SYNAPTRACK_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Replay recorded classifier output and write the synapse table.
    Locate(LocateArgs),
    /// Merge a synapse table into one row per synapse id.
    Merge(MergeArgs),
}

/// Arguments for the locate subcommand.
#[derive(clap::Args)]
struct LocateArgs {
    /// Recorded per-node classifier output (JSON).
    input: PathBuf,

    /// Output synapse table (tab-separated).
    output: PathBuf,

    /// How to pick an id when one object overlaps several previous ones.
    #[arg(long, value_enum, default_value_t = MergePolicy::LastPrevious)]
    merge_policy: MergePolicy,

    /// Fail (exit non-zero) if any node had to be skipped.
    #[arg(long)]
    strict: bool,
}

/// Arguments for the merge subcommand.
#[derive(clap::Args)]
struct MergeArgs {
    /// Input synapse table (tab-separated).
    input: PathBuf,

    /// Output merged table (tab-separated).
    output: PathBuf,
}

/// Run the synaptrack CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SynaptrackError> {
    let cli = Cli::parse();

    let _logger = flexi_logger::Logger::try_with_env_or_str(&cli.log_level)?.start()?;

    match cli.command {
        Some(Commands::Locate(args)) => run_locate(args),
        Some(Commands::Merge(args)) => run_merge(args),
        None => {
            println!("synaptrack {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Cross-slice synapse identity tracking.");
            println!();
            println!("Run 'synaptrack --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the locate subcommand.
fn run_locate(args: LocateArgs) -> Result<(), SynaptrackError> {
    let mut run = io::nodes_json::read_node_json(&args.input)?;
    let mut sink = SynapseTableWriter::create(&args.output)?;
    let opts = LocateOptions {
        merge_policy: args.merge_policy,
    };

    let summary = pipeline::locate_synapses(
        &run.branches,
        &mut run.source,
        &mut sink,
        &opts,
        |progress| debug!("{}", progress),
    )?;
    sink.into_inner()?;

    print_locate_summary(&summary);

    if args.strict && !summary.failures.is_empty() {
        return Err(SynaptrackError::NodeFailures {
            failed: summary.failures.len(),
            total: summary.nodes_total,
        });
    }
    Ok(())
}

fn print_locate_summary(summary: &LocateSummary) {
    println!(
        "Processed {}/{} node(s): {} synapse record(s), max synapse id {}",
        summary.nodes_processed, summary.nodes_total, summary.records_written, summary.max_label
    );
    for failure in &summary.failures {
        println!("  skipped node {}: {}", failure.node_id, failure.message);
    }
}

/// Execute the merge subcommand.
fn run_merge(args: MergeArgs) -> Result<(), SynaptrackError> {
    let records = io::tsv::read_synapse_table(&args.input)?;
    let merged = merge::merge_synapse_ids(&records);
    io::tsv::write_merged_table(&args.output, &merged)?;

    info!("merged {} row(s) into {}", records.len(), merged.len());
    println!(
        "Merged {} row(s) into {} synapse(s)",
        records.len(),
        merged.len()
    );
    Ok(())
}
