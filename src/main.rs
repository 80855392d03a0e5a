use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use padder_graph::{Metrics, PrefixMatrix};
use padder_lower::{lower, lower_verified, Endianness, GateDag, GateStats};
use padder_topology::{registry, BatchConfig, KnowlesParams, Topology};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// padder - parallel prefix adder generator and analyzer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the prefix matrix and metrics of one adder
    Show {
        #[command(flatten)]
        adder: AdderArgs,

        /// Print metrics and matrix as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Lower one adder to a gate DAG and print it as JSON
    Lower {
        #[command(flatten)]
        adder: AdderArgs,

        /// Big-endian primary inputs and outputs
        #[arg(long)]
        big_endian: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Compare every topology at one bit width
    Survey {
        /// Bit width
        #[arg(short, long)]
        width: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate and lower every job of a TOML batch file
    Batch {
        /// Batch configuration file
        config: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include the full gate DAG of every job
        #[arg(long)]
        dags: bool,
    },
}

/// Topology name, width and shape
#[derive(Args)]
struct AdderArgs {
    /// Topology name or alias (e.g. kogge_stone, ks, ladner-fischer)
    topology: String,

    /// Bit width
    #[arg(short, long)]
    width: usize,

    /// Outer Brent-Kung levels kept by ladner_fischer, han_carlson and
    /// ripple_carry_brent_kung
    #[arg(short, long)]
    levels: Option<usize>,

    /// Knowles: largest fanout per level
    #[arg(long, conflicts_with_all = ["max_wiring", "schedule"])]
    max_fanout: Option<usize>,

    /// Knowles: wiring budget
    #[arg(long, conflicts_with = "schedule")]
    max_wiring: Option<usize>,

    /// Knowles: explicit fanout per level, e.g. 1,1,2,4
    #[arg(long, value_delimiter = ',')]
    schedule: Option<Vec<usize>>,
}

impl AdderArgs {
    fn topology(&self) -> Result<Topology> {
        let kind = registry::resolve(&self.topology)?;
        let knowles = KnowlesParams {
            max_fanout: self.max_fanout,
            max_wiring: self.max_wiring,
            fanout_schedule: self.schedule.clone(),
        };
        Ok(kind.with_shape(self.levels, knowles)?)
    }

    fn generate(&self) -> Result<(Topology, PrefixMatrix)> {
        let topology = self.topology()?;
        let matrix = topology
            .generate(self.width)
            .with_context(|| format!("Failed to generate {}-bit {}", self.width, topology))?;
        Ok((topology, matrix))
    }
}

#[derive(Serialize)]
struct ShowReport<'a> {
    topology: &'a Topology,
    metrics: Metrics,
    matrix: &'a PrefixMatrix,
}

#[derive(Serialize)]
struct JobReport {
    topology: Topology,
    metrics: Metrics,
    gates: GateStats,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    dag: Option<GateDag>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show { adder, json } => {
            show(&adder, json)?;
        }

        Commands::Lower {
            adder,
            big_endian,
            output,
            pretty,
        } => {
            lower_adder(&adder, big_endian, output.as_deref(), pretty)?;
        }

        Commands::Survey { width, json } => {
            survey(width, json)?;
        }

        Commands::Batch {
            config,
            output,
            dags,
        } => {
            run_batch(&config, output.as_deref(), dags)?;
        }
    }

    Ok(())
}

fn show(adder: &AdderArgs, json: bool) -> Result<()> {
    let (topology, matrix) = adder.generate()?;
    let metrics = matrix.metrics();

    if json {
        let report = ShowReport {
            topology: &topology,
            metrics,
            matrix: &matrix,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} ({} bits)", topology, adder.width);
    println!();
    println!("{}", matrix);
    println!();
    println!("nodes:      {}", metrics.nodes);
    println!("delay:      {}", metrics.delay);
    println!("fanout:     {}", metrics.max_fanout);
    println!("wiring:     {}", metrics.wiring);
    println!(
        "crossings:  {} {} {}",
        metrics.crossings.diagonal_over_vertical,
        metrics.crossings.vertical_over_diagonal,
        metrics.crossings.diagonal_over_diagonal
    );
    println!("error:      {} (weighted {})", metrics.error, metrics.weighted_error);
    Ok(())
}

fn lower_adder(
    adder: &AdderArgs,
    big_endian: bool,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let (topology, matrix) = adder.generate()?;
    let endianness = if big_endian {
        Endianness::Big
    } else {
        Endianness::Little
    };

    let dag = lower_verified(&matrix, endianness)
        .with_context(|| format!("{} is not a working adder", topology))?;
    info!(
        "Lowered {}-bit {} into {} gates",
        adder.width,
        topology,
        dag.gates().len()
    );

    let json = if pretty {
        dag.to_json_pretty()?
    } else {
        dag.to_json()?
    };
    emit(output, &json)
}

fn survey(width: usize, json: bool) -> Result<()> {
    let mut rows = Vec::new();
    for kind in registry::kinds() {
        let topology = kind.default_topology();
        let matrix = topology
            .generate(width)
            .with_context(|| format!("Failed to generate {}-bit {}", width, topology))?;
        let dag = lower(&matrix, Endianness::Little);
        rows.push(JobReport {
            topology,
            metrics: matrix.metrics(),
            gates: dag.op_counts(),
            depth: dag.depth(),
            dag: None,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<36} {:>6} {:>6} {:>7} {:>7} {:>10} {:>6} {:>6}",
        "topology", "nodes", "delay", "fanout", "wiring", "crossings", "gates", "depth"
    );
    for row in &rows {
        let crossings = format!(
            "{}/{}/{}",
            row.metrics.crossings.diagonal_over_vertical,
            row.metrics.crossings.vertical_over_diagonal,
            row.metrics.crossings.diagonal_over_diagonal
        );
        println!(
            "{:<36} {:>6} {:>6} {:>7} {:>7} {:>10} {:>6} {:>6}",
            row.topology.to_string(),
            row.metrics.nodes,
            row.metrics.delay,
            row.metrics.max_fanout,
            row.metrics.wiring,
            crossings,
            row.gates.total(),
            row.depth
        );
    }
    Ok(())
}

fn run_batch(config_path: &Path, output: Option<&Path>, dags: bool) -> Result<()> {
    let config = BatchConfig::load(config_path)
        .with_context(|| format!("Failed to load batch config {:?}", config_path))?;
    let endianness = if config.big_endian {
        Endianness::Big
    } else {
        Endianness::Little
    };

    let mut reports = Vec::new();
    for (width, topology) in config.jobs() {
        info!("Generating {}-bit {}", width, topology);
        let matrix = topology
            .generate(width)
            .with_context(|| format!("Failed to generate {}-bit {}", width, topology))?;
        let dag = lower(&matrix, endianness);
        reports.push(JobReport {
            topology: topology.clone(),
            metrics: matrix.metrics(),
            gates: dag.op_counts(),
            depth: dag.depth(),
            dag: dags.then_some(dag),
        });
    }

    info!("Batch finished: {} jobs", reports.len());
    emit(output, &serde_json::to_string_pretty(&reports)?)
}

fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}
