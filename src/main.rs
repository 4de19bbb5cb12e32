//! q-grid command-line interface.
//!
//! Validates circuit snapshots and runs them against a simulator service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use q_grid::backend::HttpSimulator;
use q_grid::config::SessionConfig;
use q_grid::session::Session;
use q_grid::snapshot::Snapshot;

/// Grid-based quantum circuit editor core
#[derive(Parser)]
#[command(name = "q-grid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a snapshot and print its statistics
    Check {
        /// Snapshot JSON file
        input: PathBuf,
    },

    /// Run a snapshot on the simulator and print the histogram
    Run {
        /// Snapshot JSON file
        input: PathBuf,

        /// Simulator base URL, overrides the configuration
        #[arg(short, long)]
        url: Option<String>,

        /// Write the histogram as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Snapshot::from_json(&json)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    q_grid::logging::init(&config.log_level);

    match cli.command {
        Commands::Check { input } => {
            let circuit = load_snapshot(&input)?.into_circuit()?;
            let stats = circuit.stats();
            println!("qubits: {}", stats.num_qubits);
            println!("gates:  {}", stats.gate_count);
            println!("depth:  {}", stats.depth);
        }
        Commands::Run { input, url, csv } => {
            if let Some(url) = url {
                config.simulator_url = url;
            }
            let snapshot = load_snapshot(&input)?;
            let simulator = HttpSimulator::from_config(&config)?;
            let mut session = Session::new(simulator, &config)?;
            session.load(snapshot)?;

            let histogram = session.run().await?;
            for ((state, count), pct) in histogram.series().zip(histogram.percentages()) {
                println!("{state}  {count:>6}  {pct:>3}%");
            }
            println!(
                "total: {}  expected: {}  difference: {}",
                histogram.total(),
                histogram.expected_shots(),
                histogram.discrepancy()
            );

            if let Some(path) = csv {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                histogram.write_csv(file)?;
            }
        }
    }

    Ok(())
}
