use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    analyze::{self, AnalyzeArgs},
    decompose::{self, DecomposeArgs},
    graph::{self, GraphArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "mcg-sim", about = "Morpheme compatibility-graph analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every analysis stage and write `analysis_report.json`.
    Analyze(AnalyzeArgs),
    /// Decompose tokens given on the command line.
    Decompose(DecomposeArgs),
    /// Build only the vocabulary and compatibility graph artifact.
    Graph(GraphArgs),
    /// Print version information.
    Version(VersionArgs),
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => analyze::run(&args),
        Command::Decompose(args) => decompose::run(&args),
        Command::Graph(args) => graph::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
