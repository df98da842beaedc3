//! HEXGROW CLI - Command-line interface
//!
//! Commands:
//! - simulate: Run one seeded session to completion
//! - batch: Run many seeded sessions in parallel and aggregate outcomes

mod batch;
mod session;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexgrow")]
#[command(about = "HEXGROW territorial growth simulator")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one session to completion
    Simulate(simulate::SimulateArgs),
    /// Run many sessions in parallel
    Batch(batch::BatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate(args) => simulate::run(args, cli.seed),
        Commands::Batch(args) => batch::run(args, cli.seed),
    }
}
