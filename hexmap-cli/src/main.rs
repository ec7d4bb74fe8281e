//! HexMap CLI - Command-line driver for the search engine
//!
//! Commands:
//! - path: Find a route between two cells on a generated map
//! - vision: List the cells visible from a cell
//! - benchmark: Time path and visibility searches

mod benchmark;
mod path_cmd;
mod terrain;
mod vision_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexmap")]
#[command(about = "Hex map pathfinding and visibility")]
struct Cli {
    /// Random seed for terrain generation (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Grid config JSON file (map size, unit defaults)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a path between two cells
    Path(path_cmd::PathArgs),
    /// Show the cells visible from a cell
    Vision(vision_cmd::VisionArgs),
    /// Benchmark path and visibility searches
    Benchmark(benchmark::BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = terrain::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Path(args) => path_cmd::run(args, config, cli.seed),
        Commands::Vision(args) => vision_cmd::run(args, config, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args, config, cli.seed),
    }
}
