mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calcia", about = "Calcium-imaging preprocessing tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an image sequence against its mean projection
    Register(commands::register::RegisterArgs),
    /// Wavelet-decompose a single image
    Wavelet(commands::wavelet::WaveletArgs),
    /// Run a parameter-file-driven preprocessing pipeline
    Run(commands::run::RunArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Register(args) => commands::register::run(args),
        Commands::Wavelet(args) => commands::wavelet::run(args),
        Commands::Run(args) => commands::run::run(args),
    }
}
