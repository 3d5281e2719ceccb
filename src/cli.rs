use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pluvio statistical precipitation downscaler.
#[derive(Parser)]
#[command(
    name = "pluvio",
    version,
    about = "Downscale GCM daily precipitation by analog resampling"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Downscale every configured combination.
    Run(RunArgs),
    /// Validate the configuration and inputs without writing anything.
    Check(CheckArgs),
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "pluvio.toml")]
    pub config: PathBuf,

    /// Override the base RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the output directory from config.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the number of concurrent combinations.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Recompute combinations whose outputs are already up to date.
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "pluvio.toml")]
    pub config: PathBuf,
}
