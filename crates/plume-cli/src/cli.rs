use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use plume_types::Level;

#[derive(Parser)]
#[command(
    name = "plume",
    about = "Plume — hierarchical, level-filtered logging",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List severity levels and their ranks
    Levels,
    /// Emit messages through a configured logger and show what was delivered
    Emit(EmitArgs),
    /// Load a settings file and report each configured logger
    Check(CheckArgs),
}

#[derive(Args)]
pub struct EmitArgs {
    /// Messages to emit, one event each
    #[arg(required = true)]
    pub messages: Vec<String>,
    /// Dotted logger name
    #[arg(short, long, default_value = "plume.cli")]
    pub logger: String,
    /// Level of each call
    #[arg(short = 'L', long, default_value = "info")]
    pub level: Level,
    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Explicit level for the emitting logger, overriding settings
    #[arg(long)]
    pub threshold: Option<Level>,
    /// Do not propagate to ancestor sinks
    #[arg(long)]
    pub no_additivity: bool,
    /// Route calls through the legacy Category facade
    #[arg(long)]
    pub legacy: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// TOML settings file
    pub config: PathBuf,
}
