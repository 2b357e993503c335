use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod settings;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let filter = if cli.verbose {
        "debug,plume=trace"
    } else {
        "warn,plume=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    commands::run_command(cli)
}
