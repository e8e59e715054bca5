//! auditscan binary entry point.

use anyhow::Result;
use auditscan::cli::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "auditscan=debug" } else { "auditscan=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Scan(cmd) => cmd.execute(cli.quiet).await?,
        Commands::Devices(cmd) => cmd.execute()?,
    }

    Ok(())
}
