mod commands;
mod config;
mod http;
mod metrics;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "inkcal")]
#[command(about = "Turn calendar feeds into an e-paper friendly day timeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the next upcoming events
    Upcoming {
        /// How many events to show (defaults to the configured count)
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Compute the day-strip layout and print it as JSON
    Timeline,
    /// Refetch all sources, ignoring cache TTLs
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Upcoming { count } => commands::upcoming::run(&config, count).await,
        Commands::Timeline => commands::timeline::run(&config).await,
        Commands::Refresh => commands::refresh::run(&config).await,
    }
}
