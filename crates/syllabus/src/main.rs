mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::extract::ExtractOptions;
use cli::{Cli, Commands};

const DEFAULT_LOG_FILTER: &str = "sylx=info,syllabus_core=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch(cli.command).await
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Extract {
            path,
            only,
            enrich,
            overview,
            config,
            compact,
        } => {
            cli::extract::run(ExtractOptions {
                path: path.as_deref(),
                only: &only,
                enrich,
                overview,
                config: config.as_deref(),
                compact,
            })
            .await
        }
        Commands::Analyze { path, config } => {
            cli::analyze::run(path.as_deref(), config.as_deref())
        }
    }
}
