use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use modelhub::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modelhub=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            host,
            preload,
        } => {
            modelhub::cli::serve(config, port, host, preload).await?;
        }
        Commands::Info { model } => {
            modelhub::cli::info(model).await?;
        }
        Commands::Run {
            model,
            input,
            strict,
        } => {
            modelhub::cli::run(model, input, strict).await?;
        }
        Commands::Sample { seed, output } => {
            modelhub::cli::sample(seed, output).await?;
        }
    }

    Ok(())
}
