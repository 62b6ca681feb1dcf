use clap::Parser;
use tokio_util::sync::CancellationToken;

use relay_client::HttpUserApi;
use relay_common::config::{AppConfig, load_dotenv};
use relay_dispatcher::Dispatcher;
use relay_dispatcher::cli::Cli;
use relay_dispatcher::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env has to be in the environment before clap reads its `env` fallbacks
    let dotenv = load_dotenv();
    let cli = Cli::parse();

    let config =
        AppConfig::from_lookup(|key| cli.lookup(key).or_else(|| std::env::var(key).ok()));

    init_tracing(config.as_ref().map(|c| c.log_json).unwrap_or(false));

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file");
    }

    let config = config.inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;
    tracing::info!(destination_url = %config.destination_url, "API B URL");

    // One client for the whole run, shared by the fetch and every delivery
    let api = HttpUserApi::from_config(&config)?;
    tracing::info!(
        source_url = %config.source_url,
        max_attempts = api.policy().max_attempts,
        retry_delay_ms = api.policy().retry_delay.as_millis() as u64,
        "Delivery policy"
    );
    let dispatcher = Dispatcher::new(api, config.destination_url.clone());

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received shutdown signal, cancelling run...");
            shutdown.cancel();
        }
    });

    if let Err(e) = dispatcher.run(&cancel).await {
        tracing::error!(error = %e, "User processing failed");
        return Err(e.into());
    }

    tracing::info!("Service finished.");
    Ok(())
}
