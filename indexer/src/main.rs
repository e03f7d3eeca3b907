use alloy::providers::{Provider, ProviderBuilder};
use anyhow::Error;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use trailblazer_adapters::projects::domains::DotTaikoIndexer;

mod config;
mod logging;
mod retry;
mod runner;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init_logging();

    info!("🚀 Starting dot-taiko indexer v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::read_env_variables()?;
    let cancel_token = CancellationToken::new();

    let provider = ProviderBuilder::new()
        .connect_http(
            config
                .rpc_url
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid RPC_URL {}: {}", config.rpc_url, e))?,
        )
        .erased();

    tokio::spawn(wait_for_the_termination(cancel_token.clone()));

    let runner = runner::Runner::new(
        provider,
        Arc::new(DotTaikoIndexer::new()),
        config,
        cancel_token,
    );
    runner.run().await?;

    Ok(())
}

async fn wait_for_the_termination(cancel_token: CancellationToken) {
    info!("Starting signal handler...");
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            error!("Failed to set up SIGTERM handler: {}", e);
            return;
        }
    };
    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }
    cancel_token.cancel();
}
