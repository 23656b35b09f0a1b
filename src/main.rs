use anyhow::Context;
use tracing_subscriber::EnvFilter;

use pit_strategy_client::{
    config::ClientConfig, console, HttpBackend, OptimizationController, SelectionState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the console.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = ClientConfig::load().context("failed to load client configuration")?;
    match cfg.request_timeout() {
        Some(t) => tracing::info!("optimizer at {} (timeout {:?})", cfg.api_base, t),
        None => tracing::info!("optimizer at {} (no timeout)", cfg.api_base),
    }

    let backend = HttpBackend::new(&cfg.api_base, cfg.request_timeout())
        .context("failed to set up optimizer client")?;
    let controller = OptimizationController::new(backend);
    let mut selection = SelectionState::default();

    console::run(&controller, &mut selection, &cfg).await
}
