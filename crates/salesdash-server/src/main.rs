//! Sales dashboard binary
//!
//! Configuration comes from the YAML file named by `SALESDASH_CONFIG`
//! (default `config.yaml`), then `.env`, then the environment.

use anyhow::Context;
use salesdash_data::DataBundle;
use salesdash_server::{logging, router, AppState, Config, Metrics};
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config_path =
        std::env::var("SALESDASH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;

    logging::init(&config.logging);

    let bundle = DataBundle::load(&config.data).context("failed to load dashboard data")?;
    info!(
        directory = %config.data.directory.display(),
        monthly_sales = bundle.monthly_sales().len(),
        product_summary = bundle.product_summary().len(),
        city_sales = bundle.city_sales().len(),
        new_customers = bundle.new_customers().len(),
        "Data loaded"
    );

    let metrics = Metrics::new().context("failed to register metrics")?;
    let state = AppState::new(bundle, config.dashboard.default_range(), metrics);

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Sales dashboard listening on http://{}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
