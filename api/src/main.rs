mod analyze_request;
mod analyze_response;
mod handlers;
mod page;
mod routes;
mod ui_state;

use aid_matcher::{AnalysisService, Config, FirestoreCatalog, GeminiService};
use anyhow::{Context, Result};
use routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("Server stopped: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    for name in config.missing_credentials() {
        log::warn!("{} is not set; requests that need it will fail", name);
    }

    // One pooled client for both outbound services.
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("failed to build HTTP client")?;

    let catalog = Arc::new(FirestoreCatalog::new(client.clone(), &config));
    let model = Arc::new(GeminiService::new(client, &config));
    let analysis = Arc::new(AnalysisService::new(catalog, model, config.limits));

    let app = routes::router(
        AppState {
            analysis,
            maps_api_key: config.maps_api_key.clone(),
        },
        config.max_body_bytes,
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
