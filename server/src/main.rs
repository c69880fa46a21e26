mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use extractor_service_cli::fetcher::{FetchOptions, PageFetcher};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let fetcher = PageFetcher::new(FetchOptions {
        timeout: config.fetch_timeout,
        ..FetchOptions::default()
    })?;
    let state = AppState::new(Arc::new(fetcher));

    let app = routes::app(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
