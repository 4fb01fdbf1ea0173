use std::{net::SocketAddr, path::Path, sync::Arc};

use action_center::ActionCatalog;
use anyhow::Context;
use client_core::CalculationClient;
use tracing::info;

mod api;
mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings()?;
    let catalog = match &settings.catalog_path {
        Some(path) => ActionCatalog::from_json_file(Path::new(path))
            .with_context(|| format!("failed to load action catalog from {path}"))?,
        None => ActionCatalog::fallback(),
    };
    info!(actions = catalog.len(), "action catalog ready");

    let calculations = CalculationClient::new(&settings.calculation_service_url)?;
    info!(
        calculation_service = %calculations.base_url(),
        "calculation service configured"
    );

    let state = AppState {
        catalog,
        calculations: Arc::new(calculations),
    };
    let app = api::build_router(Arc::new(state), settings.max_request_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
