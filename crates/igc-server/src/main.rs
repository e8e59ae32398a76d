//! igcinfo server - online service for IGC track inspection

mod api;
mod config;
mod error;
mod fields;
mod ident;
mod state;
mod uptime;

use anyhow::Result;
use axum::{extract::Request, ServiceExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("igc_server=debug".parse()?))
        .init();

    tracing::info!("Starting igcinfo server...");

    let config = Config::from_env()?;
    let state = Arc::new(AppState::new());

    // Build the app
    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Trailing-slash requests must hit the same routes, so the rewrite has to
    // run before router matching: wrap the router rather than layering it.
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
