//! # gallery-api Entry Point
//!
//! Builds application state from configuration and serves the router.

use tower_http::trace::TraceLayer;

use gallery_api::{routes, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::from_env()?;
    let state = gallery_api::build_state(&config)?;

    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "gallery registry listening");
    axum::serve(listener, app).await?;
    Ok(())
}
