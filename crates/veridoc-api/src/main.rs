//! # veridoc-api Entry Point
//!
//! Binds the router and serves until shutdown. The listen address comes
//! from `VERIDOC_LISTEN` (default `0.0.0.0:7070`).

use veridoc_api::{routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = AppState::new();
    let app = routes::router(state);

    let addr = std::env::var("VERIDOC_LISTEN").unwrap_or_else(|_| "0.0.0.0:7070".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "veridoc api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
