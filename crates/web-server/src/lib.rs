use analytics::AnalyticsEngine;
use axum::{routing::get, Router};
use dataset::Dataset;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// The dataset is loaded once at startup and never mutated, so handlers only
/// ever take shared references to it.
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub engine: AnalyticsEngine,
}

/// Builds the router serving the dashboard API.
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/date-bounds", get(handlers::get_date_bounds))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves the dashboard API until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
