use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod form;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, WebConfig};

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/report", get(handlers::report))
        .route("/analyze/:company", get(handlers::analyze))
        .route("/audio/:file", get(handlers::audio))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves the app until the process stops.
pub async fn serve(state: AppState, addr: &str) -> ns_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use ns_core::{AnalysisResult, Result, Error};
    pub use crate::{create_app, serve, AppState, WebConfig};
}
