use crate::handlers;
use aid_matcher::AnalysisService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisService>,
    pub maps_api_key: Option<String>,
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/api/analyze", post(handlers::analyze))
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
