use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use crate::services::{ScanOutcome, TokenScanner};

pub struct AppState {
    pub scanner: Arc<TokenScanner>,
}

/// GET /scan/:address - fetch and score one token
async fn scan_token(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Response {
    match state.scanner.scan(&address).await {
        ScanOutcome::Assessed(report) => Json(report).into_response(),
        ScanOutcome::Unavailable { address, reason } => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "address": address,
                "error": reason,
            })),
        )
            .into_response(),
    }
}

/// GET /stats
async fn stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.scanner.stats().to_json())
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

pub fn create_rest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scan/:address", get(scan_token))
        .route("/stats", get(stats))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
