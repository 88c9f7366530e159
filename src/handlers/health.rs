use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::handlers::AppState;
use crate::models::DocumentFormat;

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    info!("Health check requested");

    let formats: Vec<&str> = DocumentFormat::ALL.iter().map(|f| f.extension()).collect();
    let media_types: Vec<&str> = DocumentFormat::ALL.iter().map(|f| f.mime_type()).collect();
    let metrics = state.limiter.metrics();

    let response = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.analyzer.model(),
        "supported_formats": formats,
        "supported_media_types": media_types,
        "rate_limiting": {
            "total_requests": metrics.total_requests,
            "rejected_requests": metrics.rejected_requests,
            "available_permits": metrics.available_permits,
            "max_concurrent": metrics.max_concurrent,
        }
    });

    info!(
        available_permits = metrics.available_permits,
        "Health check completed"
    );

    Json(response)
}

/// Readiness check endpoint
pub async fn ready_handler() -> StatusCode {
    info!("Readiness check passed");
    StatusCode::OK
}
