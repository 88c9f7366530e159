pub mod analyze;
pub mod form;
pub mod health;
pub mod page;

pub use analyze::*;
pub use health::*;
pub use page::*;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::{logging_middleware, rate_limit_middleware, ConcurrencyLimiter};
use crate::services::{AssumptionAnalyzer, CompletionClient, OpenAiClient};

/// Multipart framing and the small text fields ride on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<AssumptionAnalyzer>,
    pub limiter: Arc<ConcurrencyLimiter>,
    pub max_file_size_mb: usize,
}

impl AppState {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        max_file_size_mb: usize,
        max_concurrent_requests: usize,
    ) -> Self {
        Self {
            analyzer: Arc::new(AssumptionAnalyzer::new(client)),
            limiter: Arc::new(ConcurrencyLimiter::new(max_concurrent_requests)),
            max_file_size_mb,
        }
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Wires the real model client from the loaded configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = OpenAiClient::new(config.completion_settings())?;
        tracing::info!(endpoint = client.endpoint(), "Model client configured");
        Ok(Self::new(
            Arc::new(client),
            config.max_file_size_mb,
            config.max_concurrent_requests,
        ))
    }
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_file_size_bytes() + FORM_OVERHEAD_BYTES;

    // The form page takes its permit itself so a rejection still renders as a page.
    let api_routes = Router::new()
        .route("/api/v1/analyze", post(analyze_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_page_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .merge(api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}
