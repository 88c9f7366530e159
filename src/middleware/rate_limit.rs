use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;

/// Caps how many analyses run at once.
pub struct ConcurrencyLimiter {
    semaphore: Semaphore,
    max_concurrent: usize,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RateLimitMetrics {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub available_permits: usize,
    pub max_concurrent: usize,
}

impl ConcurrencyLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        info!(
            max_concurrent_requests = max_concurrent,
            "Initializing request semaphore"
        );
        Self {
            semaphore: Semaphore::new(max_concurrent),
            max_concurrent,
            total_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    /// Takes a permit for one analysis, or rejects when all are in use.
    pub fn try_acquire(&self, path: &str) -> AppResult<SemaphorePermit<'_>> {
        let total_requests = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;

        let permit = self.semaphore.try_acquire().map_err(|_| {
            let rejected = self.rejected_requests.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                path = path,
                total_requests = total_requests,
                rejected_requests = rejected,
                "Rate limit exceeded - too many concurrent analyses"
            );
            AppError::RateLimitExceeded
        })?;

        debug!(
            path = path,
            available_permits = self.semaphore.available_permits(),
            "Request permit acquired"
        );

        Ok(permit)
    }

    pub fn metrics(&self) -> RateLimitMetrics {
        RateLimitMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            available_permits: self.semaphore.available_permits(),
            max_concurrent: self.max_concurrent,
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();
    let _permit = state.limiter.try_acquire(&path)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_limiter_reports_all_permits_available() {
        let limiter = ConcurrencyLimiter::new(3);
        let metrics = limiter.metrics();
        assert_eq!(metrics.available_permits, 3);
        assert_eq!(metrics.max_concurrent, 3);
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.rejected_requests, 0);
    }

    #[test]
    fn held_permit_reduces_availability() {
        let limiter = ConcurrencyLimiter::new(1);
        let permit = limiter.try_acquire("/analyze").unwrap();
        assert_eq!(limiter.metrics().available_permits, 0);
        drop(permit);
        assert_eq!(limiter.metrics().available_permits, 1);
    }

    #[test]
    fn exhausted_limiter_rejects_and_counts() {
        let limiter = ConcurrencyLimiter::new(1);
        let _held = limiter.try_acquire("/analyze").unwrap();

        let err = limiter.try_acquire("/api/v1/analyze").unwrap_err();

        assert!(matches!(err, AppError::RateLimitExceeded));
        let metrics = limiter.metrics();
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.rejected_requests, 1);
    }
}
