//! Application state for the web server.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sieve::{Inspector, InvalidationController};

/// Largest request body accepted before content-level truncation applies.
pub const DEFAULT_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Analysis pipeline; its provider calls block, so handlers run it on
    /// the blocking pool.
    pub inspector: Arc<Inspector>,
    /// Admin control path over the same cache the inspector reads.
    pub invalidation: InvalidationController,
    /// Transport cap on request bodies, in bytes.
    pub body_limit: usize,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state.
    pub fn new(inspector: Inspector, invalidation: InvalidationController) -> Self {
        Self {
            inspector: Arc::new(inspector),
            invalidation,
            body_limit: DEFAULT_BODY_LIMIT,
            started_at: Utc::now(),
        }
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }
}
