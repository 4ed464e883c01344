//! Shared state for the upload server

use std::sync::Arc;
use std::time::Instant;

use crate::inference::Predictor;

/// State shared by all request handlers. Only read-only resources live
/// here; navigation state travels with each request.
pub struct AppState {
    /// Loaded before the listener binds
    pub predictor: Arc<Predictor>,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(predictor: Arc<Predictor>) -> Self {
        Self {
            predictor,
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;
