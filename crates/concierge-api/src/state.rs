//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use concierge_chat::Assistant;
use concierge_core::config::ConciergeConfig;

/// Shared application state, passed to handlers via axum's State extractor.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConciergeConfig>,
    pub assistant: Arc<Assistant>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ConciergeConfig, assistant: Assistant) -> Self {
        Self {
            config: Arc::new(config),
            assistant: Arc::new(assistant),
            start_time: Instant::now(),
        }
    }
}
