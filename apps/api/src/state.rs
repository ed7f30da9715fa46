use std::sync::Arc;

use crate::config::Config;
use crate::document::sessions::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Open editing sessions, one document store per cover letter id.
    pub sessions: Arc<SessionRegistry>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            sessions: Arc::new(SessionRegistry::new(
                config.max_sessions,
                config.default_layout_mode,
            )),
            config,
        }
    }
}
