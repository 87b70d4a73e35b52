use std::sync::Arc;

use anyhow::Result;

use crate::config::ServerConfig;
use crate::upstream::Upstream;

/// Shared application state
///
/// Holds only the configured upstream client; every request builds its own
/// filter, so nothing mutable is shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Upstream,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let upstream = Upstream::new(Arc::new(config))?;
        Ok(AppState { upstream })
    }
}
