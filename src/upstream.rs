//! Fetching timetables from the upstream calendar service.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, Response};

use crate::config::ServerConfig;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the upstream timetable feed.
#[derive(Clone)]
pub struct Upstream {
    client: Client,
    config: Arc<ServerConfig>,
}

impl Upstream {
    pub fn new(config: Arc<ServerConfig>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.upstream_timeout())
            .read_timeout(config.upstream_timeout())
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Upstream { client, config })
    }

    /// Start fetching the timetable for `identifier`.
    ///
    /// Resolves once the response headers arrive; the body is left unread so
    /// it can be streamed. A non-success status counts as a failed fetch.
    pub async fn fetch(&self, identifier: &str) -> reqwest::Result<Response> {
        let url = self.config.timetable_url_for(identifier);
        tracing::debug!(%url, "fetching timetable");

        self.client.get(&url).send().await?.error_for_status()
    }
}
