//! Server configuration, read from the environment.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// Placeholder in the upstream URL template replaced by the timetable identifier.
pub const IDENTIFIER_PLACEHOLDER: &str = "{id}";

static DEFAULT_TIMETABLE_URL: &str =
    "https://www.imperial.ac.uk/facilitiesmanagement/timetabling/mytimetable/ical/{id}/schedule.ics";

fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_timetable_url() -> String {
    DEFAULT_TIMETABLE_URL.to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

/// Settings for the HTTP service.
///
/// Every field maps to an upper-case environment variable of the same name,
/// e.g. `PORT` or `TIMETABLE_URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Upstream calendar URL, with `{id}` standing in for the identifier.
    #[serde(default = "default_timetable_url")]
    pub timetable_url: String,

    /// Limit on connecting to the upstream and on each read of its body.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let config: ServerConfig = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration from environment")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.timetable_url.contains(IDENTIFIER_PLACEHOLDER) {
            anyhow::bail!(
                "TIMETABLE_URL must contain the {} placeholder: {}",
                IDENTIFIER_PLACEHOLDER,
                self.timetable_url
            );
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Invalid BIND_ADDRESS: {}", self.bind_address))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Upstream URL for one timetable.
    pub fn timetable_url_for(&self, identifier: &str) -> String {
        self.timetable_url.replace(IDENTIFIER_PLACEHOLDER, identifier)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            bind_address: default_bind_address(),
            timetable_url: default_timetable_url(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_template() {
        let config = ServerConfig::default();
        assert_eq!(
            config.timetable_url_for("AB12"),
            "https://www.imperial.ac.uk/facilitiesmanagement/timetabling/mytimetable/ical/AB12/schedule.ics"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 9000,
            bind_address: "127.0.0.1".to_string(),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.socket_addr().unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let missing_placeholder = ServerConfig {
            timetable_url: "https://example.com/schedule.ics".to_string(),
            ..ServerConfig::default()
        };
        assert!(missing_placeholder.validate().is_err());

        let bad_address = ServerConfig {
            bind_address: "localhost:80".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad_address.validate().is_err());
    }
}
