//! Centralized configuration for Swarmscrape.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Central configuration for all Swarmscrape components.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ScraperConfig {
    pub network: NetworkConfig,
}

/// Network communication and tracker configuration.
///
/// Controls socket timeouts and the tracker-list supplier endpoint.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Per-tracker UDP receive timeout for the connect and scrape phases
    pub scrape_timeout: Duration,
    /// HTTP request timeout for tracker-list supplier requests
    pub supplier_timeout: Duration,
    /// Endpoint serving a newline-delimited list of public tracker URLs
    pub supplier_endpoint: String,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            scrape_timeout: Duration::from_secs(10),
            supplier_timeout: Duration::from_secs(30),
            supplier_endpoint: "https://newtrackon.com/api/stable".to_string(),
            user_agent: "swarmscrape/0.1.0",
        }
    }
}

impl ScraperConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("SWARMSCRAPE_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.network.scrape_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(endpoint) = std::env::var("SWARMSCRAPE_TRACKER_LIST_URL") {
            config.network.supplier_endpoint = endpoint;
        }

        config
    }
}
