//! Injectable tracker-list suppliers.

use async_trait::async_trait;

use super::ScrapeError;
use crate::config::NetworkConfig;

/// Source of tracker URL strings consulted when the caller supplies none.
///
/// Implementations return zero or more strings, each expected to parse as
/// a URL with scheme, host, and port.
#[async_trait]
pub trait TrackerListSupplier: Send + Sync {
    /// Fetches the current tracker list.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::Http` - Supplier endpoint unreachable or errored
    async fn fetch_trackers(&self) -> Result<Vec<String>, ScrapeError>;
}

/// Supplier backed by an HTTP endpoint serving a newline-delimited list,
/// such as the newTrackon stable-tracker feed.
pub struct HttpTrackerListSupplier {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTrackerListSupplier {
    /// Creates a supplier for the endpoint configured in [`NetworkConfig`].
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            endpoint: config.supplier_endpoint.clone(),
            client: reqwest::Client::builder()
                .timeout(config.supplier_timeout)
                .user_agent(config.user_agent)
                .build()
                .expect("HTTP client creation should not fail"),
        }
    }
}

#[async_trait]
impl TrackerListSupplier for HttpTrackerListSupplier {
    async fn fetch_trackers(&self) -> Result<Vec<String>, ScrapeError> {
        tracing::debug!("Fetching tracker list from {}", self.endpoint);
        let body = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_tracker_list(&body))
    }
}

/// Splits a newline-delimited tracker list, dropping blank lines.
fn parse_tracker_list(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Fixed tracker list, for injection and tests.
pub struct StaticTrackerList {
    trackers: Vec<String>,
}

impl StaticTrackerList {
    pub fn new(trackers: Vec<String>) -> Self {
        Self { trackers }
    }
}

#[async_trait]
impl TrackerListSupplier for StaticTrackerList {
    async fn fetch_trackers(&self) -> Result<Vec<String>, ScrapeError> {
        Ok(self.trackers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tracker_list_drops_blank_lines() {
        let body = "udp://a.example.com:80/announce\n\n  \nudp://b.example.com:6969\n";
        assert_eq!(
            parse_tracker_list(body),
            vec![
                "udp://a.example.com:80/announce".to_string(),
                "udp://b.example.com:6969".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_static_list_returns_fixed_entries() {
        let supplier = StaticTrackerList::new(vec!["udp://a.example.com:80".to_string()]);
        let trackers = supplier.fetch_trackers().await.unwrap();
        assert_eq!(trackers, vec!["udp://a.example.com:80".to_string()]);
    }
}
