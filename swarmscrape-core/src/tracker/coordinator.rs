//! Concurrent fan-out of scrape jobs across trackers.

use std::sync::Arc;

use futures::future::join_all;

use super::ScrapeError;
use super::address::filter_udp_trackers;
use super::scrape::TrackerScrapeJob;
use super::supplier::{HttpTrackerListSupplier, TrackerListSupplier};
use super::types::TrackerResult;
use crate::config::ScraperConfig;
use crate::infohash::{InfohashInput, parse_infohashes};

/// Fans out one scrape job per tracker and aggregates their results.
///
/// Jobs run as independent tokio tasks with no shared mutable state; the
/// only synchronization is the final join. Trackers that never became
/// reachable contribute nothing to the aggregate.
pub struct ScrapeCoordinator {
    config: ScraperConfig,
    supplier: Arc<dyn TrackerListSupplier>,
}

impl ScrapeCoordinator {
    /// Creates a coordinator using the HTTP tracker-list supplier from the
    /// configured endpoint.
    pub fn new(config: ScraperConfig) -> Self {
        let supplier = Arc::new(HttpTrackerListSupplier::new(&config.network));
        Self { config, supplier }
    }

    /// Creates a coordinator with an injected tracker-list supplier.
    pub fn with_supplier(config: ScraperConfig, supplier: Arc<dyn TrackerListSupplier>) -> Self {
        Self { config, supplier }
    }

    /// Scrapes all UDP trackers for the given infohash set.
    ///
    /// When `trackers` is `None` the supplier is consulted. Infohashes are
    /// validated once up front; if none survive, no tracker is contacted
    /// and the result is empty. The output order across trackers follows
    /// completion order, not input order.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::Http` - Tracker-list supplier fetch failed
    pub async fn scrape(
        &self,
        trackers: Option<Vec<String>>,
        infohashes: InfohashInput,
    ) -> Result<Vec<TrackerResult>, ScrapeError> {
        let parsed = parse_infohashes(&infohashes);
        if parsed.targets.is_empty() {
            tracing::info!("Nothing to scrape: no infohashes passed validation");
            return Ok(Vec::new());
        }

        let urls = match trackers {
            Some(urls) => urls,
            None => self.supplier.fetch_trackers().await?,
        };
        let addresses = filter_udp_trackers(&urls);

        tracing::info!(
            "Scraping {} infohashes across {} trackers",
            parsed.targets.len(),
            addresses.len()
        );

        let targets = Arc::new(parsed.targets);
        let rejected = Arc::new(parsed.rejected);

        let mut handles = Vec::with_capacity(addresses.len());
        for address in addresses {
            let targets = Arc::clone(&targets);
            let rejected = Arc::clone(&rejected);
            let timeout = self.config.network.scrape_timeout;
            handles.push(tokio::spawn(async move {
                TrackerScrapeJob::new(address, timeout)
                    .run(&targets, &rejected)
                    .await
            }));
        }

        let outcomes = join_all(handles).await;
        Ok(outcomes
            .into_iter()
            .filter_map(|joined| joined.ok().flatten())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    /// Supplier that must not be consulted; fails the scrape if it is.
    struct UnreachableSupplier;

    #[async_trait]
    impl TrackerListSupplier for UnreachableSupplier {
        async fn fetch_trackers(&self) -> Result<Vec<String>, ScrapeError> {
            Err(ScrapeError::Protocol {
                message: "Supplier should not have been consulted".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_empty_good_set_short_circuits_before_supplier() {
        let coordinator = ScrapeCoordinator::with_supplier(
            ScraperConfig::default(),
            Arc::new(UnreachableSupplier),
        );

        let results = coordinator
            .scrape(None, InfohashInput::from("short"))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_supplier_failure_propagates() {
        let coordinator = ScrapeCoordinator::with_supplier(
            ScraperConfig::default(),
            Arc::new(UnreachableSupplier),
        );

        let result = coordinator
            .scrape(
                None,
                InfohashInput::from("95105d919c10e64ae4fa31067a8d37ccd33fe92d"),
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_no_udp_trackers_yields_empty_aggregate() {
        let coordinator = ScrapeCoordinator::new(ScraperConfig::default());

        let results = coordinator
            .scrape(
                Some(vec!["https://tracker.example.com:8443/announce".to_string()]),
                InfohashInput::from("95105d919c10e64ae4fa31067a8d37ccd33fe92d"),
            )
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
