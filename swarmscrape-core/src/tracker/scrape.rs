//! Per-tracker scrape job.

use std::time::Duration;

use super::ScrapeError;
use super::address::TrackerAddress;
use super::connection::UdpConnection;
use super::protocol::ScrapeProtocol;
use super::types::{ScrapeEntry, TrackerResult};
use crate::infohash::ScrapeTarget;

/// Runs the full connect/scrape exchange against one tracker.
///
/// The job exclusively owns its socket for its lifetime and never shares
/// mutable state with other jobs, so any number of jobs can run
/// concurrently with failures fully isolated per tracker.
pub struct TrackerScrapeJob {
    address: TrackerAddress,
    timeout: Duration,
}

impl TrackerScrapeJob {
    /// Creates a job bound to one tracker with a per-receive timeout.
    pub fn new(address: TrackerAddress, timeout: Duration) -> Self {
        Self { address, timeout }
    }

    /// Executes the exchange for the given infohash set.
    ///
    /// Returns `None` when the tracker never became reachable (connect
    /// failure, or a timeout/socket error during the handshake) - the
    /// coordinator drops such trackers from the aggregate. Post-connect
    /// failures produce a `TrackerResult` carrying a tracker-level error.
    /// On every returned result, infohashes that failed validation are
    /// appended as `Bad infohash` error entries after the decoded entries.
    pub async fn run(
        &self,
        targets: &[ScrapeTarget],
        rejected: &[String],
    ) -> Option<TrackerResult> {
        let tracker = self.address.to_string();

        let connection = match UdpConnection::connect(&self.address, self.timeout).await {
            Ok(connection) => connection,
            Err(error) => {
                tracing::debug!("Tracker {} unreachable: {}", tracker, error);
                return None;
            }
        };

        let protocol = ScrapeProtocol::new(connection);

        let session = match protocol.handshake().await {
            Ok(session) => session,
            Err(error @ (ScrapeError::Timeout { .. } | ScrapeError::ConnectionFailed { .. })) => {
                tracing::debug!("Tracker {} did not answer the handshake: {}", tracker, error);
                return None;
            }
            Err(error) => {
                tracing::warn!("Tracker {} handshake failed: {}", tracker, error);
                return Some(TrackerResult {
                    tracker,
                    results: rejected_entries(rejected),
                    error: Some(error.to_string()),
                });
            }
        };

        match protocol.scrape(&session, targets).await {
            Ok(mut results) => {
                results.extend(rejected_entries(rejected));
                Some(TrackerResult {
                    tracker,
                    results,
                    error: None,
                })
            }
            Err(error) => {
                tracing::warn!("Tracker {} scrape failed: {}", tracker, error);
                Some(TrackerResult {
                    tracker,
                    results: rejected_entries(rejected),
                    error: Some(error.to_string()),
                })
            }
        }
    }
}

/// Builds `Bad infohash` error entries, preserving the rejects' order.
fn rejected_entries(rejected: &[String]) -> Vec<ScrapeEntry> {
    rejected
        .iter()
        .map(|infohash| ScrapeEntry::error(infohash, "Bad infohash"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_entries_preserve_order() {
        let rejected = vec!["first".to_string(), "second".to_string()];
        let entries = rejected_entries(&rejected);
        assert_eq!(
            entries,
            vec![
                ScrapeEntry::error("first", "Bad infohash"),
                ScrapeEntry::error("second", "Bad infohash"),
            ]
        );
    }
}
