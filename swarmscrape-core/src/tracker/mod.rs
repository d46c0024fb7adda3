//! UDP tracker scraping: wire protocol, per-tracker jobs, and concurrent fan-out.
//!
//! Implements the BEP 15 connect/scrape exchange over UDP. Each tracker is
//! queried by an isolated job owning its own socket; the coordinator fans
//! jobs out concurrently and aggregates their results.

pub mod address;
pub mod connection;
pub mod coordinator;
pub mod protocol;
pub mod scrape;
pub mod supplier;
pub mod types;

#[cfg(test)]
mod integration_tests;

// Re-export public API
pub use address::TrackerAddress;
pub use connection::UdpConnection;
pub use coordinator::ScrapeCoordinator;
pub use protocol::{ScrapeProtocol, ScrapeSession};
pub use scrape::TrackerScrapeJob;
pub use supplier::{HttpTrackerListSupplier, StaticTrackerList, TrackerListSupplier};
pub use types::{ScrapeEntry, SwarmStats, TrackerResult};

/// Errors that can occur during tracker scrape operations.
///
/// Covers infohash validation, tracker address parsing, socket failures,
/// and wire-protocol violations. No variant is ever fatal to trackers
/// other than the one that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Invalid infohash: {value}")]
    InvalidInfoHash { value: String },

    #[error("Invalid tracker URL: {url}")]
    InvalidTrackerUrl { url: String },

    #[error("Tracker connection failed: {tracker}")]
    ConnectionFailed { tracker: String },

    #[error("Tracker timed out: {tracker}")]
    Timeout { tracker: String },

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("URL parsing error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Tracker list fetch failed")]
    Http(#[from] reqwest::Error),
}
