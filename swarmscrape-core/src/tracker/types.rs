//! Result model for tracker scrape operations.

use serde::Serialize;

/// Swarm statistics for one torrent as decoded off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwarmStats {
    /// Number of seeders (peers with the complete content)
    pub seeders: u32,
    /// Historical total of completed downloads
    pub completed: u32,
    /// Number of leechers (peers downloading)
    pub leechers: u32,
}

/// Per-infohash outcome of one tracker scrape.
///
/// Either the decoded swarm statistics, or an error for an infohash that
/// failed validation or whose response record was unusable. Serializes to
/// the flat `{"infohash": ..., "seeders": ...}` / `{"infohash": ...,
/// "error": ...}` shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScrapeEntry {
    Stats {
        infohash: String,
        seeders: u32,
        completed: u32,
        leechers: u32,
    },
    Error {
        infohash: String,
        error: String,
    },
}

impl ScrapeEntry {
    /// Creates a statistics entry for an infohash.
    pub fn stats(infohash: impl Into<String>, stats: SwarmStats) -> Self {
        Self::Stats {
            infohash: infohash.into(),
            seeders: stats.seeders,
            completed: stats.completed,
            leechers: stats.leechers,
        }
    }

    /// Creates an error entry for an infohash.
    pub fn error(infohash: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            infohash: infohash.into(),
            error: error.into(),
        }
    }

    /// Returns the infohash this entry reports on.
    pub fn infohash(&self) -> &str {
        match self {
            Self::Stats { infohash, .. } | Self::Error { infohash, .. } => infohash,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Outcome of one tracker's scrape job.
///
/// Decoded entries come first in infohash input order, followed by error
/// entries for infohashes that failed validation. `error` is set when the
/// exchange failed after the tracker was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerResult {
    /// Tracker endpoint as `scheme://host:port`
    pub tracker: String,
    /// Per-infohash outcomes
    pub results: Vec<ScrapeEntry>,
    /// Tracker-level failure, if the exchange broke down mid-session
    pub error: Option<String>,
}
