//! Swarmscrape Core - UDP tracker scraping
//!
//! This crate implements the client side of the BitTorrent UDP tracker
//! scrape extension (BEP 15): the connect/scrape exchange against a single
//! tracker, and the concurrent fan-out of that exchange across a list of
//! trackers for a shared set of infohashes.

pub mod config;
pub mod infohash;
pub mod tracker;

// Re-export main types for convenient access
pub use config::{NetworkConfig, ScraperConfig};
pub use infohash::{InfoHash, InfohashInput, ParsedInfohashes, ScrapeTarget};
pub use tracker::{
    HttpTrackerListSupplier, ScrapeCoordinator, ScrapeEntry, ScrapeError, StaticTrackerList,
    SwarmStats, TrackerAddress, TrackerListSupplier, TrackerResult,
};
