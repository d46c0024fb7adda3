//! Tracker endpoint parsing and scheme filtering.

use std::fmt;

use url::Url;

use super::ScrapeError;

/// Parsed tracker endpoint.
///
/// Derived from a tracker URL string; any path component is dropped since
/// the scrape exchange addresses the host and port directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerAddress {
    scheme: String,
    host: String,
    port: u16,
}

impl TrackerAddress {
    /// Parses a tracker URL string into its scheme, host, and port.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::UrlParsing` - Not a parseable URL
    /// - `ScrapeError::InvalidTrackerUrl` - Missing host or port
    pub fn parse(raw: &str) -> Result<Self, ScrapeError> {
        let url = Url::parse(raw)?;
        let host = url
            .host_str()
            .ok_or_else(|| ScrapeError::InvalidTrackerUrl {
                url: raw.to_string(),
            })?
            .to_string();
        let port = url.port().ok_or_else(|| ScrapeError::InvalidTrackerUrl {
            url: raw.to_string(),
        })?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port,
        })
    }

    /// Returns true when the tracker speaks the UDP protocol.
    pub fn is_udp(&self) -> bool {
        self.scheme == "udp"
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for TrackerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Parses tracker URLs and keeps only UDP-scheme entries.
///
/// Unparseable entries are dropped rather than failing the whole list.
pub fn filter_udp_trackers(urls: &[String]) -> Vec<TrackerAddress> {
    urls.iter()
        .filter_map(|raw| match TrackerAddress::parse(raw) {
            Ok(address) => Some(address),
            Err(error) => {
                tracing::debug!("Skipping unparseable tracker {}: {}", raw, error);
                None
            }
        })
        .filter(TrackerAddress::is_udp)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_udp_tracker() {
        let address = TrackerAddress::parse("udp://tracker.example.com:6969/announce").unwrap();
        assert!(address.is_udp());
        assert_eq!(address.host(), "tracker.example.com");
        assert_eq!(address.port(), 6969);
        assert_eq!(address.to_string(), "udp://tracker.example.com:6969");
    }

    #[test]
    fn test_parse_rejects_missing_port() {
        let result = TrackerAddress::parse("udp://tracker.example.com");
        assert!(matches!(
            result,
            Err(ScrapeError::InvalidTrackerUrl { .. })
        ));
    }

    #[test]
    fn test_filter_keeps_only_udp() {
        let urls = vec![
            "udp://a.example.com:80/announce".to_string(),
            "https://b.example.com:443/announce".to_string(),
            "not a url".to_string(),
            "udp://c.example.com:1337".to_string(),
        ];
        let addresses = filter_udp_trackers(&urls);
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0].host(), "a.example.com");
        assert_eq!(addresses[1].host(), "c.example.com");
    }
}
