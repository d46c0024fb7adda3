//! Infohash validation and parsing.

use std::fmt;

use crate::tracker::ScrapeError;

/// Length of a hex-encoded SHA-1 infohash.
pub const INFOHASH_HEX_LEN: usize = 40;

/// SHA-1 hash identifying a unique torrent.
///
/// 20-byte SHA-1 hash of the info dictionary from a torrent file.
/// Used to uniquely identify torrents across the BitTorrent network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Creates InfoHash from 20-byte SHA-1 hash.
    pub fn new(hash: [u8; 20]) -> Self {
        Self(hash)
    }

    /// Parses InfoHash from its 40-character hex string form.
    ///
    /// Validation is strict: the string must be exactly 40 characters and
    /// every character must be a hex digit, case-insensitive.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::InvalidInfoHash` - Wrong length or non-hex character
    pub fn from_hex(s: &str) -> Result<Self, ScrapeError> {
        if s.len() != INFOHASH_HEX_LEN {
            return Err(ScrapeError::InvalidInfoHash {
                value: s.to_string(),
            });
        }
        let mut hash = [0u8; 20];
        hex::decode_to_slice(s, &mut hash).map_err(|_| ScrapeError::InvalidInfoHash {
            value: s.to_string(),
        })?;
        Ok(Self(hash))
    }

    /// Returns reference to underlying 20-byte hash.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A validated infohash queued for scraping.
///
/// Keeps the caller's original string form so results echo exactly what
/// was supplied, regardless of hex casing.
#[derive(Debug, Clone)]
pub struct ScrapeTarget {
    /// Infohash as supplied by the caller
    pub raw: String,
    /// Decoded 20-byte hash sent on the wire
    pub info_hash: InfoHash,
}

/// Caller-supplied infohash set.
///
/// Either one string (split on commas when present) or a list of strings.
#[derive(Debug, Clone)]
pub enum InfohashInput {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for InfohashInput {
    fn from(raw: &str) -> Self {
        Self::Single(raw.to_string())
    }
}

impl From<String> for InfohashInput {
    fn from(raw: String) -> Self {
        Self::Single(raw)
    }
}

impl From<Vec<String>> for InfohashInput {
    fn from(list: Vec<String>) -> Self {
        Self::Many(list)
    }
}

/// Outcome of parsing an infohash set.
///
/// Invalid entries are not discarded outright: they are tracked so each
/// tracker result can report them as per-entry errors.
#[derive(Debug, Clone, Default)]
pub struct ParsedInfohashes {
    /// Entries that passed validation, input order preserved
    pub targets: Vec<ScrapeTarget>,
    /// Non-blank entries that failed validation, input order preserved
    pub rejected: Vec<String>,
}

/// Checks whether a candidate string is a well-formed infohash.
pub fn is_valid_infohash(s: &str) -> bool {
    s.len() == INFOHASH_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Drops invalid candidates, preserving input order. Idempotent.
pub fn filter_valid(candidates: &[String]) -> Vec<String> {
    candidates
        .iter()
        .filter(|candidate| is_valid_infohash(candidate))
        .cloned()
        .collect()
}

/// Splits, trims, and validates an infohash set.
///
/// A single string is split on commas; segments are trimmed and blank
/// segments dropped entirely, so `"A,B, , ,"` parses the same as the
/// pre-split list `["A", "B"]`. Empty input yields an empty result, not
/// an error.
pub fn parse_infohashes(input: &InfohashInput) -> ParsedInfohashes {
    let candidates: Vec<String> = match input {
        InfohashInput::Single(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect(),
        InfohashInput::Many(list) => list
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(String::from)
            .collect(),
    };

    let mut parsed = ParsedInfohashes::default();
    for candidate in candidates {
        match InfoHash::from_hex(&candidate) {
            Ok(info_hash) => parsed.targets.push(ScrapeTarget {
                raw: candidate,
                info_hash,
            }),
            Err(_) => parsed.rejected.push(candidate),
        }
    }
    parsed
}
