//! BEP 15 wire format and the connect/scrape exchange.
//!
//! All integers are unsigned and big-endian on the wire. The protocol id
//! and connection id are 64-bit; actions, transaction ids, and swarm
//! counters are 32-bit. Decoding advances a cursor by declared field
//! widths instead of slicing by hand-computed offsets.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::ScrapeError;
use super::connection::UdpConnection;
use super::types::{ScrapeEntry, SwarmStats};
use crate::infohash::ScrapeTarget;

/// Magic constant identifying the UDP tracker protocol in connect requests.
pub const PROTOCOL_ID: u64 = 0x41727101980;

/// Action code for a connect request.
pub const ACTION_CONNECT: u32 = 0;

/// Action code for a scrape request.
pub const ACTION_SCRAPE: u32 = 2;

/// Size of a connect response (action, transaction id, connection id).
pub const CONNECT_RESPONSE_LEN: usize = 16;

/// Size of the scrape response header (action, transaction id).
pub const SCRAPE_RESPONSE_HEADER_LEN: usize = 8;

/// Size of one swarm-statistics record in a scrape response.
pub const SCRAPE_STATS_LEN: usize = 12;

/// Size of one raw infohash in a scrape request.
pub const INFOHASH_LEN: usize = 20;

/// Session established by a successful connect handshake.
///
/// The connection id authorizes the scrape request that follows; the
/// transaction id carries over to it. Neither outlives one
/// handshake-to-scrape cycle.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeSession {
    pub connection_id: u64,
    pub transaction_id: u32,
}

/// Decoded connect response fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectResponse {
    pub action: u32,
    pub transaction_id: u32,
    pub connection_id: u64,
}

/// Drives the two-phase connect/scrape exchange over one [`UdpConnection`].
///
/// The handshake establishes a short-lived session; the scrape retrieves
/// swarm counters for a batch of infohashes within that session.
pub struct ScrapeProtocol {
    connection: UdpConnection,
}

impl ScrapeProtocol {
    /// Wraps an established connection.
    pub fn new(connection: UdpConnection) -> Self {
        Self { connection }
    }

    /// Performs the connect handshake.
    ///
    /// Sends a connect request under a fresh random transaction id and
    /// decodes the tracker's response. A response echoing a different
    /// transaction id is stale or spoofed and is rejected.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::Timeout` - No response within the window
    /// - `ScrapeError::ConnectionFailed` - Socket failure
    /// - `ScrapeError::Protocol` - Undersized response or transaction id mismatch
    pub async fn handshake(&self) -> Result<ScrapeSession, ScrapeError> {
        let transaction_id = random_transaction_id();

        tracing::debug!(
            "Connecting to tracker {} with transaction id {}",
            self.connection.tracker(),
            transaction_id
        );
        self.connection
            .send(&encode_connect_request(transaction_id))
            .await?;

        let response = self.connection.receive(CONNECT_RESPONSE_LEN).await?;
        let decoded = decode_connect_response(&response)?;

        if decoded.transaction_id != transaction_id {
            return Err(ScrapeError::Protocol {
                message: format!(
                    "Transaction id mismatch: sent {transaction_id}, received {}",
                    decoded.transaction_id
                ),
            });
        }

        Ok(ScrapeSession {
            connection_id: decoded.connection_id,
            transaction_id,
        })
    }

    /// Scrapes swarm statistics for the given infohashes within a session.
    ///
    /// Entries come back in the same order the infohashes were supplied.
    /// A truncated response yields error entries for the infohashes whose
    /// records did not fully arrive.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::Timeout` - No response within the window
    /// - `ScrapeError::ConnectionFailed` - Socket failure
    /// - `ScrapeError::Protocol` - Response shorter than its header
    pub async fn scrape(
        &self,
        session: &ScrapeSession,
        targets: &[ScrapeTarget],
    ) -> Result<Vec<ScrapeEntry>, ScrapeError> {
        tracing::debug!(
            "Scraping {} infohashes from tracker {}",
            targets.len(),
            self.connection.tracker()
        );
        self.connection
            .send(&encode_scrape_request(session, targets))
            .await?;

        let max_len = SCRAPE_RESPONSE_HEADER_LEN + SCRAPE_STATS_LEN * targets.len();
        let response = self.connection.receive(max_len).await?;
        decode_scrape_response(&response, targets)
    }
}

/// Picks a transaction id uniformly from [1, 65535].
fn random_transaction_id() -> u32 {
    rand::random_range(1..=65535)
}

/// Encodes a connect request: protocol id, connect action, transaction id.
pub(crate) fn encode_connect_request(transaction_id: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(16);
    buf.put_u64(PROTOCOL_ID);
    buf.put_u32(ACTION_CONNECT);
    buf.put_u32(transaction_id);
    buf.freeze()
}

/// Decodes a connect response.
///
/// # Errors
///
/// - `ScrapeError::Protocol` - Fewer than 16 bytes
pub(crate) fn decode_connect_response(
    mut response: &[u8],
) -> Result<ConnectResponse, ScrapeError> {
    if response.remaining() < CONNECT_RESPONSE_LEN {
        return Err(ScrapeError::Protocol {
            message: format!("Connect response too short: {} bytes", response.remaining()),
        });
    }

    Ok(ConnectResponse {
        action: response.get_u32(),
        transaction_id: response.get_u32(),
        connection_id: response.get_u64(),
    })
}

/// Encodes a scrape request: connection id, scrape action, transaction id,
/// then one 20-byte raw hash per infohash, input order preserved.
pub(crate) fn encode_scrape_request(session: &ScrapeSession, targets: &[ScrapeTarget]) -> Bytes {
    let mut buf = BytesMut::with_capacity(16 + INFOHASH_LEN * targets.len());
    buf.put_u64(session.connection_id);
    buf.put_u32(ACTION_SCRAPE);
    buf.put_u32(session.transaction_id);
    for target in targets {
        buf.put_slice(target.info_hash.as_bytes());
    }
    buf.freeze()
}

/// Decodes a scrape response into per-infohash entries.
///
/// Consumes one 12-byte record per target in order. When the remaining
/// buffer cannot hold a full record, that target and all following ones
/// become error entries; the buffer is never read past its end.
///
/// # Errors
///
/// - `ScrapeError::Protocol` - Response shorter than the 8-byte header
pub(crate) fn decode_scrape_response(
    mut response: &[u8],
    targets: &[ScrapeTarget],
) -> Result<Vec<ScrapeEntry>, ScrapeError> {
    if response.remaining() < SCRAPE_RESPONSE_HEADER_LEN {
        return Err(ScrapeError::Protocol {
            message: format!("Scrape response too short: {} bytes", response.remaining()),
        });
    }

    let _action = response.get_u32();
    let _transaction_id = response.get_u32();

    let mut entries = Vec::with_capacity(targets.len());
    for target in targets {
        if response.remaining() < SCRAPE_STATS_LEN {
            entries.push(ScrapeEntry::error(&target.raw, "Truncated scrape response"));
            continue;
        }
        let stats = SwarmStats {
            seeders: response.get_u32(),
            completed: response.get_u32(),
            leechers: response.get_u32(),
        };
        entries.push(ScrapeEntry::stats(&target.raw, stats));
    }

    Ok(entries)
}
