//! UDP socket ownership for one tracker exchange.

use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::ScrapeError;
use super::address::TrackerAddress;

/// One UDP socket bound to one tracker.
///
/// The socket is connected in the default-destination sense, so datagrams
/// are implicitly addressed to the tracker. Every receive is bounded by
/// the configured timeout. The socket is released on drop.
pub struct UdpConnection {
    socket: UdpSocket,
    tracker: String,
    receive_timeout: Duration,
}

impl UdpConnection {
    /// Resolves the tracker address and connects a fresh UDP socket to it.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::ConnectionFailed` - Bind, DNS resolution, or connect failure
    pub async fn connect(
        address: &TrackerAddress,
        receive_timeout: Duration,
    ) -> Result<Self, ScrapeError> {
        let tracker = address.to_string();

        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(|error| {
            tracing::debug!("Failed to bind UDP socket for {}: {}", tracker, error);
            ScrapeError::ConnectionFailed {
                tracker: tracker.clone(),
            }
        })?;

        socket
            .connect((address.host(), address.port()))
            .await
            .map_err(|error| {
                tracing::debug!("Failed to connect to {}: {}", tracker, error);
                ScrapeError::ConnectionFailed {
                    tracker: tracker.clone(),
                }
            })?;

        Ok(Self {
            socket,
            tracker,
            receive_timeout,
        })
    }

    /// Sends one datagram containing the full packet.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::ConnectionFailed` - Socket write failure
    pub async fn send(&self, packet: &[u8]) -> Result<(), ScrapeError> {
        self.socket.send(packet).await.map_err(|error| {
            tracing::debug!("Failed to send to {}: {}", self.tracker, error);
            ScrapeError::ConnectionFailed {
                tracker: self.tracker.clone(),
            }
        })?;
        Ok(())
    }

    /// Receives one datagram of at most `max_len` bytes.
    ///
    /// # Errors
    ///
    /// - `ScrapeError::Timeout` - No datagram within the configured window
    /// - `ScrapeError::ConnectionFailed` - Socket read failure (e.g. an ICMP
    ///   port-unreachable surfacing as a reset)
    pub async fn receive(&self, max_len: usize) -> Result<Vec<u8>, ScrapeError> {
        let mut buf = vec![0u8; max_len];
        match timeout(self.receive_timeout, self.socket.recv(&mut buf)).await {
            Ok(Ok(received)) => {
                buf.truncate(received);
                Ok(buf)
            }
            Ok(Err(error)) => {
                tracing::debug!("Failed to receive from {}: {}", self.tracker, error);
                Err(ScrapeError::ConnectionFailed {
                    tracker: self.tracker.clone(),
                })
            }
            Err(_) => Err(ScrapeError::Timeout {
                tracker: self.tracker.clone(),
            }),
        }
    }

    /// Returns the tracker this socket is connected to, for logging.
    pub fn tracker(&self) -> &str {
        &self.tracker
    }
}
