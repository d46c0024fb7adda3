//! End-to-end scrape scenarios against an in-process mock UDP tracker.

use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, BufMut, BytesMut};
use tokio::net::UdpSocket;

use super::coordinator::ScrapeCoordinator;
use super::supplier::StaticTrackerList;
use super::types::{ScrapeEntry, SwarmStats};
use crate::config::ScraperConfig;
use crate::infohash::InfohashInput;

const HASH_A: &str = "95105d919c10e64ae4fa31067a8d37ccd33fe92d";
const HASH_B: &str = "0123456789abcdef0123456789abcdef01234567";

/// How the mock tracker misbehaves, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockBehavior {
    /// Well-formed connect and scrape responses
    Healthy,
    /// Connect response echoes the wrong transaction id
    MismatchedTransactionId,
    /// Scrape response cut down to the given byte length
    TruncatedScrape(usize),
    /// Never answers anything
    Silent,
}

/// Spawns a single-session mock tracker on a loopback port and returns its
/// URL. Replies with one statistics record per infohash actually received,
/// taken in order from `stats`.
async fn spawn_mock_tracker(stats: Vec<SwarmStats>, behavior: MockBehavior) -> String {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    tokio::spawn(async move {
        if behavior == MockBehavior::Silent {
            // Hold the port open without ever answering.
            tokio::time::sleep(Duration::from_secs(60)).await;
            return;
        }

        let mut buf = [0u8; 4096];

        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let mut request = &buf[..len];
        assert_eq!(request.get_u64(), super::protocol::PROTOCOL_ID);
        assert_eq!(request.get_u32(), super::protocol::ACTION_CONNECT);
        let transaction_id = request.get_u32();

        let mut reply = BytesMut::new();
        reply.put_u32(super::protocol::ACTION_CONNECT);
        if behavior == MockBehavior::MismatchedTransactionId {
            reply.put_u32(transaction_id.wrapping_add(1));
        } else {
            reply.put_u32(transaction_id);
        }
        reply.put_u64(0x4142_4344_4546_4748);
        socket.send_to(&reply, peer).await.unwrap();

        if behavior == MockBehavior::MismatchedTransactionId {
            return;
        }

        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let mut request = &buf[..len];
        assert_eq!(request.get_u64(), 0x4142_4344_4546_4748);
        assert_eq!(request.get_u32(), super::protocol::ACTION_SCRAPE);
        let transaction_id = request.get_u32();
        let hash_count = request.remaining() / super::protocol::INFOHASH_LEN;

        let mut reply = BytesMut::new();
        reply.put_u32(super::protocol::ACTION_SCRAPE);
        reply.put_u32(transaction_id);
        for record in stats.iter().take(hash_count) {
            reply.put_u32(record.seeders);
            reply.put_u32(record.completed);
            reply.put_u32(record.leechers);
        }
        let reply = match behavior {
            MockBehavior::TruncatedScrape(len) => reply.split_to(len.min(reply.len())),
            _ => reply,
        };
        socket.send_to(&reply, peer).await.unwrap();
    });

    format!("udp://127.0.0.1:{port}")
}

fn test_config(timeout: Duration) -> ScraperConfig {
    let mut config = ScraperConfig::default();
    config.network.scrape_timeout = timeout;
    config
}

#[tokio::test]
async fn test_healthy_tracker_single_infohash() {
    let tracker = spawn_mock_tracker(
        vec![SwarmStats {
            seeders: 5,
            completed: 2,
            leechers: 3,
        }],
        MockBehavior::Healthy,
    )
    .await;

    let coordinator = ScrapeCoordinator::new(test_config(Duration::from_secs(2)));
    let results = coordinator
        .scrape(Some(vec![tracker.clone()]), InfohashInput::from(HASH_A))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].tracker, tracker);
    assert_eq!(results[0].error, None);
    assert_eq!(
        results[0].results,
        vec![ScrapeEntry::Stats {
            infohash: HASH_A.to_string(),
            seeders: 5,
            completed: 2,
            leechers: 3,
        }]
    );
}

#[tokio::test]
async fn test_bad_infohash_reported_and_kept_off_the_wire() {
    let tracker = spawn_mock_tracker(
        vec![
            SwarmStats {
                seeders: 7,
                completed: 1,
                leechers: 0,
            },
            // Never sent: the mock only answers for hashes it received.
            SwarmStats {
                seeders: 99,
                completed: 99,
                leechers: 99,
            },
        ],
        MockBehavior::Healthy,
    )
    .await;

    let coordinator = ScrapeCoordinator::new(test_config(Duration::from_secs(2)));
    let input = InfohashInput::Many(vec![HASH_A.to_string(), "short".to_string()]);
    let results = coordinator
        .scrape(Some(vec![tracker]), input)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].results,
        vec![
            ScrapeEntry::Stats {
                infohash: HASH_A.to_string(),
                seeders: 7,
                completed: 1,
                leechers: 0,
            },
            ScrapeEntry::Error {
                infohash: "short".to_string(),
                error: "Bad infohash".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_unreachable_tracker_contributes_nothing() {
    // Reserve a port, then release it so nothing is listening there.
    let port = {
        let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.local_addr().unwrap().port()
    };
    let tracker = format!("udp://127.0.0.1:{port}");

    let coordinator = ScrapeCoordinator::new(test_config(Duration::from_millis(300)));
    let results = coordinator
        .scrape(Some(vec![tracker]), InfohashInput::from(HASH_A))
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_silent_tracker_isolated_from_healthy_one() {
    let healthy = spawn_mock_tracker(
        vec![SwarmStats {
            seeders: 1,
            completed: 1,
            leechers: 1,
        }],
        MockBehavior::Healthy,
    )
    .await;
    let silent = spawn_mock_tracker(Vec::new(), MockBehavior::Silent).await;

    let coordinator = ScrapeCoordinator::new(test_config(Duration::from_millis(500)));
    let results = coordinator
        .scrape(
            Some(vec![silent, healthy.clone()]),
            InfohashInput::from(HASH_A),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].tracker, healthy);
    assert_eq!(results[0].error, None);
}

#[tokio::test]
async fn test_transaction_id_mismatch_is_tracker_level_error() {
    let tracker = spawn_mock_tracker(Vec::new(), MockBehavior::MismatchedTransactionId).await;

    let coordinator = ScrapeCoordinator::new(test_config(Duration::from_secs(2)));
    let input = InfohashInput::Many(vec![HASH_A.to_string(), "xyz".to_string()]);
    let results = coordinator
        .scrape(Some(vec![tracker.clone()]), input)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].tracker, tracker);
    let error = results[0].error.as_deref().unwrap();
    assert!(error.contains("Transaction id mismatch"), "got: {error}");
    // Bad infohashes still ride along on the error path.
    assert_eq!(
        results[0].results,
        vec![ScrapeEntry::Error {
            infohash: "xyz".to_string(),
            error: "Bad infohash".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_truncated_scrape_response_yields_partial_entries() {
    let tracker = spawn_mock_tracker(
        vec![
            SwarmStats {
                seeders: 4,
                completed: 3,
                leechers: 2,
            },
            SwarmStats {
                seeders: 9,
                completed: 8,
                leechers: 7,
            },
        ],
        // Header plus exactly one full record.
        MockBehavior::TruncatedScrape(8 + 12),
    )
    .await;

    let coordinator = ScrapeCoordinator::new(test_config(Duration::from_secs(2)));
    let input = InfohashInput::Many(vec![HASH_A.to_string(), HASH_B.to_string()]);
    let results = coordinator
        .scrape(Some(vec![tracker]), input)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].error, None);
    assert_eq!(
        results[0].results,
        vec![
            ScrapeEntry::Stats {
                infohash: HASH_A.to_string(),
                seeders: 4,
                completed: 3,
                leechers: 2,
            },
            ScrapeEntry::Error {
                infohash: HASH_B.to_string(),
                error: "Truncated scrape response".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_supplier_backed_scrape() {
    let tracker = spawn_mock_tracker(
        vec![SwarmStats {
            seeders: 11,
            completed: 12,
            leechers: 13,
        }],
        MockBehavior::Healthy,
    )
    .await;

    let supplier = StaticTrackerList::new(vec![
        "https://www.example.com:8443/announce".to_string(),
        tracker.clone(),
    ]);
    let coordinator = ScrapeCoordinator::with_supplier(
        test_config(Duration::from_secs(2)),
        Arc::new(supplier),
    );

    let results = coordinator
        .scrape(None, InfohashInput::from(HASH_A))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].tracker, tracker);
}
