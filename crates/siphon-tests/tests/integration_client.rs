// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Client Integration Tests
//!
//! Integration tests for the client façade:
//!
//! - Construction and validation failures
//! - Lifecycle: start, close, final flush
//! - Fire-and-forget error swallowing
//! - YAML configuration end to end
//!
//! ## Test Categories
//!
//! - `test_client_construction_*`: Constructor validation
//! - `test_client_lifecycle_*`: Start/close behavior
//! - `test_client_config_*`: Configuration plumbing
//! - `test_client_stats_*`: Counter snapshots

use std::time::Duration;

use siphon_client::{Client, ClientConfig, MockSink, SiphonError};

use siphon_tests::common::fixtures::{ConfigFixtures, PointFixtures};
use siphon_tests::common::init_test_logging;

// =============================================================================
// Construction Tests
// =============================================================================

#[tokio::test]
async fn test_client_construction_rejects_invalid_config() {
    let empty_database = ClientConfig::builder()
        .endpoint("http://localhost:8086")
        .database("")
        .build();
    let err = Client::with_config(empty_database).unwrap_err();
    assert!(matches!(err, SiphonError::Config(_)));

    let zero_batch = ClientConfig::builder()
        .endpoint("http://localhost:8086")
        .database("metrics")
        .batch_size(0)
        .build();
    let err = Client::with_config(zero_batch).unwrap_err();
    assert!(matches!(err, SiphonError::Config(_)));
}

#[tokio::test]
async fn test_client_construction_rejects_malformed_endpoint() {
    let config = ClientConfig::builder()
        .endpoint("not a url")
        .database("metrics")
        .build();

    let err = Client::with_config(config).unwrap_err();
    assert!(matches!(err, SiphonError::Connect(_)));
}

#[tokio::test]
async fn test_client_connect_builds_http_pipeline() {
    // Real HttpSink construction; no point is ever sent, so nothing
    // touches the network
    let client = Client::connect("http://localhost:9999/nowhere", "metrics").unwrap();

    assert!(client.is_running());
    assert_eq!(client.config().batch_size, 100);
    assert_eq!(client.config().flush_interval, Duration::from_millis(500));
    assert_eq!(client.config().effective_queue_capacity(), 5_000);

    client.close().await;
    assert!(!client.is_running());
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_client_lifecycle_close_flushes_partial_batch() {
    init_test_logging();

    let client = Client::with_sink(MockSink::new(), ConfigFixtures::quiet(100)).unwrap();

    for point in PointFixtures::batch(7) {
        client.send(point);
    }

    client.close().await;

    assert!(!client.is_running());
    assert_eq!(client.sink().batch_sizes(), vec![7]);
}

#[tokio::test]
async fn test_client_lifecycle_send_after_close_is_swallowed() {
    let client = Client::with_sink(MockSink::new(), ConfigFixtures::quiet(10)).unwrap();
    client.close().await;

    // Dropped with a warning, never a panic or an error to the caller
    client.send(PointFixtures::sequenced(0));

    assert_eq!(client.stats().points_rejected, 1);
    assert_eq!(client.sink().write_count(), 0);
}

#[tokio::test]
async fn test_client_lifecycle_mixed_payloads_delivered() {
    let client = Client::with_sink(MockSink::new(), ConfigFixtures::quiet(10)).unwrap();

    client.send(PointFixtures::mixed_fields());
    client.send(PointFixtures::temperature("room1", 23.5));
    client.send(PointFixtures::field_less());

    client.close().await;

    // The batcher carries every point; field-less ones are only skipped
    // at encode time inside the HTTP sink
    let batches = client.sink().recorded_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 3);
    assert_eq!(batches[0][0].field_count(), 4);
    assert!(batches[0][2].has_no_fields());
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[tokio::test]
async fn test_client_config_yaml_drives_batching() {
    let yaml = r#"
endpoint: "http://localhost:9999/test"
database: "itest"
batch_size: 3
flush_interval: 60000
"#;

    let config = ClientConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.database, "itest");
    assert_eq!(config.flush_interval, Duration::from_secs(60));

    let client = Client::with_sink(MockSink::new(), config).unwrap();

    for point in PointFixtures::batch(3) {
        client.send(point);
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(client.sink().batch_sizes(), vec![3]);

    client.close().await;
}

#[tokio::test]
async fn test_client_config_queue_capacity_scales_with_batch_size() {
    let client = Client::with_sink(MockSink::new(), ConfigFixtures::quiet(20)).unwrap();

    // Unset capacity defaults to fifty batches worth of points
    assert_eq!(client.config().effective_queue_capacity(), 1_000);

    client.close().await;
}

// =============================================================================
// Stats Tests
// =============================================================================

#[tokio::test]
async fn test_client_stats_reflect_pipeline_activity() {
    let client = Client::with_sink(MockSink::new(), ConfigFixtures::fast(5, 100)).unwrap();

    for point in PointFixtures::batch(5) {
        client.send(point);
    }

    tokio::time::sleep(Duration::from_millis(300)).await;

    let stats = client.stats();
    assert_eq!(stats.points_enqueued, 5);
    assert_eq!(stats.batches_flushed, 1);
    assert_eq!(stats.points_flushed, 5);
    assert_eq!(stats.flush_failures, 0);
    assert!(stats.last_flush_time.is_some());

    client.close().await;
}
