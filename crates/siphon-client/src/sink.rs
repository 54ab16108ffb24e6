// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Flush destinations: the [`Sink`] trait, the HTTP line-protocol sink, and
//! a recording mock for tests.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use siphon_core::error::{ConnectError, ConnectResult, WriteError, WriteResult};
use siphon_core::types::DataPoint;

use crate::line_protocol;

// =============================================================================
// Sink Trait
// =============================================================================

/// A flush destination for batches of points.
///
/// The batcher worker hands over whole batches, one at a time; a batch is
/// never empty. A returned error means the batch was not delivered. The
/// batcher logs the error and drops the batch, so implementations that want
/// redelivery must arrange it themselves.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Writes one batch to the destination.
    async fn write(&self, points: &[DataPoint]) -> WriteResult<()>;

    /// Short destination name for log labels.
    fn name(&self) -> &str;
}

// =============================================================================
// HTTP Sink
// =============================================================================

/// Writes batches to an InfluxDB v1-compatible `/write` endpoint as line
/// protocol.
#[derive(Debug, Clone)]
pub struct HttpSink {
    /// Full write URL with `db` and `precision` query parameters baked in.
    url: reqwest::Url,

    /// Pooled HTTP client.
    client: reqwest::Client,
}

impl HttpSink {
    /// Creates a sink for the given endpoint and database.
    ///
    /// Validates the endpoint URL and builds the HTTP client; no request is
    /// made, so an unreachable store surfaces later as a write failure, not
    /// here.
    pub fn connect(
        endpoint: &str,
        database: &str,
        request_timeout: Duration,
    ) -> ConnectResult<Self> {
        let mut url = reqwest::Url::parse(endpoint)
            .map_err(|e| ConnectError::invalid_endpoint(endpoint, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConnectError::invalid_endpoint(
                    endpoint,
                    format!("unsupported scheme '{}'", other),
                ));
            }
        }
        if url.host_str().is_none() {
            return Err(ConnectError::invalid_endpoint(endpoint, "missing host"));
        }

        // Append /write to whatever base path the endpoint carries
        url.path_segments_mut()
            .map_err(|_| ConnectError::invalid_endpoint(endpoint, "endpoint cannot be a base URL"))?
            .pop_if_empty()
            .push("write");
        url.query_pairs_mut()
            .append_pair("db", database)
            .append_pair("precision", "ns");

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| ConnectError::client_build(e.to_string()))?;

        Ok(Self { url, client })
    }

    /// Returns the full write URL.
    #[inline]
    pub fn write_url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn write(&self, points: &[DataPoint]) -> WriteResult<()> {
        let body = line_protocol::encode_batch(points);
        if body.is_empty() {
            // Every point in the batch was field-less; nothing to send
            trace!(points = points.len(), "Batch encoded to nothing; skipping write");
            return Ok(());
        }

        let response = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| WriteError::http_with_source(e.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WriteError::status(status.as_u16(), body));
        }

        trace!(points = points.len(), "Write accepted");
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

// =============================================================================
// Mock Sink
// =============================================================================

/// In-memory [`Sink`] for tests: counts writes, records every batch it
/// receives, and can be told to fail on demand.
#[derive(Debug)]
pub struct MockSink {
    /// Number of successful writes.
    write_count: AtomicU64,

    /// Total points across successful writes.
    points_written: AtomicU64,

    /// When set, every write fails.
    should_fail: AtomicBool,

    /// Message carried by simulated failures.
    failure_message: String,

    /// Batches received by successful writes, in order.
    batches: Mutex<Vec<Vec<DataPoint>>>,
}

impl MockSink {
    /// Creates a mock sink that accepts every write.
    pub fn new() -> Self {
        Self::with_message("mock sink write refused")
    }

    /// Creates a mock sink that fails every write with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        let sink = Self::with_message(message);
        sink.should_fail.store(true, Ordering::SeqCst);
        sink
    }

    fn with_message(message: impl Into<String>) -> Self {
        Self {
            write_count: AtomicU64::new(0),
            points_written: AtomicU64::new(0),
            should_fail: AtomicBool::new(false),
            failure_message: message.into(),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Makes subsequent writes fail or succeed.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of successful writes.
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Returns the total number of points across successful writes.
    pub fn points_written(&self) -> u64 {
        self.points_written.load(Ordering::SeqCst)
    }

    /// Returns every successfully written batch, in write order.
    pub fn recorded_batches(&self) -> Vec<Vec<DataPoint>> {
        self.batches.lock().clone()
    }

    /// Returns the sizes of successfully written batches, in write order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Vec::len).collect()
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for MockSink {
    async fn write(&self, points: &[DataPoint]) -> WriteResult<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(WriteError::http(self.failure_message.clone()));
        }

        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.points_written.fetch_add(points.len() as u64, Ordering::SeqCst);
        self.batches.lock().push(points.to_vec());
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_point(seq: i64) -> DataPoint {
        DataPoint::builder("sink_test")
            .field("seq", seq)
            .build()
    }

    #[test]
    fn test_connect_builds_write_url() {
        let sink = HttpSink::connect("http://localhost:8086", "metrics", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            sink.write_url(),
            "http://localhost:8086/write?db=metrics&precision=ns"
        );
    }

    #[test]
    fn test_connect_keeps_base_path_and_trailing_slash() {
        let sink =
            HttpSink::connect("https://influx.example.com/proxy/", "db", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            sink.write_url(),
            "https://influx.example.com/proxy/write?db=db&precision=ns"
        );
    }

    #[test]
    fn test_connect_encodes_database_name() {
        let sink = HttpSink::connect("http://localhost:8086", "my db", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            sink.write_url(),
            "http://localhost:8086/write?db=my+db&precision=ns"
        );
    }

    #[test]
    fn test_connect_rejects_malformed_endpoint() {
        let err = HttpSink::connect("not a url", "metrics", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_connect_rejects_unsupported_scheme() {
        let err = HttpSink::connect("ftp://localhost:21", "metrics", Duration::from_secs(1))
            .unwrap_err();
        match err {
            ConnectError::InvalidEndpoint { message, .. } => {
                assert!(message.contains("unsupported scheme"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_sink_records_batches_in_order() {
        let sink = MockSink::new();

        sink.write(&[sample_point(0), sample_point(1)]).await.unwrap();
        sink.write(&[sample_point(2)]).await.unwrap();

        assert_eq!(sink.write_count(), 2);
        assert_eq!(sink.points_written(), 3);
        assert_eq!(sink.batch_sizes(), vec![2, 1]);

        let batches = sink.recorded_batches();
        assert_eq!(batches[1][0].fields().get("seq").and_then(|v| v.as_i64()), Some(2));
    }

    #[tokio::test]
    async fn test_mock_sink_failure_carries_message() {
        let sink = MockSink::failing("store unavailable");

        let err = sink.write(&[sample_point(0)]).await.unwrap_err();
        assert!(err.to_string().contains("store unavailable"));
        assert_eq!(sink.write_count(), 0);
        assert!(sink.recorded_batches().is_empty());
    }

    #[tokio::test]
    async fn test_mock_sink_recovers_after_failure() {
        let sink = MockSink::failing("down");

        assert!(sink.write(&[sample_point(0)]).await.is_err());

        sink.set_should_fail(false);
        sink.write(&[sample_point(1)]).await.unwrap();

        assert_eq!(sink.write_count(), 1);
        assert_eq!(sink.points_written(), 1);
    }
}
