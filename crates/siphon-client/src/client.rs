// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Public façade over the batching pipeline.
//!
//! A [`Client`] owns one [`Batcher`] and its background worker. Producers
//! call [`send`](Client::send) from any task; delivery happens off their
//! call path, and delivery problems never reach them.

use std::fmt;

use tracing::{info, warn};

use siphon_core::error::{EnqueueResult, SiphonResult};
use siphon_core::types::DataPoint;

use crate::batcher::{Batcher, BatcherStats};
use crate::config::ClientConfig;
use crate::sink::{HttpSink, Sink};

// =============================================================================
// Client
// =============================================================================

/// Asynchronous batching client for a time-series store.
///
/// Construction validates the configuration, builds the sink, and starts the
/// background worker, so a [`Client`] you hold is live. Submission is
/// fire-and-forget: [`send`](Client::send) hands the point to the worker and
/// returns; a full queue or a failed write is logged and the data dropped,
/// never surfaced to the producer. Call [`close`](Client::close) on the way
/// out to flush whatever is still buffered.
///
/// Dropping the client without `close` also ends the worker, which flushes
/// the tail on its way out; only `close` waits for that flush to finish.
///
/// # Examples
///
/// ```no_run
/// use siphon_client::{Client, DataPoint};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::connect("http://localhost:8086", "metrics")?;
///
///     client.send(
///         DataPoint::builder("cpu")
///             .tag("host", "web-01")
///             .field("usage", 0.87)
///             .build(),
///     );
///
///     client.close().await;
///     Ok(())
/// }
/// ```
pub struct Client<S: Sink + 'static = HttpSink> {
    batcher: Batcher<S>,
}

impl Client<HttpSink> {
    /// Creates a client for the given endpoint and database with default
    /// batching parameters.
    ///
    /// Must be called from within a Tokio runtime; the background worker is
    /// running before this returns.
    pub fn connect(endpoint: &str, database: &str) -> SiphonResult<Self> {
        Self::with_config(ClientConfig::new(endpoint, database))
    }

    /// Creates a client from a full configuration.
    ///
    /// Fails fast on an invalid configuration or endpoint; nothing is
    /// spawned in that case. Must be called from within a Tokio runtime.
    pub fn with_config(config: ClientConfig) -> SiphonResult<Self> {
        config.validate()?;

        let sink = HttpSink::connect(&config.endpoint, &config.database, config.request_timeout)?;
        Self::with_sink(sink, config)
    }
}

impl<S: Sink + 'static> Client<S> {
    /// Creates a client that flushes to the given sink.
    ///
    /// Must be called from within a Tokio runtime; the background worker is
    /// running before this returns.
    pub fn with_sink(sink: S, config: ClientConfig) -> SiphonResult<Self> {
        config.validate()?;

        let batcher = Batcher::new(sink, config);
        batcher.start();

        Ok(Self { batcher })
    }

    /// Submits a point, fire-and-forget.
    ///
    /// Returns immediately. If the point cannot be accepted, because the
    /// queue is saturated or the client is closed, it is dropped with a
    /// warning; use [`try_send`](Self::try_send) to observe that instead.
    pub fn send(&self, point: DataPoint) {
        if let Err(e) = self.batcher.enqueue(point) {
            warn!(error = %e, "Dropping point; enqueue failed");
        }
    }

    /// Submits a point, reporting enqueue failures to the caller.
    ///
    /// Same non-blocking submission as [`send`](Self::send); the error is
    /// returned instead of logged. Write failures are still invisible here,
    /// they happen later on the worker.
    pub fn try_send(&self, point: DataPoint) -> EnqueueResult<()> {
        self.batcher.enqueue(point)
    }

    /// Flushes pending points and stops the background worker.
    ///
    /// Waits for the final flush to complete. Idempotent; points submitted
    /// after `close` are dropped.
    pub async fn close(&self) {
        info!("Client closing; flushing pending points");
        self.batcher.stop().await;
    }

    /// Returns a snapshot of the batching counters.
    pub fn stats(&self) -> BatcherStats {
        self.batcher.stats()
    }

    /// Returns `true` until [`close`](Self::close) has stopped the worker.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.batcher.is_running()
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        self.batcher.config()
    }

    /// Returns a reference to the sink.
    #[inline]
    pub fn sink(&self) -> &S {
        self.batcher.sink()
    }
}

impl<S: Sink + 'static> fmt::Debug for Client<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("batcher", &self.batcher)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
