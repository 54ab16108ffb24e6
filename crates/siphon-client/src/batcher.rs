// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Batching engine: a bounded producer queue drained by a single background
//! worker with two flush triggers.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Batcher                              │
//! │                                                              │
//! │  producers ──try_send──▶ ┌─────────────┐    ┌─────────────┐  │
//! │  producers ──try_send──▶ │ mpsc queue  │───▶│ drain loop  │  │
//! │  producers ──try_send──▶ │  (bounded)  │    │ (one task)  │  │
//! │                          └─────────────┘    └──────┬──────┘  │
//! │                                                    │         │
//! │                flush on:  buffer == batch_size     ▼         │
//! │                           interval elapsed    ┌─────────┐    │
//! │                           shutdown            │  Sink   │    │
//! │                                               └─────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The worker accumulates points into a buffer of at most `batch_size` and
//! hands full or timed-out buffers to the sink, one flush at a time. A failed
//! write is logged and the batch dropped; nothing is retried and nothing
//! reaches a producer's call stack.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use siphon_core::error::{EnqueueError, EnqueueResult};
use siphon_core::types::DataPoint;

use crate::config::ClientConfig;
use crate::sink::Sink;

// =============================================================================
// Flush Triggers
// =============================================================================

/// What caused a flush, for log labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushTrigger {
    /// The buffer reached `batch_size`.
    Size,
    /// The flush interval elapsed.
    Interval,
    /// The worker is shutting down.
    Shutdown,
}

impl FlushTrigger {
    fn as_str(&self) -> &'static str {
        match self {
            FlushTrigger::Size => "size",
            FlushTrigger::Interval => "interval",
            FlushTrigger::Shutdown => "shutdown",
        }
    }
}

// =============================================================================
// Batcher Stats
// =============================================================================

/// Counters for one batcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatcherStats {
    /// Points accepted into the queue.
    pub points_enqueued: u64,
    /// Points rejected at enqueue (queue full or worker gone).
    pub points_rejected: u64,
    /// Successful flushes.
    pub batches_flushed: u64,
    /// Points delivered by successful flushes.
    pub points_flushed: u64,
    /// Failed flushes.
    pub flush_failures: u64,
    /// Points dropped by failed flushes.
    pub points_dropped: u64,
    /// When the last successful flush completed.
    pub last_flush_time: Option<DateTime<Utc>>,
}

/// Internal counter tracking.
#[derive(Debug, Default)]
struct StatsInner {
    points_enqueued: AtomicU64,
    points_rejected: AtomicU64,
    batches_flushed: AtomicU64,
    points_flushed: AtomicU64,
    flush_failures: AtomicU64,
    points_dropped: AtomicU64,
    last_flush_time: std::sync::RwLock<Option<DateTime<Utc>>>,
}

impl StatsInner {
    fn record_enqueued(&self) {
        self.points_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rejected(&self) {
        self.points_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_flush_success(&self, points: u64) {
        self.batches_flushed.fetch_add(1, Ordering::Relaxed);
        self.points_flushed.fetch_add(points, Ordering::Relaxed);

        if let Ok(mut last) = self.last_flush_time.write() {
            *last = Some(Utc::now());
        }
    }

    fn record_flush_failure(&self, points: u64) {
        self.flush_failures.fetch_add(1, Ordering::Relaxed);
        self.points_dropped.fetch_add(points, Ordering::Relaxed);
    }

    fn snapshot(&self) -> BatcherStats {
        let last_flush = self.last_flush_time.read().ok().and_then(|g| *g);

        BatcherStats {
            points_enqueued: self.points_enqueued.load(Ordering::Relaxed),
            points_rejected: self.points_rejected.load(Ordering::Relaxed),
            batches_flushed: self.batches_flushed.load(Ordering::Relaxed),
            points_flushed: self.points_flushed.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            points_dropped: self.points_dropped.load(Ordering::Relaxed),
            last_flush_time: last_flush,
        }
    }
}

// =============================================================================
// Batcher
// =============================================================================

/// Accepts points from many concurrent producers and flushes batches to a
/// [`Sink`] from a single background worker.
///
/// Each batcher owns exactly one worker task. The worker buffers points up to
/// `batch_size` and flushes on whichever comes first: the buffer filling or
/// the flush interval elapsing. Buffers are flushed strictly sequentially,
/// points in enqueue order within a buffer, each point in exactly one flush.
///
/// The lifecycle is construct → [`start`](Self::start) → [`stop`](Self::stop).
/// A stopped batcher cannot be restarted; construct a new one.
pub struct Batcher<S: Sink + 'static> {
    /// Configuration.
    config: ClientConfig,

    /// The flush destination, shared with the worker.
    sink: Arc<S>,

    /// Producer handle of the bounded queue.
    tx: mpsc::Sender<DataPoint>,

    /// Consumer handle, taken by the worker on first start.
    rx: Mutex<Option<mpsc::Receiver<DataPoint>>>,

    /// The worker task handle, owned by this instance.
    worker: Mutex<Option<JoinHandle<()>>>,

    /// Shutdown signal.
    shutdown: Arc<Notify>,

    /// Whether the worker is running.
    running: Arc<AtomicBool>,

    /// Counter tracking.
    stats: Arc<StatsInner>,
}

impl<S: Sink + 'static> Batcher<S> {
    /// Creates a new batcher. The worker is not running until
    /// [`start`](Self::start) is called.
    pub fn new(sink: S, config: ClientConfig) -> Self {
        Self::with_shared(Arc::new(sink), config)
    }

    /// Creates a new batcher around a shared sink.
    pub fn with_shared(sink: Arc<S>, config: ClientConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.effective_queue_capacity());

        Self {
            config,
            sink,
            tx,
            rx: Mutex::new(Some(rx)),
            worker: Mutex::new(None),
            shutdown: Arc::new(Notify::new()),
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(StatsInner::default()),
        }
    }

    /// Enqueues a point for the background worker.
    ///
    /// Never blocks. A saturated queue fails immediately with
    /// [`EnqueueError::QueueFull`] instead of suspending the producer; an
    /// exited worker fails with [`EnqueueError::WorkerGone`]. The default
    /// queue capacity of fifty batches makes `QueueFull` an overload signal,
    /// not a steady-state condition.
    pub fn enqueue(&self, point: DataPoint) -> EnqueueResult<()> {
        match self.tx.try_send(point) {
            Ok(()) => {
                self.stats.record_enqueued();
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.stats.record_rejected();
                Err(EnqueueError::queue_full(self.config.effective_queue_capacity()))
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.record_rejected();
                Err(EnqueueError::WorkerGone)
            }
        }
    }

    /// Starts the background drain/flush worker.
    ///
    /// Idempotent: the first call spawns the worker and returns `true`; any
    /// later call, including after [`stop`](Self::stop), spawns nothing and
    /// returns `false`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime context.
    pub fn start(&self) -> bool {
        let mut worker_slot = self.worker.lock();

        if self.running.load(Ordering::SeqCst) {
            debug!("Batcher worker already running");
            return false;
        }

        let rx = match self.rx.lock().take() {
            Some(rx) => rx,
            None => {
                debug!("Batcher worker already ran; not restarting");
                return false;
            }
        };

        self.running.store(true, Ordering::SeqCst);

        let handle = tokio::spawn(Self::drain_loop(
            rx,
            self.sink.clone(),
            self.config.clone(),
            self.shutdown.clone(),
            self.running.clone(),
            self.stats.clone(),
        ));
        *worker_slot = Some(handle);

        info!(
            batch_size = self.config.batch_size,
            interval_ms = self.config.flush_interval.as_millis() as u64,
            queue_capacity = self.config.effective_queue_capacity(),
            sink = self.sink.name(),
            "Batcher worker started"
        );

        true
    }

    /// The single-consumer drain/flush loop.
    async fn drain_loop(
        mut rx: mpsc::Receiver<DataPoint>,
        sink: Arc<S>,
        config: ClientConfig,
        shutdown: Arc<Notify>,
        running: Arc<AtomicBool>,
        stats: Arc<StatsInner>,
    ) {
        let batch_size = config.batch_size;
        let mut buffer: Vec<DataPoint> = Vec::with_capacity(batch_size);

        // First tick one full period out, so the timer never fires at start.
        let mut interval = tokio::time::interval_at(
            tokio::time::Instant::now() + config.flush_interval,
            config.flush_interval,
        );
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Consistent tie-break: shutdown beats a ready point, a
                // ready point beats the tick.
                biased;

                _ = shutdown.notified() => {
                    // Take what producers already queued, then flush the tail.
                    while let Ok(point) = rx.try_recv() {
                        buffer.push(point);
                        if buffer.len() >= batch_size {
                            Self::flush(&sink, &mut buffer, batch_size, &stats, FlushTrigger::Shutdown).await;
                        }
                    }
                    Self::flush(&sink, &mut buffer, batch_size, &stats, FlushTrigger::Shutdown).await;
                    break;
                }
                maybe_point = rx.recv() => {
                    match maybe_point {
                        Some(point) => {
                            buffer.push(point);
                            if buffer.len() >= batch_size {
                                Self::flush(&sink, &mut buffer, batch_size, &stats, FlushTrigger::Size).await;
                            }
                        }
                        None => {
                            // Every sender dropped: flush the tail and exit.
                            Self::flush(&sink, &mut buffer, batch_size, &stats, FlushTrigger::Shutdown).await;
                            break;
                        }
                    }
                }
                _ = interval.tick() => {
                    Self::flush(&sink, &mut buffer, batch_size, &stats, FlushTrigger::Interval).await;
                }
            }
        }

        running.store(false, Ordering::SeqCst);
        info!("Batcher worker stopped");
    }

    /// Flushes the buffer to the sink. An empty buffer is a no-op.
    ///
    /// The buffer is handed off by value and replaced with a fresh one, so a
    /// new batch can never see entries from a previous one. Failures are
    /// terminal for the batch: logged, counted, dropped.
    async fn flush(
        sink: &Arc<S>,
        buffer: &mut Vec<DataPoint>,
        batch_size: usize,
        stats: &Arc<StatsInner>,
        trigger: FlushTrigger,
    ) {
        if buffer.is_empty() {
            return;
        }

        let points = std::mem::replace(buffer, Vec::with_capacity(batch_size));
        let count = points.len();
        let start = std::time::Instant::now();

        match sink.write(&points).await {
            Ok(()) => {
                stats.record_flush_success(count as u64);
                debug!(
                    points = count,
                    trigger = trigger.as_str(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    sink = sink.name(),
                    "Flush completed"
                );
            }
            Err(e) => {
                stats.record_flush_failure(count as u64);
                warn!(
                    error = %e,
                    points = count,
                    trigger = trigger.as_str(),
                    sink = sink.name(),
                    "Flush failed; dropping batch"
                );
            }
        }
    }

    /// Signals the worker to flush any partially-filled buffer and exit,
    /// then waits for it to finish.
    ///
    /// Idempotent. Once `stop` returns, the final flush has completed and
    /// later calls to [`enqueue`](Self::enqueue) report
    /// [`EnqueueError::WorkerGone`].
    pub async fn stop(&self) {
        let handle = self.worker.lock().take();

        match handle {
            Some(handle) => {
                info!("Stopping batcher worker");
                self.shutdown.notify_one();

                if let Err(e) = handle.await {
                    warn!(error = %e, "Batcher worker ended abnormally");
                }
            }
            None => {
                debug!("Batcher worker not running; nothing to stop");
            }
        }
    }

    /// Returns `true` if the worker is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> BatcherStats {
        self.stats.snapshot()
    }

    /// Returns the number of points waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.config.effective_queue_capacity() - self.tx.capacity()
    }

    /// Returns the producer queue capacity.
    #[inline]
    pub fn queue_capacity(&self) -> usize {
        self.config.effective_queue_capacity()
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns a reference to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: Sink + 'static> fmt::Debug for Batcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batcher")
            .field("running", &self.is_running())
            .field("queued", &self.queue_len())
            .field("batch_size", &self.config.batch_size)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
