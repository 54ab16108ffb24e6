// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # siphon-client
//!
//! Asynchronous batching client for InfluxDB-style time-series stores.
//!
//! Producers hand points to a [`Client`] and move on. The points cross a
//! bounded queue to a single background worker that groups them into batches
//! and writes each batch once, to one destination:
//!
//! ```text
//! send() ──▶ bounded queue ──▶ worker (batch + flush) ──▶ Sink (HTTP)
//! ```
//!
//! ## Batching model
//!
//! - A batch is flushed when it reaches `batch_size` or when the flush
//!   interval elapses with points waiting, whichever comes first.
//! - Closing the client flushes the partially-filled tail batch.
//! - A full queue rejects the point at the call site instead of blocking;
//!   a failed write is logged and the batch dropped. Neither is retried.
//!
//! ## Quick start
//!
//! ```no_run
//! use siphon_client::{Client, DataPoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect("http://localhost:8086", "metrics")?;
//!
//!     client.send(
//!         DataPoint::builder("temperature")
//!             .tag("location", "room1")
//!             .field("value", 23.5)
//!             .build(),
//!     );
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod batcher;
pub mod client;
pub mod config;
pub mod line_protocol;
pub mod sink;

pub use batcher::{Batcher, BatcherStats};
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use sink::{HttpSink, MockSink, Sink};

pub use siphon_core::error::{
    ConfigError, ConnectError, EnqueueError, SiphonError, SiphonResult, WriteError,
};
pub use siphon_core::types::{DataPoint, DataPointBuilder, FieldValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
