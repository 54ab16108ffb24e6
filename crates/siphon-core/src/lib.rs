// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # siphon-core
//!
//! Core types for the siphon asynchronous metrics client.
//!
//! This crate provides the value types and error hierarchy shared by the
//! client components:
//!
//! - **Types**: `FieldValue`, `DataPoint`, and its builder
//! - **Error**: the `SiphonError` hierarchy separating synchronous
//!   construction/enqueue failures from asynchronous write failures
//!
//! # Example
//!
//! ```
//! use siphon_core::types::DataPoint;
//!
//! let point = DataPoint::builder("cpu")
//!     .tag("host", "web-01")
//!     .field("usage", 0.93)
//!     .build();
//!
//! assert_eq!(point.measurement(), "cpu");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod types;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use error::{
    ConfigError, ConfigResult, ConnectError, ConnectResult, EnqueueError, EnqueueResult,
    SiphonError, SiphonResult, WriteError, WriteResult,
};
pub use types::{DataPoint, DataPointBuilder, FieldValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
