// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Siphon Integration Tests
//!
//! This crate provides integration tests for the siphon batching client.
//! It includes shared fixtures and helpers for exercising the full
//! submit → queue → batch → flush pipeline against a mock sink.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities and fixtures
//!   - `fixtures`: Pre-built points and configurations for consistent testing
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p siphon-tests
//!
//! # Run specific test suite
//! cargo test -p siphon-tests --test integration_batching
//! cargo test -p siphon-tests --test integration_client
//!
//! # Run with verbose output
//! cargo test -p siphon-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! ### Batching Tests (`integration_batching.rs`)
//! - Size-triggered and timer-triggered flushes
//! - Exactly-once delivery across trigger types
//! - Submission-order preservation
//! - Concurrent producers
//! - Worker survival across sink failures
//!
//! ### Client Tests (`integration_client.rs`)
//! - Construction and validation failures
//! - Lifecycle: start, close, final flush
//! - Fire-and-forget error swallowing
//! - YAML configuration end to end
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use siphon_tests::common::fixtures::{ConfigFixtures, PointFixtures};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let config = ConfigFixtures::quiet(10);
//!     let points = PointFixtures::batch(100);
//!     // ... test logic
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::{init_test_logging, unique_test_id};
}
