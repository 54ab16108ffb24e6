// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built points and configurations for consistent and reproducible
//! testing.
//!
//! ## Design Principles
//!
//! - Fixtures are immutable and thread-safe
//! - Each fixture represents a realistic scenario
//! - Fixtures can be composed for complex test scenarios

use std::time::Duration;

use siphon_client::ClientConfig;
use siphon_core::types::DataPoint;

// =============================================================================
// Point Fixtures
// =============================================================================

/// Fixture providing standard data points.
pub struct PointFixtures;

impl PointFixtures {
    /// A point carrying a sequence number, for ordering and exactly-once
    /// assertions.
    pub fn sequenced(seq: i64) -> DataPoint {
        DataPoint::builder("test_measurement")
            .tag("origin", "integration-tests")
            .field("seq", seq)
            .build()
    }

    /// A batch of sequenced points, `seq` running from 0.
    pub fn batch(count: usize) -> Vec<DataPoint> {
        (0..count).map(|i| Self::sequenced(i as i64)).collect()
    }

    /// A temperature reading from a named location.
    pub fn temperature(location: &str, value: f64) -> DataPoint {
        DataPoint::builder("temperature")
            .tag("location", location)
            .tag("sensor", "A1")
            .field("value", value)
            .build()
    }

    /// A point exercising every field value type.
    pub fn mixed_fields() -> DataPoint {
        DataPoint::builder("mixed")
            .tag("host", "web-01")
            .field("load", 0.93)
            .field("connections", 42i64)
            .field("state", "serving")
            .field("healthy", true)
            .build()
    }

    /// A point with tags but no fields; sinks skip these at encode time.
    pub fn field_less() -> DataPoint {
        DataPoint::builder("empty")
            .tag("origin", "integration-tests")
            .build()
    }
}

/// Extracts the sequence number from a [`PointFixtures::sequenced`] point.
pub fn seq_of(point: &DataPoint) -> i64 {
    point
        .fields()
        .get("seq")
        .and_then(|v| v.as_i64())
        .expect("fixture point carries a seq field")
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing standard client configurations.
///
/// All of them point at an unroutable test endpoint; pair them with a mock
/// sink so no test touches the network.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A config with the given batch size and flush interval.
    pub fn fast(batch_size: usize, flush_ms: u64) -> ClientConfig {
        ClientConfig::builder()
            .endpoint("http://localhost:9999/test")
            .database("test")
            .batch_size(batch_size)
            .flush_interval(Duration::from_millis(flush_ms))
            .build()
    }

    /// A config whose timer never fires within a test: size and shutdown
    /// flushes only.
    pub fn quiet(batch_size: usize) -> ClientConfig {
        Self::fast(batch_size, 60_000)
    }

    /// A config with an explicit tiny queue, for saturation tests.
    pub fn tiny_queue(capacity: usize) -> ClientConfig {
        ClientConfig::builder()
            .endpoint("http://localhost:9999/test")
            .database("test")
            .batch_size(100)
            .flush_interval(Duration::from_secs(60))
            .queue_capacity(capacity)
            .build()
    }
}
