// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client configuration.
//!
//! Defaults follow common ingestion practice: batches of 100 points, a
//! 500 ms flush interval, a 1 s write timeout, and a producer queue sized
//! at fifty batches so producers effectively never see backpressure.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use siphon_core::error::{ConfigError, ConfigResult};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the client and its batcher.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use siphon_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .endpoint("http://localhost:8086")
///     .database("telemetry")
///     .batch_size(500)
///     .flush_interval(Duration::from_secs(1))
///     .build();
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// HTTP base URL of the time-series store.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Destination database name.
    #[serde(default = "default_database")]
    pub database: String,

    /// Buffer size that triggers an immediate flush.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Interval that triggers a flush regardless of buffer fill.
    #[serde(default = "default_flush_interval")]
    #[serde(with = "duration_millis")]
    pub flush_interval: Duration,

    /// Producer queue depth. `0` derives `batch_size * 50`.
    #[serde(default)]
    pub queue_capacity: usize,

    /// Timeout for each HTTP write.
    #[serde(default = "default_request_timeout")]
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

fn default_endpoint() -> String {
    "http://localhost:8086".to_string()
}

fn default_database() -> String {
    "metrics".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_flush_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(1)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            database: default_database(),
            batch_size: default_batch_size(),
            flush_interval: default_flush_interval(),
            queue_capacity: 0,
            request_timeout: default_request_timeout(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given destination with defaults for
    /// everything else.
    pub fn new(endpoint: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            database: database.into(),
            ..Default::default()
        }
    }

    /// Creates a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Creates a configuration for testing: small batches, a short interval.
    pub fn for_testing() -> Self {
        Self {
            endpoint: "http://localhost:9999/test".to_string(),
            database: "test".to_string(),
            batch_size: 10,
            flush_interval: Duration::from_millis(100),
            queue_capacity: 0,
            request_timeout: Duration::from_secs(1),
        }
    }

    /// Parses a configuration from a YAML document and validates it.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::validation("endpoint", "must not be empty"));
        }
        if self.database.is_empty() {
            return Err(ConfigError::validation("database", "must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::validation("batch_size", "must be positive"));
        }
        if self.flush_interval.is_zero() {
            return Err(ConfigError::validation("flush_interval", "must be positive"));
        }
        Ok(())
    }

    /// Returns the producer queue capacity, deriving `batch_size * 50` when
    /// unset.
    #[inline]
    pub fn effective_queue_capacity(&self) -> usize {
        if self.queue_capacity == 0 {
            self.batch_size.saturating_mul(50)
        } else {
            self.queue_capacity
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Sets the store endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets the destination database.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = database.into();
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Sets the flush interval.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    /// Sets the producer queue capacity.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Sets the HTTP write timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// =============================================================================
// Tests
// =============================================================================
