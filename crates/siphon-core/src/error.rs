// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Unified error hierarchy for siphon.
//!
//! The hierarchy separates the synchronous failures a caller sees at
//! construction or enqueue time from the asynchronous write failures that
//! stay inside the background worker:
//!
//! ```text
//! SiphonError (root)
//! ├── ConfigError   - Configuration parsing and validation (synchronous)
//! ├── ConnectError  - Sink construction failures (synchronous)
//! ├── EnqueueError  - Producer-side queue failures (synchronous)
//! └── WriteError    - Flush-side failures (asynchronous, logged, never
//!                     surfaced through a producer's call stack)
//! ```
//!
//! # Examples
//!
//! ```
//! use siphon_core::error::{EnqueueError, SiphonError};
//!
//! let error = EnqueueError::queue_full(5000);
//! assert_eq!(error.error_type(), "queue_full");
//!
//! let root: SiphonError = error.into();
//! assert_eq!(root.error_type(), "enqueue");
//! ```

use thiserror::Error;

// =============================================================================
// SiphonError - Root Error Type
// =============================================================================

/// The root error type for siphon.
///
/// All errors in the client convert into this type, giving callers a single
/// error surface for construction and configuration paths.
#[derive(Debug, Error)]
pub enum SiphonError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sink construction error.
    #[error("Connect error: {0}")]
    Connect(#[from] ConnectError),

    /// Producer-side enqueue error.
    #[error("Enqueue error: {0}")]
    Enqueue(#[from] EnqueueError),

    /// Flush-side write error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

impl SiphonError {
    /// Returns the error type as a string for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            SiphonError::Config(_) => "config",
            SiphonError::Connect(_) => "connect",
            SiphonError::Enqueue(_) => "enqueue",
            SiphonError::Write(_) => "write",
        }
    }
}

// =============================================================================
// ConfigError
// =============================================================================

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Returns the error type for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ConfigError::Validation { .. } => "validation",
            ConfigError::Parse { .. } => "parse",
        }
    }
}

// =============================================================================
// ConnectError
// =============================================================================

/// Sink construction errors.
///
/// These are fatal to client creation and surface synchronously from the
/// constructor. An endpoint that parses but is unreachable is not detected
/// here; it shows up later as a [`WriteError`] on each flush.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The endpoint URL could not be parsed.
    #[error("Invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint {
        /// The endpoint as given.
        endpoint: String,
        /// Error message.
        message: String,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {message}")]
    ClientBuild {
        /// Error message.
        message: String,
    },
}

impl ConnectError {
    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a client build error.
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    /// Returns the error type for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ConnectError::InvalidEndpoint { .. } => "invalid_endpoint",
            ConnectError::ClientBuild { .. } => "client_build",
        }
    }
}

// =============================================================================
// EnqueueError
// =============================================================================

/// Producer-side enqueue errors.
///
/// Surfaced synchronously from `enqueue`/`try_send`; the fire-and-forget
/// `send` path swallows and logs them instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// The bounded queue is at capacity.
    #[error("Queue is full (capacity {capacity})")]
    QueueFull {
        /// The configured queue capacity.
        capacity: usize,
    },

    /// The background worker has exited and no longer drains the queue.
    #[error("Background worker has stopped")]
    WorkerGone,
}

impl EnqueueError {
    /// Creates a queue full error.
    pub fn queue_full(capacity: usize) -> Self {
        Self::QueueFull { capacity }
    }

    /// Returns the error type for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            EnqueueError::QueueFull { .. } => "queue_full",
            EnqueueError::WorkerGone => "worker_gone",
        }
    }
}

// =============================================================================
// WriteError
// =============================================================================

/// Flush-side write errors.
///
/// These occur only inside the background flush, are logged there, and are
/// terminal for the batch: the batch is dropped, never retried, and the
/// failure never reaches a producer's call stack.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The HTTP request itself failed (connection refused, timeout, DNS).
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store answered with a non-success status.
    #[error("Store returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The batch could not be encoded for the wire.
    #[error("Failed to encode batch: {message}")]
    Encode {
        /// Error message.
        message: String,
    },
}

impl WriteError {
    /// Creates an HTTP transport error.
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an HTTP transport error with its underlying cause.
    pub fn http_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Http {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Returns the error type for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            WriteError::Http { .. } => "http",
            WriteError::Status { .. } => "status",
            WriteError::Encode { .. } => "encode",
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// A Result type with SiphonError.
pub type SiphonResult<T> = Result<T, SiphonError>;

/// A Result type with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A Result type with ConnectError.
pub type ConnectResult<T> = Result<T, ConnectError>;

/// A Result type with EnqueueError.
pub type EnqueueResult<T> = Result<T, EnqueueError>;

/// A Result type with WriteError.
pub type WriteResult<T> = Result<T, WriteError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let error = ConfigError::validation("batch_size", "must be positive");
        assert!(matches!(error, ConfigError::Validation { .. }));
        assert_eq!(error.error_type(), "validation");
        assert_eq!(
            error.to_string(),
            "Validation failed for 'batch_size': must be positive"
        );
    }

    #[test]
    fn test_connect_error() {
        let error = ConnectError::invalid_endpoint("not a url", "relative URL without a base");
        assert!(matches!(error, ConnectError::InvalidEndpoint { .. }));
        assert_eq!(error.error_type(), "invalid_endpoint");
    }

    #[test]
    fn test_enqueue_error() {
        let error = EnqueueError::queue_full(5000);
        assert_eq!(error, EnqueueError::QueueFull { capacity: 5000 });
        assert_eq!(error.error_type(), "queue_full");
        assert_eq!(error.to_string(), "Queue is full (capacity 5000)");

        assert_eq!(EnqueueError::WorkerGone.error_type(), "worker_gone");
    }

    #[test]
    fn test_write_error() {
        let error = WriteError::status(400, "unable to parse points");
        assert_eq!(error.error_type(), "status");
        assert_eq!(error.to_string(), "Store returned 400: unable to parse points");

        let error = WriteError::http("connection refused");
        assert_eq!(error.error_type(), "http");
    }

    #[test]
    fn test_write_error_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = WriteError::http_with_source("request failed", io);

        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_root_error_conversion() {
        let root: SiphonError = ConfigError::validation("endpoint", "must not be empty").into();
        assert_eq!(root.error_type(), "config");

        let root: SiphonError = EnqueueError::WorkerGone.into();
        assert_eq!(root.error_type(), "enqueue");

        let root: SiphonError = WriteError::encode("bad point").into();
        assert_eq!(root.error_type(), "write");
    }
}
