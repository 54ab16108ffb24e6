// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core data types for siphon.
//!
//! This module provides the value types submitted by producers: a field value
//! enum covering what time-series stores accept, and the immutable `DataPoint`
//! carrying one measurement with its tags, fields, and timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Field Values
// =============================================================================

/// A field value on a data point.
///
/// Covers the value types an InfluxDB-style store accepts for fields:
/// floats, integers, strings, and booleans.
///
/// # Examples
///
/// ```
/// use siphon_core::types::FieldValue;
///
/// let usage = FieldValue::from(0.87);
/// assert_eq!(usage.as_f64(), Some(0.87));
///
/// let up = FieldValue::from(true);
/// assert_eq!(up.as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FieldValue {
    /// 64-bit floating point
    Float(f64),

    /// Signed 64-bit integer
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Boolean value
    Boolean(bool),
}

impl FieldValue {
    /// Returns the type name of this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use siphon_core::types::FieldValue;
    ///
    /// assert_eq!(FieldValue::Float(1.0).type_name(), "float");
    /// assert_eq!(FieldValue::Boolean(true).type_name(), "boolean");
    /// ```
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Float(_) => "float",
            FieldValue::Integer(_) => "integer",
            FieldValue::String(_) => "string",
            FieldValue::Boolean(_) => "boolean",
        }
    }

    /// Returns `true` if this is a numeric value (integer or float).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Float(_) | FieldValue::Integer(_))
    }

    /// Attempts to convert this value to an f64.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Attempts to convert this value to an i64.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to convert this value to a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to get this value as a string reference.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::String(v) => write!(f, "{}", v),
            FieldValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

// Implement From for the exact variant types
macro_rules! impl_from_for_field_value {
    ($variant:ident, $type:ty) => {
        impl From<$type> for FieldValue {
            fn from(v: $type) -> Self {
                FieldValue::$variant(v)
            }
        }
    };
}

impl_from_for_field_value!(Float, f64);
impl_from_for_field_value!(Integer, i64);
impl_from_for_field_value!(String, String);
impl_from_for_field_value!(Boolean, bool);

// Widening conversions for the smaller integer types
macro_rules! impl_from_int_for_field_value {
    ($type:ty) => {
        impl From<$type> for FieldValue {
            fn from(v: $type) -> Self {
                FieldValue::Integer(i64::from(v))
            }
        }
    };
}

impl_from_int_for_field_value!(i8);
impl_from_int_for_field_value!(i16);
impl_from_int_for_field_value!(i32);
impl_from_int_for_field_value!(u8);
impl_from_int_for_field_value!(u16);
impl_from_int_for_field_value!(u32);

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(f64::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

// =============================================================================
// DataPoint
// =============================================================================

/// A named, tagged, timestamped data point.
///
/// This is the value submitted by producers and carried through the batching
/// pipeline. Construction always succeeds and stamps the current time unless
/// a timestamp is supplied through the builder; the point is immutable after
/// construction. Content is not validated here: an empty measurement or a
/// malformed field is the store's problem at write time.
///
/// Tags and fields are held in `BTreeMap`s so sinks see a deterministic,
/// key-sorted iteration order.
///
/// # Examples
///
/// ```
/// use siphon_core::types::DataPoint;
///
/// let point = DataPoint::builder("cpu")
///     .tag("host", "web-01")
///     .field("usage", 0.93)
///     .build();
///
/// assert_eq!(point.measurement(), "cpu");
/// assert_eq!(point.tag_count(), 1);
/// assert_eq!(point.field_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// The series name.
    measurement: String,

    /// Series identity: key-sorted string pairs.
    tags: BTreeMap<String, String>,

    /// The actual data: key-sorted field values.
    fields: BTreeMap<String, FieldValue>,

    /// When the point was produced.
    timestamp: DateTime<Utc>,
}

impl DataPoint {
    /// Creates a new data point with the current timestamp.
    ///
    /// Never fails; no validation is performed.
    pub fn new(
        measurement: impl Into<String>,
        tags: BTreeMap<String, String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Self {
        Self {
            measurement: measurement.into(),
            tags,
            fields,
            timestamp: Utc::now(),
        }
    }

    /// Creates a builder for a data point on the given measurement.
    pub fn builder(measurement: impl Into<String>) -> DataPointBuilder {
        DataPointBuilder::new(measurement)
    }

    /// Returns the measurement name.
    #[inline]
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Returns the tag set.
    #[inline]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Returns the field set.
    #[inline]
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Returns the timestamp.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the number of tags.
    #[inline]
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Returns the number of fields.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the point carries no fields.
    ///
    /// Field-less points are rejected by InfluxDB-style stores; sinks may
    /// skip them rather than fail a whole batch.
    #[inline]
    pub fn has_no_fields(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the age of this data point.
    #[inline]
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.timestamp
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} tags, {} fields] @ {}",
            self.measurement,
            self.tags.len(),
            self.fields.len(),
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`DataPoint`].
///
/// # Examples
///
/// ```
/// use siphon_core::types::DataPoint;
///
/// let point = DataPoint::builder("http_requests")
///     .tag("method", "GET")
///     .tag("status", "200")
///     .field("count", 1i64)
///     .field("latency_ms", 12.4)
///     .build();
///
/// assert_eq!(point.field_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DataPointBuilder {
    measurement: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
    timestamp: Option<DateTime<Utc>>,
}

impl DataPointBuilder {
    /// Creates a new builder for the given measurement.
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Adds a tag. A repeated key overwrites the earlier value.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Adds a field. A repeated key overwrites the earlier value.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Sets an explicit timestamp instead of stamping construction time.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builds the data point, stamping the current time if none was set.
    pub fn build(self) -> DataPoint {
        DataPoint {
            measurement: self.measurement,
            tags: self.tags,
            fields: self.fields,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_types() {
        assert_eq!(FieldValue::Float(1.5).type_name(), "float");
        assert_eq!(FieldValue::Integer(42).type_name(), "integer");
        assert_eq!(FieldValue::String("x".into()).type_name(), "string");
        assert_eq!(FieldValue::Boolean(false).type_name(), "boolean");
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::Integer(42).as_i64(), Some(42));
        assert_eq!(FieldValue::Integer(42).as_f64(), Some(42.0));
        assert_eq!(FieldValue::Float(3.5).as_f64(), Some(3.5));
        assert_eq!(FieldValue::Float(3.5).as_i64(), None);
        assert_eq!(FieldValue::Boolean(true).as_bool(), Some(true));
        assert_eq!(FieldValue::String("ok".into()).as_str(), Some("ok"));
    }

    #[test]
    fn test_field_value_from() {
        let v: FieldValue = 1.25f64.into();
        assert!(matches!(v, FieldValue::Float(_)));

        let v: FieldValue = 7i32.into();
        assert!(matches!(v, FieldValue::Integer(7)));

        let v: FieldValue = 7u16.into();
        assert!(matches!(v, FieldValue::Integer(7)));

        let v: FieldValue = "label".into();
        assert!(matches!(v, FieldValue::String(_)));

        let v: FieldValue = true.into();
        assert!(matches!(v, FieldValue::Boolean(true)));
    }

    #[test]
    fn test_field_value_is_numeric() {
        assert!(FieldValue::Float(0.0).is_numeric());
        assert!(FieldValue::Integer(0).is_numeric());
        assert!(!FieldValue::String("0".into()).is_numeric());
        assert!(!FieldValue::Boolean(false).is_numeric());
    }

    #[test]
    fn test_data_point_new_stamps_now() {
        let before = Utc::now();
        let point = DataPoint::new("cpu", BTreeMap::new(), BTreeMap::new());
        let after = Utc::now();

        assert_eq!(point.measurement(), "cpu");
        assert!(point.timestamp() >= before);
        assert!(point.timestamp() <= after);
    }

    #[test]
    fn test_data_point_builder() {
        let point = DataPoint::builder("mem")
            .tag("host", "db-02")
            .tag("region", "eu-west")
            .field("used", 1024i64)
            .field("fraction", 0.42)
            .build();

        assert_eq!(point.measurement(), "mem");
        assert_eq!(point.tag_count(), 2);
        assert_eq!(point.field_count(), 2);
        assert_eq!(point.tags().get("host").map(String::as_str), Some("db-02"));
        assert_eq!(point.fields().get("used"), Some(&FieldValue::Integer(1024)));
        assert!(!point.has_no_fields());
    }

    #[test]
    fn test_data_point_builder_explicit_timestamp() {
        let ts = Utc::now() - chrono::Duration::seconds(30);
        let point = DataPoint::builder("disk").field("free", 1i64).timestamp(ts).build();

        assert_eq!(point.timestamp(), ts);
        assert!(point.age() >= chrono::Duration::seconds(30));
    }

    #[test]
    fn test_data_point_builder_overwrites_repeated_keys() {
        let point = DataPoint::builder("net")
            .tag("iface", "eth0")
            .tag("iface", "eth1")
            .field("rx", 1i64)
            .field("rx", 2i64)
            .build();

        assert_eq!(point.tag_count(), 1);
        assert_eq!(point.tags().get("iface").map(String::as_str), Some("eth1"));
        assert_eq!(point.fields().get("rx"), Some(&FieldValue::Integer(2)));
    }

    #[test]
    fn test_data_point_without_fields() {
        let point = DataPoint::builder("empty").tag("only", "tags").build();
        assert!(point.has_no_fields());
    }

    #[test]
    fn test_data_point_display() {
        let point = DataPoint::builder("cpu").tag("host", "a").field("v", 1.0).build();
        let rendered = format!("{}", point);
        assert!(rendered.starts_with("cpu [1 tags, 1 fields]"));
    }

    #[test]
    fn test_tags_iterate_key_sorted() {
        let point = DataPoint::builder("m")
            .tag("zone", "z")
            .tag("app", "a")
            .tag("host", "h")
            .field("v", 1i64)
            .build();

        let keys: Vec<&str> = point.tags().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["app", "host", "zone"]);
    }
}
