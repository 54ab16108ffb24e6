// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! InfluxDB Line Protocol encoding.
//!
//! Line Protocol format:
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp_ns
//! ```
//!
//! Encoding is the sink's concern: the batching core never looks at this
//! module. Tags render in key-sorted order (the canonical form), which the
//! `DataPoint` tag map already guarantees.
//!
//! See: <https://docs.influxdata.com/influxdb/v1/write_protocols/line_protocol_reference/>

use siphon_core::types::{DataPoint, FieldValue};

/// Encodes a single point as one Line Protocol line.
///
/// Returns `None` for a field-less point: the store rejects those, and
/// skipping one locally keeps it from failing the whole batch.
///
/// # Examples
///
/// ```
/// use siphon_client::line_protocol::encode_point;
/// use siphon_core::types::DataPoint;
///
/// let point = DataPoint::builder("temperature")
///     .tag("sensor", "A1")
///     .field("value", 23.5)
///     .build();
///
/// let line = encode_point(&point).unwrap();
/// assert!(line.starts_with("temperature,sensor=A1 value=23.5 "));
/// ```
pub fn encode_point(point: &DataPoint) -> Option<String> {
    if point.has_no_fields() {
        return None;
    }

    let mut line = escape_measurement(point.measurement());

    for (key, value) in point.tags() {
        line.push(',');
        line.push_str(&escape_tag_key(key));
        line.push('=');
        line.push_str(&escape_tag_value(value));
    }

    line.push(' ');

    let mut first = true;
    for (key, value) in point.fields() {
        if !first {
            line.push(',');
        }
        first = false;
        line.push_str(&escape_field_key(key));
        line.push('=');
        line.push_str(&field_to_line_protocol(value));
    }

    line.push(' ');
    line.push_str(&timestamp_nanos(point).to_string());

    Some(line)
}

/// Encodes a batch as a newline-joined Line Protocol body.
///
/// Field-less points are omitted; an all-skipped batch encodes to an empty
/// string, which callers treat as nothing-to-write.
pub fn encode_batch(points: &[DataPoint]) -> String {
    let mut body = String::new();
    for point in points {
        if let Some(line) = encode_point(point) {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(&line);
        }
    }
    body
}

/// Formats a field value for Line Protocol.
///
/// - Float: written as-is (e.g., `3.14`)
/// - Integer: suffixed with `i` (e.g., `42i`)
/// - String: double-quoted, inner quotes and backslashes escaped
/// - Boolean: `true` or `false`
fn field_to_line_protocol(value: &FieldValue) -> String {
    match value {
        FieldValue::Float(v) => format!("{}", v),
        FieldValue::Integer(v) => format!("{}i", v),
        FieldValue::String(v) => {
            let escaped = v.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
        FieldValue::Boolean(v) => {
            if *v {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
    }
}

fn timestamp_nanos(point: &DataPoint) -> i64 {
    // chrono's nanosecond range ends in 2262; fall back to microsecond
    // precision rather than dropping the point.
    point
        .timestamp()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| point.timestamp().timestamp_micros().saturating_mul(1000))
}

/// Escape measurement name per Line Protocol spec.
/// Spaces and commas must be escaped with backslash.
fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// Escape tag key per Line Protocol spec.
/// Commas, equals signs, and spaces must be escaped.
fn escape_tag_key(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

/// Escape tag value per Line Protocol spec.
/// Commas, equals signs, and spaces must be escaped.
fn escape_tag_value(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

/// Escape field key per Line Protocol spec.
/// Commas, equals signs, and spaces must be escaped.
fn escape_field_key(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}
