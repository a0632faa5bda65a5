//! Compact JSON-lines span format.
//!
//! Each finished span becomes one self-contained JSON object:
//!
//! ```json
//! {"service":"bookfinder","name":"search","trace_id":"…","span_id":"…",
//!  "parent_span_id":null,"start":"2026-10-19T08:00:00.000000Z",
//!  "duration_us":1520,"attributes":{"query":"dune"},"events":[…],
//!  "status":"unset"}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde_json::{json, Map, Value as JsonValue};
use std::time::SystemTime;

/// Formats one span as a JSON line.
pub fn span_line(service: &str, span: &SpanData) -> JsonValue {
    let duration_us = span
        .end_time
        .duration_since(span.start_time)
        .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX));

    let parent = (span.parent_span_id != SpanId::INVALID).then(|| format!("{:016x}", span.parent_span_id));

    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "name": event.name,
                "time": timestamp(event.timestamp),
                "attributes": attributes(&event.attributes),
            })
        })
        .collect();

    json!({
        "service": service,
        "name": span.name,
        "trace_id": format!("{:032x}", span.span_context.trace_id()),
        "span_id": format!("{:016x}", span.span_context.span_id()),
        "parent_span_id": parent,
        "start": timestamp(span.start_time),
        "duration_us": duration_us,
        "attributes": attributes(&span.attributes),
        "events": events,
        "status": status(&span.status),
    })
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn attributes(pairs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = pairs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.to_string()),
        Value::Array(_) => json!(value.to_string()),
    }
}

fn status(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    }
}
