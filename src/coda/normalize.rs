//! # Response Normalizer
//!
//! The API client hands back JSON text in one of several shapes: a JSON array, a single
//! object, or several objects written back to back without any separator. This module
//! is the only place that deals with that ambiguity; everything downstream works on a
//! plain `Vec<Record>`.
//!
//! Normalization is best effort and never fails. Fragments that do not decode are
//! skipped one character at a time until the next decodable value starts.

use crate::model::Record;
use serde_json::{Deserializer, Value};

/// The shape a response turned out to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Empty,
    Array,
    Object,
    Concatenated,
}

/// Normalize response text into records, also reporting the detected shape.
pub fn normalize_with_shape(text: &str) -> (ResponseShape, Vec<Record>) {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "{}" {
        return (ResponseShape::Empty, Vec::new());
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => (ResponseShape::Array, objects(items).collect()),
        Ok(Value::Object(map)) => (ResponseShape::Object, vec![map]),
        _ => (ResponseShape::Concatenated, scan_concatenated(trimmed)),
    }
}

/// Normalize response text into an ordered sequence of records.
pub fn normalize(text: &str) -> Vec<Record> {
    normalize_with_shape(text).1
}

/// The object elements of an array, in order.
fn objects(items: Vec<Value>) -> impl Iterator<Item = Record> {
    items.into_iter().filter_map(|item| match item {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

/// Decode values left to right. Objects become records, arrays contribute their
/// object elements, anything else is skipped.
fn scan_concatenated(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let mut stream = Deserializer::from_str(rest).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                match value {
                    Value::Object(map) => records.push(map),
                    Value::Array(items) => records.extend(objects(items)),
                    _ => {}
                }
                let consumed = stream.byte_offset();
                if consumed == 0 {
                    break;
                }
                pos += consumed;
            }
            None => break,
            Some(Err(_)) => {
                let skip = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                tracing::trace!(offset = pos, "skipping undecodable response fragment");
                pos += skip;
            }
        }
    }

    records
}
