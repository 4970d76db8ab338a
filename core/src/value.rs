//! Typed values held by the JSON accumulator.
//!
//! # Design
//! A closed sum type instead of `serde_json::Value`: the token parser only
//! ever classifies a value as one of four kinds, and nested objects or arrays
//! cannot be produced by a token. Serialization is untagged so the wire form
//! is the plain JSON scalar.

use serde::{Deserialize, Serialize};

/// A scalar JSON value: string, boolean, 64-bit integer or 64-bit float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl JsonValue {
    /// True only for `JsonValue::String("")`. `false`, `0` and `0.0` are not
    /// considered empty.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, JsonValue::String(s) if s.is_empty())
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Int(value)
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Int(i64::from(value))
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        JsonValue::Int(i64::from(value))
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Float(value)
    }
}

impl From<f32> for JsonValue {
    fn from(value: f32) -> Self {
        JsonValue::Float(f64::from(value))
    }
}
