//! The `Value` tagged union: everything OPack can represent.

use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// A single OPack value. This is the complete dynamically-typed value model
/// the codec understands; encoding and decoding are defined purely in terms
/// of these eight variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// An absolute instant, seconds since the 1904 epoch.
    Timestamp(Timestamp),
    /// A non-negative integer, 0 ≤ n < 2⁶⁴. Negative integers are
    /// represented as `Float` instead — see `From<i64>` below.
    Int(u64),
    /// An IEEE-754 float. The encoder picks binary32 or binary64 depending
    /// on whether the value round-trips through binary32 unchanged.
    Float(f64),
    /// UTF-8 text.
    String(String),
    /// An opaque byte string.
    Bytes(Vec<u8>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// An ordered sequence of key/value pairs. Keys may be of any variant;
    /// duplicates are preserved on the wire and decoded as-is (last-write-wins
    /// is a property of how a caller folds this into a map, not something
    /// the codec enforces).
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// True if this is a `Bool`.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// True if this is an `Array` or `Dict`.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Dict(_))
    }

    /// View as a `bool`, if this is `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// View as a `u64`, if this is `Int`.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// View as an `f64`, if this is `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// View as a `&str`, if this is `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// View as a byte slice, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// View as an element slice, if this is `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// View as a pair slice, if this is `Dict`.
    pub fn as_dict(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Dict(pairs) => Some(pairs.as_slice()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    /// Non-negative values become `Int`; negative values become `Float`,
    /// since the wire format has no signed integer encoding of its own.
    fn from(n: i64) -> Self {
        if n >= 0 {
            Value::Int(n as u64)
        } else {
            Value::Float(n as f64)
        }
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        Value::Dict(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_i64_becomes_float() {
        let v: Value = (-1i64).into();
        assert_eq!(v, Value::Float(-1.0));
    }

    #[test]
    fn non_negative_i64_becomes_int() {
        let v: Value = 5i64.into();
        assert_eq!(v, Value::Int(5));
    }

    #[test]
    fn accessors_match_variant() {
        let v = Value::String("hi".to_owned());
        assert_eq!(v.as_str(), Some("hi"));
        assert_eq!(v.as_int(), None);
    }
}
