//! OPack: Apple's compact binary object format.
//!
//! OPack encodes a closed set of dynamically-typed values — bools,
//! timestamps, integers, floats, strings, byte strings, arrays, and
//! dicts — behind a single tag byte per value, with several tag ranges
//! folding a length or a small value directly into the tag itself.
//!
//! # Architecture
//!
//! This library is organized as a workspace with three crates:
//!
//! - `opack-core`: the `Value` tagged union, `Timestamp`, and error types
//! - `opack-codec`: the tag classifier and the encoder/decoder
//! - `opack`: this crate, a thin facade over the two above
//!
//! # Usage
//!
//! ```
//! use opack::Value;
//!
//! let value = Value::Dict(vec![(Value::from("name"), Value::from("opack"))]);
//! let bytes = opack::encode(&value).unwrap();
//! let decoded = opack::decode(&bytes).unwrap();
//! assert_eq!(decoded, value);
//! ```

pub use opack_codec::{Category, Decoder, Encoder};
pub use opack_core::{OpackError, OpackResult, Timestamp, Value};

/// Encode a single value to its OPack wire representation.
pub fn encode(value: &Value) -> OpackResult<Vec<u8>> {
    let mut encoder = Encoder::new();
    encoder.encode_value(value)?;
    Ok(encoder.into_bytes())
}

/// Decode a single top-level value from its OPack wire representation.
///
/// Trailing bytes after the value are rejected with
/// `OpackError::TrailingData`; use `Decoder` directly if you need to decode
/// a value embedded in a larger buffer.
pub fn decode(input: &[u8]) -> OpackResult<Value> {
    let mut decoder = Decoder::new(input);
    let value = decoder.decode_value()?;
    let remaining = decoder.remaining();
    if remaining > 0 {
        return Err(OpackError::TrailingData(remaining));
    }
    Ok(value)
}
