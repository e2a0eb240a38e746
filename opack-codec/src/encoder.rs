//! The OPack encoder: `Value` → bytes.

use opack_core::{OpackError, OpackResult, Value};

/// Default recursion-depth limit, shared with `Decoder`. Chosen to be far
/// past any realistic document while still well short of blowing the stack.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Encodes `Value`s into an owned byte buffer.
///
/// An `Encoder` is one-shot and stateless beyond the output buffer and a
/// recursion-depth counter; there is no reason to reuse one across unrelated
/// top-level values other than to amortize the buffer allocation.
pub struct Encoder {
    buffer: Vec<u8>,
    depth: usize,
    max_depth: usize,
}

impl Encoder {
    /// Create a new encoder with an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new encoder, reserving `capacity` bytes up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the recursion-depth limit (default `DEFAULT_MAX_DEPTH`).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Encode one value, appending its wire representation to the buffer.
    pub fn encode_value(&mut self, value: &Value) -> OpackResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(OpackError::TooDeep(self.max_depth));
        }
        let result = self.encode_value_inner(value);
        self.depth -= 1;
        result
    }

    fn encode_value_inner(&mut self, value: &Value) -> OpackResult<()> {
        match value {
            Value::Bool(true) => self.buffer.push(0x01),
            Value::Bool(false) => self.buffer.push(0x02),
            Value::Timestamp(ts) => {
                self.buffer.push(0x06);
                self.buffer
                    .extend_from_slice(&ts.as_seconds_since_1904().to_le_bytes());
            }
            Value::Int(n) => self.encode_int(*n)?,
            Value::Float(f) => self.encode_float(*f),
            Value::String(s) => self.encode_string(s)?,
            Value::Bytes(b) => self.encode_bytes(b)?,
            Value::Array(items) => self.encode_array(items)?,
            Value::Dict(pairs) => self.encode_dict(pairs)?,
        }
        Ok(())
    }

    /// Choose the smallest adequate integer encoding for `n` and write it.
    fn encode_int(&mut self, n: u64) -> OpackResult<()> {
        if n <= 0x27 {
            self.buffer.push(0x08 + n as u8);
        } else if n < (1 << 8) {
            self.buffer.push(0x30);
            self.buffer.push(n as u8);
        } else if n < (1u64 << 32) {
            self.buffer.push(0x32);
            self.buffer.extend_from_slice(&(n as u32).to_le_bytes());
        } else {
            self.buffer.push(0x33);
            self.buffer.extend_from_slice(&n.to_le_bytes());
        }
        Ok(())
    }

    /// Choose binary32 if it round-trips exactly, else binary64.
    fn encode_float(&mut self, f: f64) {
        let as_f32 = f as f32;
        if as_f32 as f64 == f {
            self.buffer.push(0x35);
            self.buffer.extend_from_slice(&as_f32.to_le_bytes());
        } else {
            self.buffer.push(0x36);
            self.buffer.extend_from_slice(&f.to_le_bytes());
        }
    }

    fn encode_string(&mut self, s: &str) -> OpackResult<()> {
        let bytes = s.as_bytes();
        let len = bytes.len();
        if len <= 0x20 {
            self.buffer.push(0x40 + len as u8);
        } else if len < (1 << 8) {
            self.buffer.push(0x61);
            self.buffer.push(len as u8);
        } else if len < (1 << 16) {
            self.buffer.push(0x62);
            self.buffer.extend_from_slice(&(len as u16).to_be_bytes());
        } else if (len as u64) < (1u64 << 32) {
            self.buffer.push(0x63);
            self.buffer.extend_from_slice(&(len as u32).to_be_bytes());
        } else {
            self.buffer.push(0x64);
            self.buffer.extend_from_slice(&(len as u64).to_be_bytes());
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn encode_bytes(&mut self, b: &[u8]) -> OpackResult<()> {
        let len = b.len();
        if len <= 0x20 {
            self.buffer.push(0x70 + len as u8);
        } else if len < (1 << 8) {
            self.buffer.push(0x91);
            self.buffer.push(len as u8);
        } else if len < (1 << 16) {
            self.buffer.push(0x92);
            self.buffer.extend_from_slice(&(len as u16).to_be_bytes());
        } else if (len as u64) < (1u64 << 32) {
            self.buffer.push(0x93);
            self.buffer.extend_from_slice(&(len as u32).to_be_bytes());
        } else {
            // `len` is a `usize`, so on every platform this crate targets it
            // already fits in a u64; `BytesTooLarge` exists for API symmetry
            // with the wire format's 2^64 length ceiling, not because this
            // branch is reachable here.
            self.buffer.push(0x94);
            self.buffer.extend_from_slice(&(len as u64).to_be_bytes());
        }
        self.buffer.extend_from_slice(b);
        Ok(())
    }

    fn encode_array(&mut self, items: &[Value]) -> OpackResult<()> {
        if items.len() < 15 {
            self.buffer.push(0xD0 + items.len() as u8);
            for item in items {
                self.encode_value(item)?;
            }
        } else {
            self.buffer.push(0xDF);
            for item in items {
                self.encode_value(item)?;
            }
            self.buffer.push(0x03);
        }
        Ok(())
    }

    fn encode_dict(&mut self, pairs: &[(Value, Value)]) -> OpackResult<()> {
        if pairs.len() < 15 {
            self.buffer.push(0xE0 + pairs.len() as u8);
            for (key, value) in pairs {
                self.encode_value(key)?;
                self.encode_value(value)?;
            }
        } else {
            self.buffer.push(0xEF);
            for (key, value) in pairs {
                self.encode_value(key)?;
                self.encode_value(value)?;
            }
            self.buffer.push(0x03);
        }
        Ok(())
    }

    /// Consume the encoder, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Borrow the bytes encoded so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the buffer, keeping its allocated capacity.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: Value) -> Vec<u8> {
        let mut encoder = Encoder::new();
        encoder.encode_value(&value).unwrap();
        encoder.into_bytes()
    }

    #[test]
    fn encodes_bools() {
        assert_eq!(encode(Value::Bool(true)), vec![0x01]);
        assert_eq!(encode(Value::Bool(false)), vec![0x02]);
    }

    #[test]
    fn encodes_inline_and_wide_integers() {
        assert_eq!(encode(Value::Int(1)), vec![0x09]);
        assert_eq!(encode(Value::Int(40)), vec![0x30, 0x28]);
        assert_eq!(
            encode(Value::Int(256)),
            vec![0x32, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            encode(Value::Int(1u64 << 32)),
            vec![0x33, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn encodes_negative_float_as_f32() {
        assert_eq!(encode(Value::Float(-1.0)), vec![0x35, 0x00, 0x00, 0x80, 0xBF]);
    }

    #[test]
    fn encodes_non_f32_representable_float_as_f64() {
        assert_eq!(
            encode(Value::Float(1.2)),
            vec![0x36, 0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0xF3, 0x3F]
        );
    }

    #[test]
    fn encodes_short_and_long_strings() {
        assert_eq!(encode(Value::String("a".into())), vec![0x41, b'a']);

        let thirty_three = "a".repeat(33);
        let mut expected = vec![0x61, 33];
        expected.extend(thirty_three.bytes());
        assert_eq!(encode(Value::String(thirty_three)), expected);
    }

    #[test]
    fn encodes_array_length_and_terminated_forms() {
        assert_eq!(encode(Value::Array(vec![Value::Int(1)])), vec![0xD1, 0x09]);

        let fifteen_ones = vec![Value::Int(1); 15];
        let mut expected = vec![0xDF];
        expected.extend(std::iter::repeat(0x09).take(15));
        expected.push(0x03);
        assert_eq!(encode(Value::Array(fifteen_ones)), expected);
    }

    #[test]
    fn encodes_dict_length_form() {
        let dict = Value::Dict(vec![(Value::Int(1), Value::Int(1))]);
        assert_eq!(encode(dict), vec![0xE1, 0x09, 0x09]);
    }

    #[test]
    fn rejects_excessive_recursion() {
        let mut value = Value::Int(1);
        for _ in 0..10 {
            value = Value::Array(vec![value]);
        }
        let mut encoder = Encoder::new().with_max_depth(5);
        assert!(matches!(
            encoder.encode_value(&value),
            Err(OpackError::TooDeep(5))
        ));
    }
}
