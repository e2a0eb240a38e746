//! The OPack decoder: bytes → `Value`.

use crate::encoder::DEFAULT_MAX_DEPTH;
use crate::tag::Category;
use opack_core::{OpackError, OpackResult, Timestamp, Value};

/// An item read off the wire: either a real value, or the terminator
/// sentinel (wire byte `0x03`). The sentinel is never exposed outside this
/// module — `decode_value` and the container loops below consume it.
enum Item {
    Value(Value),
    Terminator,
}

/// Decodes `Value`s from a borrowed byte slice.
///
/// A `Decoder` owns a read cursor into its input; it never copies the input
/// itself, only the bytes that end up inside `String`/`Bytes` values.
pub struct Decoder<'a> {
    buffer: &'a [u8],
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder over `buffer`, starting at offset 0.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the recursion-depth limit (default `DEFAULT_MAX_DEPTH`).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Decode one top-level value. Fails with `InvalidType` if the very
    /// first tag byte is the terminator sentinel — a terminator is only
    /// meaningful inside a terminated container.
    pub fn decode_value(&mut self) -> OpackResult<Value> {
        match self.decode_item()? {
            Item::Value(v) => Ok(v),
            Item::Terminator => Err(OpackError::InvalidType(0x03)),
        }
    }

    /// Current byte offset of the read cursor.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    fn decode_item(&mut self) -> OpackResult<Item> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(OpackError::TooDeep(self.max_depth));
        }
        let result = self.decode_item_inner();
        self.depth -= 1;
        result
    }

    fn decode_item_inner(&mut self) -> OpackResult<Item> {
        let tag = self.read_byte()?;
        match Category::classify(tag)? {
            Category::BoolTrue => Ok(Item::Value(Value::Bool(true))),
            Category::BoolFalse => Ok(Item::Value(Value::Bool(false))),
            Category::Terminator => Ok(Item::Terminator),
            Category::Timestamp => {
                let bytes = self.read_bytes(8)?;
                let seconds = f64::from_le_bytes(bytes.try_into().unwrap());
                Ok(Item::Value(Value::Timestamp(
                    Timestamp::from_seconds_since_1904(seconds),
                )))
            }
            Category::IntInline(n) => Ok(Item::Value(Value::Int(n as u64))),
            Category::IntU8 => {
                let b = self.read_byte()?;
                Ok(Item::Value(Value::Int(b as u64)))
            }
            Category::IntU32 => {
                let bytes = self.read_bytes(4)?;
                let n = u32::from_le_bytes(bytes.try_into().unwrap());
                Ok(Item::Value(Value::Int(n as u64)))
            }
            Category::IntU64 => {
                let bytes = self.read_bytes(8)?;
                let n = u64::from_le_bytes(bytes.try_into().unwrap());
                Ok(Item::Value(Value::Int(n)))
            }
            Category::Float32 => {
                let bytes = self.read_bytes(4)?;
                let f = f32::from_le_bytes(bytes.try_into().unwrap());
                Ok(Item::Value(Value::Float(f as f64)))
            }
            Category::Float64 => {
                let bytes = self.read_bytes(8)?;
                let f = f64::from_le_bytes(bytes.try_into().unwrap());
                Ok(Item::Value(Value::Float(f)))
            }
            Category::StringShort(len) => self.decode_string(len as usize),
            Category::StringLenU8 => {
                let len = self.read_byte()? as usize;
                self.decode_string(len)
            }
            Category::StringLenU16 => {
                let len = self.read_be_u16()? as usize;
                self.decode_string(len)
            }
            Category::StringLenU32 => {
                let len = self.read_be_u32()? as usize;
                self.decode_string(len)
            }
            Category::StringLenU64 => {
                let len = self.read_be_u64()? as usize;
                self.decode_string(len)
            }
            Category::BytesShort(len) => self.decode_bytes(len as usize),
            Category::BytesLenU8 => {
                let len = self.read_byte()? as usize;
                self.decode_bytes(len)
            }
            Category::BytesLenU16 => {
                let len = self.read_be_u16()? as usize;
                self.decode_bytes(len)
            }
            Category::BytesLenU32 => {
                let len = self.read_be_u32()? as usize;
                self.decode_bytes(len)
            }
            Category::BytesLenU64 => {
                let len = self.read_be_u64()? as usize;
                self.decode_bytes(len)
            }
            Category::ArrayLen(count) => self.decode_array_length_tagged(count as usize),
            Category::ArrayTerminated => self.decode_array_terminated(),
            Category::DictLen(count) => self.decode_dict_length_tagged(count as usize),
            Category::DictTerminated => self.decode_dict_terminated(),
        }
    }

    fn decode_string(&mut self, len: usize) -> OpackResult<Item> {
        let bytes = self.read_bytes(len)?.to_vec();
        let s = String::from_utf8(bytes)?;
        Ok(Item::Value(Value::String(s)))
    }

    fn decode_bytes(&mut self, len: usize) -> OpackResult<Item> {
        let bytes = self.read_bytes(len)?.to_vec();
        Ok(Item::Value(Value::Bytes(bytes)))
    }

    fn decode_array_length_tagged(&mut self, count: usize) -> OpackResult<Item> {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.decode_value()?);
        }
        Ok(Item::Value(Value::Array(items)))
    }

    fn decode_array_terminated(&mut self) -> OpackResult<Item> {
        let mut items = Vec::new();
        loop {
            match self.decode_item()? {
                Item::Terminator => break,
                Item::Value(v) => items.push(v),
            }
        }
        Ok(Item::Value(Value::Array(items)))
    }

    fn decode_dict_length_tagged(&mut self, count: usize) -> OpackResult<Item> {
        let mut pairs = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self.decode_value()?;
            let value = self.decode_value()?;
            pairs.push((key, value));
        }
        Ok(Item::Value(Value::Dict(pairs)))
    }

    fn decode_dict_terminated(&mut self) -> OpackResult<Item> {
        let mut pairs = Vec::new();
        loop {
            let key = match self.decode_item()? {
                Item::Terminator => break,
                Item::Value(v) => v,
            };
            let value = self.decode_value()?;
            pairs.push((key, value));
        }
        Ok(Item::Value(Value::Dict(pairs)))
    }

    fn read_byte(&mut self) -> OpackResult<u8> {
        if self.position >= self.buffer.len() {
            return Err(OpackError::UnexpectedEndOfInput(self.position));
        }
        let byte = self.buffer[self.position];
        self.position += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, len: usize) -> OpackResult<&'a [u8]> {
        if len > self.buffer.len().saturating_sub(self.position) {
            return Err(OpackError::UnexpectedEndOfInput(self.position));
        }
        let slice = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn read_be_u16(&mut self) -> OpackResult<u16> {
        Ok(u16::from_be_bytes(self.read_bytes(2)?.try_into().unwrap()))
    }

    fn read_be_u32(&mut self) -> OpackResult<u32> {
        Ok(u32::from_be_bytes(self.read_bytes(4)?.try_into().unwrap()))
    }

    fn read_be_u64(&mut self) -> OpackResult<u64> {
        Ok(u64::from_be_bytes(self.read_bytes(8)?.try_into().unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Value {
        Decoder::new(bytes).decode_value().unwrap()
    }

    #[test]
    fn decodes_bools() {
        assert_eq!(decode(&[0x01]), Value::Bool(true));
        assert_eq!(decode(&[0x02]), Value::Bool(false));
    }

    #[test]
    fn decodes_inline_and_wide_integers() {
        assert_eq!(decode(&[0x09]), Value::Int(1));
        assert_eq!(decode(&[0x30, 0x28]), Value::Int(40));
        assert_eq!(decode(&[0x32, 0x00, 0x01, 0x00, 0x00]), Value::Int(256));
    }

    #[test]
    fn decodes_strings() {
        assert_eq!(decode(&[0x41, b'a']), Value::String("a".into()));
    }

    #[test]
    fn rejects_top_level_terminator() {
        let mut decoder = Decoder::new(&[0x03]);
        assert!(matches!(
            decoder.decode_value(),
            Err(OpackError::InvalidType(0x03))
        ));
    }

    #[test]
    fn rejects_invalid_tag() {
        let mut decoder = Decoder::new(&[0x04, 0x04]);
        assert!(matches!(
            decoder.decode_value(),
            Err(OpackError::InvalidType(0x04))
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let mut decoder = Decoder::new(&[0x30]);
        assert!(matches!(
            decoder.decode_value(),
            Err(OpackError::UnexpectedEndOfInput(_))
        ));
    }

    #[test]
    fn decodes_terminated_array() {
        let mut bytes = vec![0xDF];
        bytes.extend(std::iter::repeat(0x09).take(15));
        bytes.push(0x03);
        let mut decoder = Decoder::new(&bytes);
        let value = decoder.decode_value().unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(1); 15]));
        assert_eq!(decoder.remaining(), 0);
    }

    #[test]
    fn decodes_terminated_dict() {
        // {1: 1} encoded with the terminated framing instead of the length
        // tag, to exercise the dict-terminated loop directly.
        let bytes = [0xEF, 0x09, 0x09, 0x03];
        let value = decode(&bytes);
        assert_eq!(value, Value::Dict(vec![(Value::Int(1), Value::Int(1))]));
    }

    #[test]
    fn enforces_recursion_limit() {
        let mut bytes = Vec::new();
        for _ in 0..10 {
            bytes.push(0xD1);
        }
        bytes.push(0x09);
        let mut decoder = Decoder::new(&bytes).with_max_depth(5);
        assert!(matches!(
            decoder.decode_value(),
            Err(OpackError::TooDeep(5))
        ));
    }
}
