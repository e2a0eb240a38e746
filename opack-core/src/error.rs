use thiserror::Error;

/// Errors produced while encoding or decoding OPack values.
#[derive(Error, Debug)]
pub enum OpackError {
    #[error("invalid type tag: 0x{0:02x}")]
    InvalidType(u8),

    #[error("integer does not fit in a u64")]
    IntegerOutOfBounds,

    #[error("byte string too large to encode ({0} bytes)")]
    BytesTooLarge(usize),

    #[error("unexpected end of input at offset {0}")]
    UnexpectedEndOfInput(usize),

    #[error("invalid utf-8 in string payload")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("{0} trailing byte(s) after top-level value")]
    TrailingData(usize),

    #[error("recursion limit exceeded (max depth {0})")]
    TooDeep(usize),
}

/// Result type alias for OPack operations.
pub type OpackResult<T> = Result<T, OpackError>;
