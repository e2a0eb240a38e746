//! Core types for the OPack binary object format.
//!
//! This crate provides the `Value` tagged union, the `Timestamp` type used
//! by its `Timestamp` variant, and the error type shared by the encoder and
//! decoder in `opack-codec`. It has no knowledge of the wire format itself.

pub mod error;
pub mod timestamp;
pub mod value;

pub use error::{OpackError, OpackResult};
pub use timestamp::Timestamp;
pub use value::Value;
