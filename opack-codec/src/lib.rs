//! Tag-dispatch binary codec for OPack values.
//!
//! This crate is where the one-byte tag dispatch actually lives: the
//! classifier in `tag`, the encoder in `encoder`, and the decoder in
//! `decoder`. It depends on `opack-core` for the `Value`/`Timestamp`/error
//! types but knows nothing else about the rest of the host application.

pub mod decoder;
pub mod encoder;
pub mod tag;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use tag::Category;
