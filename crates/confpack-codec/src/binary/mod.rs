//! Compact binary codec.
//!
//! ```text
//! "MDCB" | compression:u8 | body
//! ```
//!
//! The body, after decompression, holds exactly one tagged value. Every
//! multi-byte field is big-endian.

pub mod compression;
pub mod decoder;
pub mod encoder;

use std::io::{Read, Write};

use tracing::debug;

pub use compression::Compression;
pub use decoder::BinaryDecoder;
pub use encoder::BinaryEncoder;

use crate::codec::{read_all, Charset, Codec, DEFAULT_MAX_DEPTH};
use crate::context::Context;
use crate::{DecodeError, EncodeError};

pub const MAGIC: &[u8; 4] = b"MDCB";

/// Type tags of the tagged value stream.
pub mod tag {
    pub const NULL: u8 = 0;
    pub const INT: u8 = 1;
    pub const LONG: u8 = 2;
    pub const SHORT: u8 = 3;
    pub const BYTE: u8 = 4;
    pub const FLOAT: u8 = 5;
    pub const DOUBLE: u8 = 6;
    /// Integer wider than 64 bits, as a length-prefixed decimal string.
    pub const BIG: u8 = 7;
    pub const STRING: u8 = 8;
    pub const BOOL: u8 = 9;
    pub const LIST: u8 = 10;
    pub const MAP: u8 = 11;
    pub const BLOB: u8 = 12;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryCodec {
    pub compression: Compression,
    pub max_depth: usize,
}

impl Default for BinaryCodec {
    fn default() -> Self {
        Self::new(Compression::None)
    }
}

impl BinaryCodec {
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Full document: header plus compressed body.
    pub fn encode_bytes<C: Context>(&self, ctx: &C, value: &C::Value) -> Result<Vec<u8>, EncodeError> {
        if !self.compression.is_available() {
            return Err(EncodeError::UnsupportedCompression(self.compression.name()));
        }
        let mut encoder = BinaryEncoder::new(ctx);
        let body = encoder.encode(value)?;
        let packed = self.compression.compress(&body)?;
        debug!(
            compression = self.compression.name(),
            raw = body.len(),
            packed = packed.len(),
            "encoded binary document"
        );
        let mut out = Vec::with_capacity(packed.len() + 5);
        out.extend_from_slice(MAGIC);
        out.push(self.compression.id());
        out.extend_from_slice(&packed);
        Ok(out)
    }

    /// Any compression mode is accepted regardless of `self.compression`.
    pub fn decode_bytes<C: Context>(&self, ctx: &C, data: &[u8]) -> Result<C::Value, DecodeError> {
        if data.len() < 5 || &data[..4] != MAGIC {
            return Err(DecodeError::MissingHeader);
        }
        let compression = Compression::from_id(data[4])?;
        debug!(compression = compression.name(), bytes = data.len(), "decoding binary document");
        let body = compression.decompress(&data[5..])?;
        BinaryDecoder::new(ctx, self.max_depth).decode(&body)
    }
}

impl Codec for BinaryCodec {
    fn encode<C: Context>(
        &self,
        ctx: &C,
        value: &C::Value,
        out: &mut dyn Write,
        _charset: Charset,
    ) -> Result<(), EncodeError> {
        let bytes = self.encode_bytes(ctx, value)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    fn decode<C: Context>(
        &self,
        ctx: &C,
        input: &mut dyn Read,
        _charset: Charset,
    ) -> Result<C::Value, DecodeError> {
        let data = read_all(input)?;
        self.decode_bytes(ctx, &data)
    }
}
