//! Typed-tag binary codec.
//!
//! Every document starts with the root's tag byte. When the codec expects a
//! root name, the root must be a compound and its name (a length-prefixed
//! modified UTF-8 string) follows the tag. Lists are homogeneous: one element
//! tag, a 4-byte count, then untagged payloads. The packed array tags store a
//! count followed by raw fixed-width elements.

pub mod decoder;
pub mod encoder;
pub mod infer;
pub mod mutf8;

use std::io::{Read, Write};

use tracing::debug;

pub use decoder::NbtDecoder;
pub use encoder::NbtEncoder;
pub use infer::{element_tag_of, tag_of};

use crate::codec::{read_all, Charset, Codec, DEFAULT_MAX_DEPTH};
use crate::context::Context;
use crate::{ConfigValue, DecodeError, EncodeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbtCodec {
    pub expect_root_name: bool,
    pub max_depth: usize,
}

impl Default for NbtCodec {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NbtCodec {
    pub fn new(expect_root_name: bool) -> Self {
        Self {
            expect_root_name,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn encode_bytes<C: Context>(&self, ctx: &C, value: &C::Value) -> Result<Vec<u8>, EncodeError> {
        let root_name = if self.expect_root_name {
            if !ctx.is_map(value) {
                return Err(EncodeError::RootNotCompound(ctx.kind(value)));
            }
            if !ctx.supports_metadata(value) {
                return Err(EncodeError::MetadataUnsupported("root name"));
            }
            Some(ctx.root_name(value).unwrap_or(""))
        } else {
            None
        };
        let bytes = NbtEncoder::new(ctx).encode(value, root_name)?;
        debug!(bytes = bytes.len(), ?root_name, "encoded nbt document");
        Ok(bytes)
    }

    pub fn decode_bytes<C: Context>(&self, ctx: &C, data: &[u8]) -> Result<C::Value, DecodeError> {
        debug!(bytes = data.len(), "decoding nbt document");
        NbtDecoder::new(ctx, self.max_depth).decode(data, self.expect_root_name)
    }
}

impl Codec for NbtCodec {
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

/// A UUID as the four-int array used by the protocol, most significant
/// word first.
pub fn uuid_int_array(uuid: u128) -> ConfigValue {
    let words = [
        (uuid >> 96) as u32 as i32,
        (uuid >> 64) as u32 as i32,
        (uuid >> 32) as u32 as i32,
        uuid as u32 as i32,
    ];
    ConfigValue::int_array(&words)
}
