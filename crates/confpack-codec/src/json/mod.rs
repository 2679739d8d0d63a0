//! JSON-like text codec.
//!
//! Numbers are written without width information and re-inferred on decode:
//! a token with `.` or `E` becomes a double, anything else the narrowest of
//! int, long or big integer that holds it.

pub mod decoder;
pub mod encoder;

use std::io::{Read, Write};

use tracing::debug;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;

use crate::codec::{read_all, Charset, Codec, DEFAULT_MAX_DEPTH};
use crate::context::Context;
use crate::{DecodeError, EncodeError};

/// Text codec configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonCodec {
    /// Spaces per nesting level; 0 writes minified output.
    pub indent: usize,
    pub max_depth: usize,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::minified()
    }
}

impl JsonCodec {
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn minified() -> Self {
        Self::new(0)
    }

    /// Four-space indentation.
    pub fn readable() -> Self {
        Self::new(4)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Encodes to a `String` without going through a byte stream.
    pub fn encode_text<C: Context>(&self, ctx: &C, value: &C::Value) -> Result<String, EncodeError> {
        let mut encoder = JsonEncoder::new(ctx, self.indent);
        encoder.write_any(value)?;
        Ok(encoder.into_string())
    }

    pub fn decode_text<C: Context>(&self, ctx: &C, text: &str) -> Result<C::Value, DecodeError> {
        JsonDecoder::new(ctx, text, self.max_depth).decode()
    }
}

impl Codec for JsonCodec {
    fn encode<C: Context>(
        &self,
        ctx: &C,
        value: &C::Value,
        out: &mut dyn Write,
        charset: Charset,
    ) -> Result<(), EncodeError> {
        let text = self.encode_text(ctx, value)?;
        let bytes = charset.encode(&text)?;
        debug!(bytes = bytes.len(), indent = self.indent, "encoded json document");
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    fn decode<C: Context>(
        &self,
        ctx: &C,
        input: &mut dyn Read,
        charset: Charset,
    ) -> Result<C::Value, DecodeError> {
        let bytes = read_all(input)?;
        debug!(bytes = bytes.len(), "decoding json document");
        let text = charset.decode(bytes)?;
        self.decode_text(ctx, &text)
    }
}
