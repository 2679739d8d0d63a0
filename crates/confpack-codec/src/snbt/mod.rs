//! Typed-tag text codec.
//!
//! A compact textual rendering of the typed-tag model: kind suffixes on
//! numbers, bare keys where possible and `[B;..]`/`[I;..]`/`[L;..]` for the
//! packed arrays. Decoding restores the same tag hints as the binary codec,
//! so text and binary documents convert into each other losslessly.

pub mod decoder;
pub mod encoder;

use std::io::{Read, Write};

use tracing::debug;

pub use decoder::SnbtDecoder;
pub use encoder::SnbtEncoder;

use crate::codec::{read_all, Charset, Codec, DEFAULT_MAX_DEPTH};
use crate::context::Context;
use crate::{DecodeError, EncodeError};

/// How string values and quoted keys are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Double quotes, or single quotes when the string contains a double quote.
    #[default]
    Auto,
    Double,
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnbtCodec {
    pub expect_root_name: bool,
    pub expect_indices: bool,
    pub quotes: QuoteStyle,
    pub max_depth: usize,
}

impl Default for SnbtCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl SnbtCodec {
    pub fn new() -> Self {
        Self {
            expect_root_name: false,
            expect_indices: false,
            quotes: QuoteStyle::Auto,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn expect_root_name(mut self, expect: bool) -> Self {
        self.expect_root_name = expect;
        self
    }

    /// Writes and requires `N:` prefixes on every element of a bracketed
    /// sequence.
    pub fn expect_indices(mut self, expect: bool) -> Self {
        self.expect_indices = expect;
        self
    }

    pub fn quotes(mut self, quotes: QuoteStyle) -> Self {
        self.quotes = quotes;
        self
    }

    pub fn use_double_quotes(self) -> Self {
        self.quotes(QuoteStyle::Double)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn encode_text<C: Context>(&self, ctx: &C, value: &C::Value) -> Result<String, EncodeError> {
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
        SnbtEncoder::new(ctx, self.quotes, self.expect_indices).encode(value, root_name)
    }

    pub fn decode_text<C: Context>(&self, ctx: &C, text: &str) -> Result<C::Value, DecodeError> {
        SnbtDecoder::new(ctx, text, self.max_depth, self.expect_indices).decode(self.expect_root_name)
    }
}

impl Codec for SnbtCodec {
    fn encode<C: Context>(
        &self,
        ctx: &C,
        value: &C::Value,
        out: &mut dyn Write,
        charset: Charset,
    ) -> Result<(), EncodeError> {
        let text = self.encode_text(ctx, value)?;
        let bytes = charset.encode(&text)?;
        debug!(bytes = bytes.len(), quotes = ?self.quotes, "encoded snbt document");
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
        let text = charset.decode(read_all(input)?)?;
        debug!(chars = text.len(), "decoding snbt document");
        self.decode_text(ctx, &text)
    }
}
