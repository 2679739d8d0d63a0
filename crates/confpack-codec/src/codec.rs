//! The `Codec` trait and the pieces every codec shares.

use std::io::{Read, Write};

use crate::binary::BinaryCodec;
use crate::context::Context;
use crate::json::JsonCodec;
use crate::nbt::NbtCodec;
use crate::snbt::SnbtCodec;
use crate::{DecodeError, EncodeError};

/// Nesting limit applied by every decoder unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Character set used by the text codecs. Binary codecs ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1: one byte per character, U+0000..=U+00FF only.
    Latin1,
}

impl Charset {
    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodeError> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c as u32).map_err(|_| EncodeError::Charset(c as u32)))
                .collect(),
        }
    }

    pub fn decode(self, bytes: Vec<u8>) -> Result<String, DecodeError> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8),
            Charset::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}

/// Reads and writes whole documents through a [`Context`].
pub trait Codec {
    fn encode<C: Context>(
        &self,
        ctx: &C,
        value: &C::Value,
        out: &mut dyn Write,
        charset: Charset,
    ) -> Result<(), EncodeError>;

    fn decode<C: Context>(
        &self,
        ctx: &C,
        input: &mut dyn Read,
        charset: Charset,
    ) -> Result<C::Value, DecodeError>;

    fn encode_to_vec<C: Context>(&self, ctx: &C, value: &C::Value) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.encode(ctx, value, &mut out, Charset::Utf8)?;
        Ok(out)
    }

    /// UTF-8 text of the encoded document. Binary output is decoded lossily.
    fn encode_to_string<C: Context>(&self, ctx: &C, value: &C::Value) -> Result<String, EncodeError> {
        let bytes = self.encode_to_vec(ctx, value)?;
        Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    fn decode_slice<C: Context>(&self, ctx: &C, mut bytes: &[u8]) -> Result<C::Value, DecodeError> {
        self.decode(ctx, &mut bytes, Charset::Utf8)
    }

    fn decode_str<C: Context>(&self, ctx: &C, text: &str) -> Result<C::Value, DecodeError> {
        self.decode_slice(ctx, text.as_bytes())
    }
}

/// Reads the rest of `input` into memory.
pub(crate) fn read_all(input: &mut dyn Read) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Recursion counter shared by the decoders.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Depth {
    current: usize,
    max: usize,
}

impl Depth {
    pub(crate) fn new(max: usize) -> Self {
        Self { current: 0, max }
    }

    #[inline]
    pub(crate) fn enter(&mut self) -> Result<(), DecodeError> {
        if self.current >= self.max {
            return Err(DecodeError::DepthExceeded(self.max));
        }
        self.current += 1;
        Ok(())
    }

    #[inline]
    pub(crate) fn leave(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

// ── AnyCodec ──────────────────────────────────────────────────────────────

/// One of the built-in codecs, for places that pick a codec at runtime.
#[derive(Debug, Clone)]
pub enum AnyCodec {
    Json(JsonCodec),
    Binary(BinaryCodec),
    Nbt(NbtCodec),
    Snbt(SnbtCodec),
}

impl AnyCodec {
    pub fn name(&self) -> &'static str {
        match self {
            AnyCodec::Json(_) => "json",
            AnyCodec::Binary(_) => "binary",
            AnyCodec::Nbt(_) => "nbt",
            AnyCodec::Snbt(_) => "snbt",
        }
    }
}

impl Codec for AnyCodec {
    fn encode<C: Context>(
        &self,
        ctx: &C,
        value: &C::Value,
        out: &mut dyn Write,
        charset: Charset,
    ) -> Result<(), EncodeError> {
        match self {
            AnyCodec::Json(c) => c.encode(ctx, value, out, charset),
            AnyCodec::Binary(c) => c.encode(ctx, value, out, charset),
            AnyCodec::Nbt(c) => c.encode(ctx, value, out, charset),
            AnyCodec::Snbt(c) => c.encode(ctx, value, out, charset),
        }
    }

    fn decode<C: Context>(
        &self,
        ctx: &C,
        input: &mut dyn Read,
        charset: Charset,
    ) -> Result<C::Value, DecodeError> {
        match self {
            AnyCodec::Json(c) => c.decode(ctx, input, charset),
            AnyCodec::Binary(c) => c.decode(ctx, input, charset),
            AnyCodec::Nbt(c) => c.decode(ctx, input, charset),
            AnyCodec::Snbt(c) => c.decode(ctx, input, charset),
        }
    }
}

impl From<JsonCodec> for AnyCodec {
    fn from(c: JsonCodec) -> Self {
        AnyCodec::Json(c)
    }
}

impl From<BinaryCodec> for AnyCodec {
    fn from(c: BinaryCodec) -> Self {
        AnyCodec::Binary(c)
    }
}

impl From<NbtCodec> for AnyCodec {
    fn from(c: NbtCodec) -> Self {
        AnyCodec::Nbt(c)
    }
}

impl From<SnbtCodec> for AnyCodec {
    fn from(c: SnbtCodec) -> Self {
        AnyCodec::Snbt(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_roundtrip() {
        let bytes = Charset::Latin1.encode("café").unwrap();
        assert_eq!(bytes, [b'c', b'a', b'f', 0xe9]);
        assert_eq!(Charset::Latin1.decode(bytes).unwrap(), "café");
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        assert_eq!(
            Charset::Latin1.encode("€"),
            Err(EncodeError::Charset(0x20ac))
        );
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        assert_eq!(
            Charset::Utf8.decode(vec![0xff, 0xfe]),
            Err(DecodeError::InvalidUtf8)
        );
    }

    #[test]
    fn depth_guard_trips_at_limit() {
        let mut depth = Depth::new(2);
        depth.enter().unwrap();
        depth.enter().unwrap();
        assert_eq!(depth.enter(), Err(DecodeError::DepthExceeded(2)));
        depth.leave();
        assert!(depth.enter().is_ok());
    }
}
