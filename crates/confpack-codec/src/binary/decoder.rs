//! `BinaryDecoder` — reads the tagged value stream.

use confpack_buffers::Reader;
use num_bigint::BigInt;
use tracing::trace;

use super::tag;
use crate::codec::Depth;
use crate::context::Context;
use crate::{DecodeError, Number};

pub struct BinaryDecoder<'c, C: Context> {
    ctx: &'c C,
    depth: Depth,
}

impl<'c, C: Context> BinaryDecoder<'c, C> {
    pub fn new(ctx: &'c C, max_depth: usize) -> Self {
        Self {
            ctx,
            depth: Depth::new(max_depth),
        }
    }

    /// Decodes an uncompressed body. The body must hold exactly one value.
    pub fn decode(&mut self, body: &[u8]) -> Result<C::Value, DecodeError> {
        let mut reader = Reader::new(body);
        let value = self.read_any(&mut reader)?;
        if !reader.is_at_end() {
            return Err(DecodeError::TrailingData);
        }
        Ok(value)
    }

    fn read_string(reader: &mut Reader<'_>) -> Result<String, DecodeError> {
        let bytes = reader.bytes_i32()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }

    pub fn read_any(&mut self, reader: &mut Reader<'_>) -> Result<C::Value, DecodeError> {
        let ctx = self.ctx;
        let t = reader.u8()?;
        let value = match t {
            tag::NULL => ctx.null(),
            tag::INT => ctx.from_number(Number::Int(reader.i32()?)),
            tag::LONG => ctx.from_number(Number::Long(reader.i64()?)),
            tag::SHORT => ctx.from_number(Number::Short(reader.i16()?)),
            tag::BYTE => ctx.from_number(Number::Byte(reader.i8()?)),
            tag::FLOAT => ctx.from_number(Number::Float(reader.f32()?)),
            tag::DOUBLE => ctx.from_number(Number::Double(reader.f64()?)),
            tag::BIG => {
                let text = Self::read_string(reader)?;
                let v: BigInt = text
                    .parse()
                    .map_err(|_| DecodeError::InvalidNumber(text.clone()))?;
                ctx.from_number(Number::Big(v))
            }
            tag::STRING => ctx.from_string(Self::read_string(reader)?),
            tag::BOOL => ctx.from_bool(reader.u8()? != 0),
            tag::BLOB => ctx.from_blob(reader.bytes_i32()?.to_vec()),
            tag::LIST => {
                self.depth.enter()?;
                let items = self.read_list(reader);
                self.depth.leave();
                ctx.from_list(items?)
            }
            tag::MAP => {
                self.depth.enter()?;
                let entries = self.read_map(reader);
                self.depth.leave();
                ctx.from_map(entries?)
            }
            other => return Err(DecodeError::UnknownTag(other)),
        };
        Ok(value)
    }

    fn read_list(&mut self, reader: &mut Reader<'_>) -> Result<Vec<C::Value>, DecodeError> {
        let len = reader.len_i32()?;
        trace!(len, "binary list");
        // Each element takes at least one byte; cap the preallocation by that.
        let mut items = Vec::with_capacity(len.min(reader.size()));
        for i in 0..len {
            let item = self
                .read_any(reader)
                .map_err(|e| e.context(format!("while decoding list element {i}")))?;
            items.push(item);
        }
        Ok(items)
    }

    fn read_map(&mut self, reader: &mut Reader<'_>) -> Result<Vec<(String, C::Value)>, DecodeError> {
        let len = reader.len_i32()?;
        trace!(len, "binary map");
        let mut entries = Vec::with_capacity(len.min(reader.size()));
        for _ in 0..len {
            let key = Self::read_string(reader)?;
            let value = self
                .read_any(reader)
                .map_err(|e| e.context(format!("while decoding value of key '{key}'")))?;
            entries.push((key, value));
        }
        Ok(entries)
    }
}
