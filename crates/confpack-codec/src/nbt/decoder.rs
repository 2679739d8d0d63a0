//! `NbtDecoder` — reads the typed-tag binary form.
//!
//! Decoded lists and compounds remember their tag (and element tag) in
//! metadata so that re-encoding reproduces the same bytes.

use confpack_buffers::Reader;
use tracing::trace;

use super::mutf8;
use crate::codec::Depth;
use crate::context::Context;
use crate::{DecodeError, Number, TagKind};

pub struct NbtDecoder<'c, C: Context> {
    ctx: &'c C,
    depth: Depth,
}

fn read_tag(reader: &mut Reader<'_>) -> Result<TagKind, DecodeError> {
    let id = reader.u8()?;
    TagKind::from_id(id).ok_or(DecodeError::UnknownTag(id))
}

fn read_string(reader: &mut Reader<'_>) -> Result<String, DecodeError> {
    mutf8::decode(reader.bytes_u16()?)
}

impl<'c, C: Context> NbtDecoder<'c, C> {
    pub fn new(ctx: &'c C, max_depth: usize) -> Self {
        Self {
            ctx,
            depth: Depth::new(max_depth),
        }
    }

    /// Decodes a whole document. With `expect_root_name` the root must be a
    /// compound followed by its name, which is stored as metadata.
    pub fn decode(&mut self, data: &[u8], expect_root_name: bool) -> Result<C::Value, DecodeError> {
        let mut reader = Reader::new(data);
        let tag = read_tag(&mut reader)?;
        let root_name = if expect_root_name {
            if tag != TagKind::Compound {
                return Err(DecodeError::RootNotCompound);
            }
            Some(read_string(&mut reader)?)
        } else {
            None
        };
        trace!(%tag, ?root_name, "nbt root");
        let mut value = self.read_payload(tag, &mut reader)?;
        if !reader.is_at_end() {
            return Err(DecodeError::TrailingData);
        }
        if let Some(name) = root_name {
            self.ctx.set_root_name(&mut value, name);
        }
        Ok(value)
    }

    fn read_count(reader: &mut Reader<'_>) -> Result<usize, DecodeError> {
        Ok(reader.len_i32()?)
    }

    pub fn read_payload(&mut self, tag: TagKind, reader: &mut Reader<'_>) -> Result<C::Value, DecodeError> {
        let ctx = self.ctx;
        let value = match tag {
            TagKind::End => return Err(DecodeError::UnexpectedTag(TagKind::End)),
            TagKind::Byte => ctx.from_number(Number::Byte(reader.i8()?)),
            TagKind::Short => ctx.from_number(Number::Short(reader.i16()?)),
            TagKind::Int => ctx.from_number(Number::Int(reader.i32()?)),
            TagKind::Long => ctx.from_number(Number::Long(reader.i64()?)),
            TagKind::Float => ctx.from_number(Number::Float(reader.f32()?)),
            TagKind::Double => ctx.from_number(Number::Double(reader.f64()?)),
            TagKind::String => ctx.from_string(read_string(reader)?),
            TagKind::ByteArray => {
                let len = Self::read_count(reader)?;
                ctx.from_blob(reader.buf(len)?.to_vec())
            }
            TagKind::IntArray => {
                let len = Self::read_count(reader)?;
                let mut items = Vec::with_capacity(len.min(reader.size() / 4));
                for _ in 0..len {
                    items.push(ctx.from_number(Number::Int(reader.i32()?)));
                }
                self.tagged(ctx.from_list(items), tag, Some(TagKind::Int))
            }
            TagKind::LongArray => {
                let len = Self::read_count(reader)?;
                let mut items = Vec::with_capacity(len.min(reader.size() / 8));
                for _ in 0..len {
                    items.push(ctx.from_number(Number::Long(reader.i64()?)));
                }
                self.tagged(ctx.from_list(items), tag, Some(TagKind::Long))
            }
            TagKind::List => {
                let element = read_tag(reader)?;
                let len = Self::read_count(reader)?;
                self.depth.enter()?;
                let items = self.read_list(element, len, reader);
                self.depth.leave();
                self.tagged(ctx.from_list(items?), tag, Some(element))
            }
            TagKind::Compound => {
                self.depth.enter()?;
                let entries = self.read_compound(reader);
                self.depth.leave();
                self.tagged(ctx.from_map(entries?), tag, None)
            }
        };
        Ok(value)
    }

    fn tagged(&self, mut value: C::Value, tag: TagKind, element: Option<TagKind>) -> C::Value {
        self.ctx.set_tag_hint(&mut value, tag);
        if let Some(element) = element {
            self.ctx.set_element_tag_hint(&mut value, element);
        }
        value
    }

    fn read_list(
        &mut self,
        element: TagKind,
        len: usize,
        reader: &mut Reader<'_>,
    ) -> Result<Vec<C::Value>, DecodeError> {
        let mut items = Vec::with_capacity(len.min(reader.size()));
        for i in 0..len {
            let item = self
                .read_payload(element, reader)
                .map_err(|e| e.context(format!("while decoding list element {i}")))?;
            items.push(item);
        }
        Ok(items)
    }

    fn read_compound(&mut self, reader: &mut Reader<'_>) -> Result<Vec<(String, C::Value)>, DecodeError> {
        let mut entries = Vec::new();
        loop {
            let tag = read_tag(reader)?;
            if tag == TagKind::End {
                return Ok(entries);
            }
            let name = read_string(reader)?;
            let value = self
                .read_payload(tag, reader)
                .map_err(|e| e.context(format!("while decoding value of key '{name}'")))?;
            entries.push((name, value));
        }
    }
}
