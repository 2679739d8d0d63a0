//! `NbtEncoder` — writes the typed-tag binary form.

use confpack_buffers::Writer;

use super::infer::{element_tag_of, number_for, tag_of};
use super::mutf8;
use crate::context::Context;
use crate::{EncodeError, Number, NumberKind, TagKind};

pub struct NbtEncoder<'c, C: Context> {
    ctx: &'c C,
    pub writer: Writer,
}

impl<'c, C: Context> NbtEncoder<'c, C> {
    pub fn new(ctx: &'c C) -> Self {
        Self {
            ctx,
            writer: Writer::new(),
        }
    }

    /// Writes the root tag, the root name when `root_name` is given, then
    /// the payload.
    pub fn encode(&mut self, value: &C::Value, root_name: Option<&str>) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        let tag = tag_of(self.ctx, value)?;
        self.writer.u8(tag.id());
        if let Some(name) = root_name {
            self.write_string(name)?;
        }
        self.write_payload(tag, value)?;
        Ok(self.writer.flush())
    }

    pub fn write_string(&mut self, s: &str) -> Result<(), EncodeError> {
        let bytes = mutf8::encode(s);
        self.writer
            .bytes_u16(&bytes)
            .map_err(|_| EncodeError::StringTooLong(bytes.len()))
    }

    /// Writes `n` at its own width; callers convert it first.
    fn write_number(&mut self, n: Number) -> Result<(), EncodeError> {
        match n {
            Number::Byte(v) => self.writer.i8(v),
            Number::Short(v) => self.writer.i16(v),
            Number::Int(v) => self.writer.i32(v),
            Number::Long(v) => self.writer.i64(v),
            Number::Float(v) => self.writer.f32(v),
            Number::Double(v) => self.writer.f64(v),
            Number::Big(_) => return Err(EncodeError::UnsupportedNumber(NumberKind::Big)),
        }
        Ok(())
    }

    fn list<'v>(&self, value: &'v C::Value, tag: TagKind) -> Result<&'v [C::Value], EncodeError> {
        self.ctx.as_list(value).map_err(|e| EncodeError::Unmappable { kind: e.found, tag })
    }

    pub fn write_payload(&mut self, tag: TagKind, value: &C::Value) -> Result<(), EncodeError> {
        let ctx = self.ctx;
        match tag {
            TagKind::End => {
                return Err(EncodeError::Unmappable {
                    kind: ctx.kind(value),
                    tag,
                })
            }
            TagKind::Byte | TagKind::Short | TagKind::Int | TagKind::Long | TagKind::Float | TagKind::Double => {
                let n = number_for(ctx, value, tag)?;
                self.write_number(n)?;
            }
            TagKind::String => {
                let s = ctx.as_string(value).map_err(|e| EncodeError::Unmappable {
                    kind: e.found,
                    tag,
                })?;
                self.write_string(s)?;
            }
            TagKind::ByteArray if ctx.is_blob(value) => {
                let blob = ctx.as_blob(value)?;
                self.writer.len_i32(blob.len())?;
                self.writer.buf(blob);
            }
            TagKind::ByteArray | TagKind::IntArray | TagKind::LongArray => {
                let items = self.list(value, tag)?;
                self.writer.len_i32(items.len())?;
                let element = tag.array_element().unwrap_or(TagKind::Long);
                for item in items {
                    let n = number_for(ctx, item, element)?;
                    self.write_number(n)?;
                }
            }
            TagKind::List => {
                let items = self.list(value, tag)?;
                let element = element_tag_of(ctx, value)?;
                self.writer.u8(element.id());
                self.writer.len_i32(items.len())?;
                for item in items {
                    self.write_payload(element, item)?;
                }
            }
            TagKind::Compound => {
                let entries = ctx.as_map(value).map_err(|e| EncodeError::Unmappable {
                    kind: e.found,
                    tag,
                })?;
                for (key, item) in entries {
                    let item_tag = tag_of(ctx, item)?;
                    self.writer.u8(item_tag.id());
                    self.write_string(key)?;
                    self.write_payload(item_tag, item)?;
                }
                self.writer.u8(TagKind::End.id());
            }
        }
        Ok(())
    }
}
