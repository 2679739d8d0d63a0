//! `BinaryEncoder` — writes the tagged value stream.

use confpack_buffers::Writer;

use super::tag;
use crate::context::{Context, ValueKind};
use crate::{EncodeError, Number};

pub struct BinaryEncoder<'c, C: Context> {
    ctx: &'c C,
    pub writer: Writer,
}

impl<'c, C: Context> BinaryEncoder<'c, C> {
    pub fn new(ctx: &'c C) -> Self {
        Self {
            ctx,
            writer: Writer::new(),
        }
    }

    /// Encodes one value into an uncompressed body.
    pub fn encode(&mut self, value: &C::Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        self.write_any(value)?;
        Ok(self.writer.flush())
    }

    pub fn write_any(&mut self, value: &C::Value) -> Result<(), EncodeError> {
        let ctx = self.ctx;
        match ctx.kind(value) {
            ValueKind::Null => self.writer.u8(tag::NULL),
            ValueKind::Bool => {
                self.writer.u8(tag::BOOL);
                self.writer.u8(ctx.as_bool(value)? as u8);
            }
            ValueKind::Number => self.write_number(ctx.as_number(value)?)?,
            ValueKind::String => {
                self.writer.u8(tag::STRING);
                self.writer.str_i32(ctx.as_string(value)?)?;
            }
            ValueKind::Blob => {
                let blob = ctx.as_blob(value)?;
                self.writer.u8(tag::BLOB);
                self.writer.len_i32(blob.len())?;
                self.writer.buf(blob);
            }
            ValueKind::List => {
                let items = ctx.as_list(value)?;
                self.writer.u8(tag::LIST);
                self.writer.len_i32(items.len())?;
                for item in items {
                    self.write_any(item)?;
                }
            }
            ValueKind::Map => {
                let entries = ctx.as_map(value)?;
                self.writer.u8(tag::MAP);
                self.writer.len_i32(entries.len())?;
                for (key, item) in entries {
                    self.writer.str_i32(key)?;
                    self.write_any(item)?;
                }
            }
        }
        Ok(())
    }

    pub fn write_number(&mut self, num: Number) -> Result<(), EncodeError> {
        let w = &mut self.writer;
        match num {
            Number::Byte(v) => {
                w.u8(tag::BYTE);
                w.i8(v);
            }
            Number::Short(v) => {
                w.u8(tag::SHORT);
                w.i16(v);
            }
            Number::Int(v) => {
                w.u8(tag::INT);
                w.i32(v);
            }
            Number::Long(v) => {
                w.u8(tag::LONG);
                w.i64(v);
            }
            Number::Float(v) => {
                w.u8(tag::FLOAT);
                w.f32(v);
            }
            Number::Double(v) => {
                w.u8(tag::DOUBLE);
                w.f64(v);
            }
            Number::Big(v) => {
                w.u8(tag::BIG);
                w.str_i32(&v.to_string())?;
            }
        }
        Ok(())
    }
}
