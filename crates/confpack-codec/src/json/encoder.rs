//! `JsonEncoder` — writes a value as JSON text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::context::{Context, ValueKind};
use crate::value::write_float;
use crate::{EncodeError, Number};

pub struct JsonEncoder<'c, C: Context> {
    ctx: &'c C,
    indent: usize,
    depth: usize,
    out: String,
}

impl<'c, C: Context> JsonEncoder<'c, C> {
    pub fn new(ctx: &'c C, indent: usize) -> Self {
        Self {
            ctx,
            indent,
            depth: 0,
            out: String::new(),
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn write_any(&mut self, value: &C::Value) -> Result<(), EncodeError> {
        let ctx = self.ctx;
        match ctx.kind(value) {
            ValueKind::Null => self.out.push_str("null"),
            ValueKind::Bool => {
                self.out
                    .push_str(if ctx.as_bool(value)? { "true" } else { "false" })
            }
            ValueKind::Number => self.write_number(ctx.as_number(value)?),
            ValueKind::String => self.write_str(ctx.as_string(value)?),
            ValueKind::Blob => {
                let encoded = STANDARD.encode(ctx.as_blob(value)?);
                self.write_str(&encoded);
            }
            ValueKind::List => self.write_arr(ctx.as_list(value)?)?,
            ValueKind::Map => self.write_obj(ctx.as_map(value)?)?,
        }
        Ok(())
    }

    /// Integers verbatim; floats always carry a fraction so they read back
    /// as floats. `NaN` becomes `null` and infinities saturate to `±1E308`.
    pub fn write_number(&mut self, num: Number) {
        match num {
            Number::Float(_) | Number::Double(_) => {
                let v = num.to_f64();
                if v.is_nan() {
                    self.out.push_str("null");
                } else if v.is_infinite() {
                    self.out.push_str(if v > 0.0 { "1E308" } else { "-1E308" });
                } else {
                    write_float(&mut self.out, v, matches!(num, Number::Float(_)));
                }
            }
            other => self.out.push_str(&other.to_string()),
        }
    }

    /// Writes a quoted string, escaping quotes, backslashes and control
    /// characters.
    pub fn write_str(&mut self, s: &str) {
        let out = &mut self.out;
        out.reserve(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\u{08}' => out.push_str("\\b"),
                '\u{0c}' => out.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        }
        out.push('"');
    }

    fn newline(&mut self) {
        if self.indent > 0 {
            self.out.push('\n');
            for _ in 0..self.indent * self.depth {
                self.out.push(' ');
            }
        }
    }

    pub fn write_arr(&mut self, items: &[C::Value]) -> Result<(), EncodeError> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        self.depth += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.write_any(item)?;
        }
        self.depth -= 1;
        self.newline();
        self.out.push(']');
        Ok(())
    }

    pub fn write_obj(&mut self, entries: Vec<(&str, &C::Value)>) -> Result<(), EncodeError> {
        if entries.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push('{');
        self.depth += 1;
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.write_str(key);
            self.out.push(':');
            if self.indent > 0 {
                self.out.push(' ');
            }
            self.write_any(value)?;
        }
        self.depth -= 1;
        self.newline();
        self.out.push('}');
        Ok(())
    }
}
