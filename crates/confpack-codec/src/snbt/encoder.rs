//! `SnbtEncoder` — compact typed-tag text.

use std::fmt::Write as _;

use super::QuoteStyle;
use crate::context::Context;
use crate::nbt::infer::{element_tag_of, number_for, tag_of};
use crate::value::write_float;
use crate::{EncodeError, Number, TagKind};

pub struct SnbtEncoder<'c, C: Context> {
    ctx: &'c C,
    quotes: QuoteStyle,
    indices: bool,
    out: String,
}

/// Keys are written bare unless empty or containing a delimiter,
/// a quote or whitespace.
pub fn key_needs_quotes(key: &str) -> bool {
    key.is_empty()
        || key.chars().any(|c| {
            c.is_whitespace() || matches!(c, '[' | ']' | '{' | '}' | '(' | ')' | ',' | '"' | '\'' | ':')
        })
}

impl<'c, C: Context> SnbtEncoder<'c, C> {
    pub fn new(ctx: &'c C, quotes: QuoteStyle, indices: bool) -> Self {
        Self {
            ctx,
            quotes,
            indices,
            out: String::new(),
        }
    }

    /// Writes `value`, prefixed with `name:` when a root name is given.
    pub fn encode(mut self, value: &C::Value, root_name: Option<&str>) -> Result<String, EncodeError> {
        if let Some(name) = root_name {
            self.write_key(name);
            self.out.push(':');
        }
        self.write_any(value)?;
        Ok(self.out)
    }

    fn write_key(&mut self, key: &str) {
        if key_needs_quotes(key) {
            self.write_str(key);
        } else {
            self.out.push_str(key);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        let quote = match self.quotes {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
            QuoteStyle::Auto if s.contains('"') => '\'',
            QuoteStyle::Auto => '"',
        };
        self.out.reserve(s.len() + 2);
        self.out.push(quote);
        for c in s.chars() {
            if c == quote || c == '\\' {
                self.out.push('\\');
            }
            self.out.push(c);
        }
        self.out.push(quote);
    }

    fn index(&mut self, i: usize) {
        if i > 0 {
            self.out.push(',');
        }
        if self.indices {
            let _ = write!(self.out, "{i}:");
        }
    }

    pub fn write_any(&mut self, value: &C::Value) -> Result<(), EncodeError> {
        let tag = tag_of(self.ctx, value)?;
        self.write_tagged(tag, value)
    }

    fn write_tagged(&mut self, tag: TagKind, value: &C::Value) -> Result<(), EncodeError> {
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
                let _ = match n {
                    Number::Byte(v) => write!(self.out, "{v}b"),
                    Number::Short(v) => write!(self.out, "{v}s"),
                    Number::Long(v) => write!(self.out, "{v}L"),
                    Number::Float(v) => {
                        write_float(&mut self.out, f64::from(v), true);
                        write!(self.out, "f")
                    }
                    Number::Double(v) => {
                        write_float(&mut self.out, v, false);
                        write!(self.out, "d")
                    }
                    other => write!(self.out, "{other}"),
                };
            }
            TagKind::String => {
                let s = ctx.as_string(value).map_err(|e| EncodeError::Unmappable {
                    kind: e.found,
                    tag,
                })?;
                self.write_str(s);
            }
            TagKind::ByteArray if ctx.is_blob(value) => {
                self.out.push_str("[B;");
                for (i, b) in ctx.as_blob(value)?.iter().enumerate() {
                    self.index(i);
                    let _ = write!(self.out, "{}", *b as i8);
                }
                self.out.push(']');
            }
            TagKind::ByteArray | TagKind::IntArray | TagKind::LongArray => {
                let items = ctx.as_list(value).map_err(|e| EncodeError::Unmappable {
                    kind: e.found,
                    tag,
                })?;
                let element = tag.array_element().unwrap_or(TagKind::Long);
                self.out.push_str(match tag {
                    TagKind::ByteArray => "[B;",
                    TagKind::IntArray => "[I;",
                    _ => "[L;",
                });
                for (i, item) in items.iter().enumerate() {
                    self.index(i);
                    let n = number_for(ctx, item, element)?;
                    let _ = write!(self.out, "{n}");
                }
                self.out.push(']');
            }
            TagKind::List => {
                let items = ctx.as_list(value).map_err(|e| EncodeError::Unmappable {
                    kind: e.found,
                    tag,
                })?;
                let element = element_tag_of(ctx, value)?;
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    self.index(i);
                    self.write_tagged(element, item)?;
                }
                self.out.push(']');
            }
            TagKind::Compound => {
                let entries = ctx.as_map(value).map_err(|e| EncodeError::Unmappable {
                    kind: e.found,
                    tag,
                })?;
                self.out.push('{');
                for (i, (key, item)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_key(key);
                    self.out.push(':');
                    self.write_any(item)?;
                }
                self.out.push('}');
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConfigContext, ValueKind};
    use crate::{ConfigList, ConfigMap, ConfigValue};

    fn encode(value: &ConfigValue, quotes: QuoteStyle) -> String {
        SnbtEncoder::new(&ConfigContext, quotes, false)
            .encode(value, None)
            .unwrap()
    }

    #[test]
    fn number_suffixes() {
        let value: ConfigValue = ConfigList::new()
            .with(1i8)
            .with(2i8)
            .into();
        assert_eq!(encode(&value, QuoteStyle::Auto), "[1b,2b]");
        assert_eq!(
            encode(&ConfigValue::byte_array(&[1, 2]), QuoteStyle::Auto),
            "[B;1,2]"
        );
        let value: ConfigValue = ConfigMap::new()
            .with("b", 1i8)
            .with("s", 2i16)
            .with("i", 3)
            .with("l", 4i64)
            .with("f", 5.0f32)
            .with("d", 6.5)
            .with("t", true)
            .into();
        assert_eq!(
            encode(&value, QuoteStyle::Auto),
            "{b:1b,s:2s,i:3,l:4L,f:5.0f,d:6.5d,t:1b}"
        );
    }

    #[test]
    fn quote_switching() {
        let plain = ConfigValue::from("it's");
        assert_eq!(encode(&plain, QuoteStyle::Auto), r#""it's""#);
        let quoted = ConfigValue::from(r#"say "hi" it's"#);
        assert_eq!(encode(&quoted, QuoteStyle::Auto), r#"'say "hi" it\'s'"#);
        assert_eq!(encode(&quoted, QuoteStyle::Double), r#""say \"hi\" it's""#);
        assert_eq!(encode(&ConfigValue::from(r"a\b"), QuoteStyle::Single), r"'a\\b'");
    }

    #[test]
    fn key_quoting() {
        assert!(!key_needs_quotes("Spigot.ticksLived"));
        assert!(!key_needs_quotes("minecraft-id_2"));
        assert!(key_needs_quotes(""));
        assert!(key_needs_quotes("a b"));
        assert!(key_needs_quotes("a:b"));
        assert!(key_needs_quotes("[x]"));
        let value: ConfigValue = ConfigMap::new().with("a b", 1).with("", 2).into();
        assert_eq!(encode(&value, QuoteStyle::Auto), r#"{"a b":1,"":2}"#);
    }

    #[test]
    fn indices_prefix_every_sequence() {
        let mut list: ConfigValue = ConfigList::new().with(10i64).with(11i64).into();
        list.set_tag_kind(TagKind::List);
        let value: ConfigValue = ConfigMap::new()
            .with("l", list)
            .with("a", ConfigValue::int_array(&[7, 8]))
            .into();
        let text = SnbtEncoder::new(&ConfigContext, QuoteStyle::Auto, true)
            .encode(&value, None)
            .unwrap();
        assert_eq!(text, "{l:[0:10L,1:11L],a:[I;0:7,1:8]}");
    }

    #[test]
    fn root_name_prefix() {
        let value: ConfigValue = ConfigMap::new().with("x", 1i16).into();
        let text = SnbtEncoder::new(&ConfigContext, QuoteStyle::Auto, false)
            .encode(&value, Some("hello world"))
            .unwrap();
        assert_eq!(text, r#""hello world":{x:1s}"#);
    }

    #[test]
    fn blob_is_a_byte_array() {
        let value = ConfigValue::blob(vec![0u8, 1, 255]);
        assert_eq!(encode(&value, QuoteStyle::Auto), "[B;0,1,-1]");
    }

    #[test]
    fn packed_arrays_refuse_inexact_elements() {
        let mut ints: ConfigValue = ConfigList::new().with(5_000_000_000i64).with(2.9).into();
        ints.set_tag_kind(TagKind::IntArray);
        assert_eq!(
            SnbtEncoder::new(&ConfigContext, QuoteStyle::Auto, false).encode(&ints, None),
            Err(EncodeError::Unmappable {
                kind: ValueKind::Number,
                tag: TagKind::Int
            })
        );
        let mut fits: ConfigValue = ConfigList::new().with(5i64).with(-1i8).into();
        fits.set_tag_kind(TagKind::IntArray);
        assert_eq!(encode(&fits, QuoteStyle::Auto), "[I;5,-1]");
    }

    #[test]
    fn byte_array_hint_must_fit() {
        let mut bytes: ConfigValue = ConfigList::new().with(1).with(300).into();
        bytes.set_tag_kind(TagKind::ByteArray);
        assert_eq!(
            SnbtEncoder::new(&ConfigContext, QuoteStyle::Auto, false).encode(&bytes, None),
            Err(EncodeError::Unmappable {
                kind: ValueKind::Number,
                tag: TagKind::Byte
            })
        );
        let mut flags: ConfigValue = ConfigList::new().with(true).with(-3).into();
        flags.set_tag_kind(TagKind::ByteArray);
        assert_eq!(encode(&flags, QuoteStyle::Auto), "[B;1,-3]");
    }

    #[test]
    fn mixed_list_is_rejected() {
        let mut list: ConfigValue = ConfigList::new().with(1).with("x").into();
        list.set_tag_kind(TagKind::List);
        assert_eq!(
            SnbtEncoder::new(&ConfigContext, QuoteStyle::Auto, false).encode(&list, None),
            Err(EncodeError::HeterogeneousList(TagKind::Int, TagKind::String))
        );
    }
}
