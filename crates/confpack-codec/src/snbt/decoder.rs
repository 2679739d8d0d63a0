//! `SnbtDecoder` — reads typed-tag text back into tagged values.

use tracing::trace;

use crate::codec::Depth;
use crate::context::Context;
use crate::nbt::infer::tag_of;
use crate::scanner::Scanner;
use crate::{DecodeError, Number, TagKind};

pub struct SnbtDecoder<'c, C: Context> {
    ctx: &'c C,
    scanner: Scanner,
    depth: Depth,
    indices: bool,
}

fn is_token_end(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '}' | ']')
}

fn is_key_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ':' | ',' | '{' | '}' | '[' | ']' | '"' | '\'')
}

fn looks_numeric(body: &str) -> bool {
    matches!(body.chars().next(), Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
        || matches!(body, "NaN" | "Infinity" | "-Infinity")
}

/// Parses a bare value token with an optional kind suffix.
///
/// The suffix letter is case-insensitive. Without one, a token holding `.`
/// or an exponent is a double and anything else an int. Tokens that do not
/// start like a number yield `None` and are read as unquoted strings.
pub fn parse_number(token: &str) -> Result<Option<Number>, DecodeError> {
    let invalid = || DecodeError::InvalidNumber(token.to_owned());
    let (body, suffix) = match token.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&token[..i], Some(c.to_ascii_lowercase())),
        _ => (token, None),
    };
    if !looks_numeric(body) {
        return Ok(None);
    }
    let number = match suffix {
        Some('b') => Number::Byte(body.parse().map_err(|_| invalid())?),
        Some('s') => Number::Short(body.parse().map_err(|_| invalid())?),
        Some('l') => Number::Long(body.parse().map_err(|_| invalid())?),
        Some('f') => Number::Float(body.parse().map_err(|_| invalid())?),
        Some('d') => Number::Double(body.parse().map_err(|_| invalid())?),
        Some(_) => return Err(invalid()),
        None if body.contains(&['.', 'e', 'E'][..]) => {
            Number::Double(body.parse().map_err(|_| invalid())?)
        }
        None => Number::Int(body.parse().map_err(|_| invalid())?),
    };
    Ok(Some(number))
}

/// Packed array elements are integers; an integer suffix is tolerated.
fn parse_array_element(token: &str, tag: TagKind) -> Option<i64> {
    let body = token.strip_suffix(|c: char| matches!(c.to_ascii_lowercase(), 'b' | 's' | 'l'));
    let v: i64 = body.unwrap_or(token).parse().ok()?;
    match tag {
        TagKind::ByteArray => i8::try_from(v).ok().map(i64::from),
        TagKind::IntArray => i32::try_from(v).ok().map(i64::from),
        _ => Some(v),
    }
}

impl<'c, C: Context> SnbtDecoder<'c, C> {
    pub fn new(ctx: &'c C, text: &str, max_depth: usize, indices: bool) -> Self {
        Self {
            ctx,
            scanner: Scanner::new(text),
            depth: Depth::new(max_depth),
            indices,
        }
    }

    /// Reads one document. With `expect_root_name` the document is
    /// `name:{...}` and the name is stored on the root compound.
    pub fn decode(mut self, expect_root_name: bool) -> Result<C::Value, DecodeError> {
        let root_name = if expect_root_name {
            let name = self.read_key()?;
            self.scanner.expect(':', "':' after the root name", "root")?;
            Some(name)
        } else {
            None
        };
        let mut value = self.read_any()?;
        self.scanner.finish()?;
        if let Some(name) = root_name {
            if !self.ctx.is_map(&value) {
                return Err(DecodeError::RootNotCompound);
            }
            self.ctx.set_root_name(&mut value, name);
        }
        Ok(value)
    }

    fn read_any(&mut self) -> Result<C::Value, DecodeError> {
        match self.scanner.peek_token() {
            None => Err(DecodeError::UnexpectedEof),
            Some('{') => {
                self.scanner.bump();
                self.depth.enter()?;
                let v = self.read_compound();
                self.depth.leave();
                v
            }
            Some('[') => {
                self.scanner.bump();
                self.depth.enter()?;
                let v = self.read_list();
                self.depth.leave();
                v
            }
            Some(q @ ('"' | '\'')) => {
                self.scanner.bump();
                let s = self.read_quoted(q)?;
                Ok(self.ctx.from_string(s))
            }
            Some(_) => self.read_bare(),
        }
    }

    /// Reads a quoted string body; the opening quote is already consumed.
    fn read_quoted(&mut self, quote: char) -> Result<String, DecodeError> {
        let mut out = String::new();
        loop {
            match self.scanner.next_in("string")? {
                c if c == quote => return Ok(out),
                '\\' => {
                    let c = match self.scanner.next_in("string")? {
                        c @ ('"' | '\'' | '\\' | '/') => c,
                        'n' => '\n',
                        'r' => '\r',
                        'f' => '\u{0c}',
                        'b' => '\u{08}',
                        't' => '\t',
                        'u' => self.scanner.unicode_escape()?,
                        other => return Err(DecodeError::InvalidEscape(other)),
                    };
                    out.push(c);
                }
                c => out.push(c),
            }
        }
    }

    fn read_key(&mut self) -> Result<String, DecodeError> {
        match self.scanner.peek_token() {
            Some(q @ ('"' | '\'')) => {
                self.scanner.bump();
                self.read_quoted(q)
            }
            Some(c) if is_key_char(c) => Ok(self.scanner.take_while(is_key_char)),
            Some(c) => {
                self.scanner.bump();
                Err(self.scanner.unexpected(c, "a key"))
            }
            None => Err(DecodeError::Unterminated("compound")),
        }
    }

    fn read_compound(&mut self) -> Result<C::Value, DecodeError> {
        let mut entries: Vec<(String, C::Value)> = Vec::new();
        if self.scanner.peek_token() == Some('}') {
            self.scanner.bump();
        } else {
            loop {
                let key = self.read_key()?;
                self.scanner.expect(':', "':' after a key", "compound")?;
                let value = self
                    .read_any()
                    .map_err(|e| e.context(format!("while decoding value of key '{key}'")))?;
                entries.push((key, value));
                if self.separator('}', "compound")? {
                    break;
                }
            }
        }
        let mut out = self.ctx.from_map(entries);
        self.ctx.set_tag_hint(&mut out, TagKind::Compound);
        Ok(out)
    }

    /// Consumes `,` (returns `false`) or `close` (returns `true`).
    fn separator(&mut self, close: char, what: &'static str) -> Result<bool, DecodeError> {
        match self.scanner.peek_token() {
            Some(',') => {
                self.scanner.bump();
                Ok(false)
            }
            Some(c) if c == close => {
                self.scanner.bump();
                Ok(true)
            }
            Some(c) => {
                self.scanner.bump();
                Err(self.scanner.unexpected(c, "',' or a closing bracket"))
            }
            None => Err(DecodeError::Unterminated(what)),
        }
    }

    /// Reads and checks an `N:` prefix when indices are expected.
    fn read_index(&mut self, expected: usize) -> Result<(), DecodeError> {
        if !self.indices {
            return Ok(());
        }
        self.scanner.skip_whitespace();
        let digits = self.scanner.take_while(|c| c.is_ascii_digit());
        let found: usize = digits
            .parse()
            .map_err(|_| DecodeError::InvalidNumber(digits.clone()))?;
        self.scanner.expect(':', "':' after an index", "list")?;
        if found != expected {
            return Err(DecodeError::IndexOutOfOrder { expected, found });
        }
        Ok(())
    }

    fn read_list(&mut self) -> Result<C::Value, DecodeError> {
        self.scanner.skip_whitespace();
        let array = match (self.scanner.peek(), self.scanner.peek_nth(1)) {
            (Some('B'), Some(';')) => Some(TagKind::ByteArray),
            (Some('I'), Some(';')) => Some(TagKind::IntArray),
            (Some('L'), Some(';')) => Some(TagKind::LongArray),
            _ => None,
        };
        match array {
            Some(tag) => {
                self.scanner.bump();
                self.scanner.bump();
                self.read_array(tag)
            }
            None => self.read_generic_list(),
        }
    }

    fn read_array(&mut self, tag: TagKind) -> Result<C::Value, DecodeError> {
        let mut values: Vec<i64> = Vec::new();
        if self.scanner.peek_token() == Some(']') {
            self.scanner.bump();
        } else {
            loop {
                self.read_index(values.len())?;
                self.scanner.skip_whitespace();
                let token = self.scanner.take_while(|c| !is_token_end(c));
                let v = parse_array_element(&token, tag).ok_or_else(|| {
                    DecodeError::InvalidNumber(token.clone())
                        .context(format!("while decoding list element {}", values.len()))
                })?;
                values.push(v);
                if self.separator(']', "list")? {
                    break;
                }
            }
        }
        trace!(%tag, len = values.len(), "snbt array");
        let ctx = self.ctx;
        let mut out = match tag {
            TagKind::ByteArray => {
                return Ok(ctx.from_blob(values.into_iter().map(|v| v as i8 as u8).collect()));
            }
            TagKind::IntArray => ctx.from_list(
                values
                    .into_iter()
                    .map(|v| ctx.from_number(Number::Int(v as i32)))
                    .collect(),
            ),
            _ => ctx.from_list(
                values
                    .into_iter()
                    .map(|v| ctx.from_number(Number::Long(v)))
                    .collect(),
            ),
        };
        ctx.set_tag_hint(&mut out, tag);
        if let Some(element) = tag.array_element() {
            ctx.set_element_tag_hint(&mut out, element);
        }
        Ok(out)
    }

    fn read_generic_list(&mut self) -> Result<C::Value, DecodeError> {
        let mut items: Vec<C::Value> = Vec::new();
        let mut element: Option<TagKind> = None;
        if self.scanner.peek_token() == Some(']') {
            self.scanner.bump();
        } else {
            loop {
                let i = items.len();
                let item = self
                    .read_index(i)
                    .and_then(|_| self.read_any())
                    .map_err(|e| e.context(format!("while decoding list element {i}")))?;
                if let Ok(tag) = tag_of(self.ctx, &item) {
                    match element {
                        Some(first) if first != tag => {
                            return Err(DecodeError::HeterogeneousList(first, tag)
                                .context(format!("while decoding list element {i}")))
                        }
                        _ => element = Some(tag),
                    }
                }
                items.push(item);
                if self.separator(']', "list")? {
                    break;
                }
            }
        }
        let mut out = self.ctx.from_list(items);
        self.ctx.set_tag_hint(&mut out, TagKind::List);
        self.ctx
            .set_element_tag_hint(&mut out, element.unwrap_or(TagKind::End));
        Ok(out)
    }

    fn read_bare(&mut self) -> Result<C::Value, DecodeError> {
        let token = self.scanner.take_while(|c| !is_token_end(c));
        if token.is_empty() {
            let offset = self.scanner.offset();
            return match self.scanner.bump() {
                Some(c) => Err(DecodeError::UnexpectedChar {
                    found: c,
                    offset,
                    expected: "a value",
                }),
                None => Err(DecodeError::UnexpectedEof),
            };
        }
        if token.eq_ignore_ascii_case("true") {
            return Ok(self.ctx.from_bool(true));
        }
        if token.eq_ignore_ascii_case("false") {
            return Ok(self.ctx.from_bool(false));
        }
        match parse_number(&token)? {
            Some(number) => Ok(self.ctx.from_number(number)),
            None => Ok(self.ctx.from_string(token)),
        }
    }
}
