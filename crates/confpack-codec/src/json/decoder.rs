//! `JsonDecoder` — single forward pass over JSON text.

use num_bigint::BigInt;
use tracing::trace;

use crate::codec::Depth;
use crate::context::Context;
use crate::scanner::Scanner;
use crate::{DecodeError, Number};

pub struct JsonDecoder<'c, C: Context> {
    ctx: &'c C,
    scanner: Scanner,
    depth: Depth,
}

/// Characters that end a bare token.
fn is_token_end(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '}' | ']')
}

impl<'c, C: Context> JsonDecoder<'c, C> {
    pub fn new(ctx: &'c C, text: &str, max_depth: usize) -> Self {
        Self {
            ctx,
            scanner: Scanner::new(text),
            depth: Depth::new(max_depth),
        }
    }

    /// Reads one value and rejects anything but whitespace after it.
    pub fn decode(mut self) -> Result<C::Value, DecodeError> {
        let value = self.read_any()?;
        self.scanner.finish()?;
        Ok(value)
    }

    fn read_any(&mut self) -> Result<C::Value, DecodeError> {
        match self.scanner.peek_token() {
            None => Err(DecodeError::UnexpectedEof),
            Some('{') => {
                self.scanner.bump();
                self.depth.enter()?;
                let v = self.read_obj();
                self.depth.leave();
                v
            }
            Some('[') => {
                self.scanner.bump();
                self.depth.enter()?;
                let v = self.read_arr();
                self.depth.leave();
                v
            }
            Some('"') => {
                self.scanner.bump();
                let s = self.read_str()?;
                Ok(self.ctx.from_string(s))
            }
            Some(_) => self.read_bare(),
        }
    }

    /// Reads a string body; the opening quote is already consumed.
    fn read_str(&mut self) -> Result<String, DecodeError> {
        let mut out = String::new();
        loop {
            match self.scanner.next_in("string")? {
                '"' => return Ok(out),
                '\\' => {
                    let c = match self.scanner.next_in("string")? {
                        '"' => '"',
                        '\\' => '\\',
                        '/' => '/',
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

    fn read_arr(&mut self) -> Result<C::Value, DecodeError> {
        let mut items = Vec::new();
        if self.scanner.peek_token() == Some(']') {
            self.scanner.bump();
            return Ok(self.ctx.from_list(items));
        }
        loop {
            let item = self
                .read_any()
                .map_err(|e| e.context(format!("while decoding list element {}", items.len())))?;
            items.push(item);
            match self.scanner.peek_token() {
                Some(',') => {
                    self.scanner.bump();
                }
                Some(']') => {
                    self.scanner.bump();
                    break;
                }
                Some(c) => {
                    self.scanner.bump();
                    return Err(self.scanner.unexpected(c, "',' or ']'"));
                }
                None => return Err(DecodeError::Unterminated("list")),
            }
        }
        Ok(self.ctx.from_list(items))
    }

    fn read_obj(&mut self) -> Result<C::Value, DecodeError> {
        let mut entries: Vec<(String, C::Value)> = Vec::new();
        if self.scanner.peek_token() == Some('}') {
            self.scanner.bump();
            return Ok(self.ctx.from_map(entries));
        }
        loop {
            self.scanner.expect('"', "'\"' to start a key", "map")?;
            let key = self.read_str()?;
            self.scanner.expect(':', "':' after a key", "map")?;
            let value = self
                .read_any()
                .map_err(|e| e.context(format!("while decoding value of key '{key}'")))?;
            entries.push((key, value));
            match self.scanner.peek_token() {
                Some(',') => {
                    self.scanner.bump();
                }
                Some('}') => {
                    self.scanner.bump();
                    break;
                }
                Some(c) => {
                    self.scanner.bump();
                    return Err(self.scanner.unexpected(c, "',' or '}'"));
                }
                None => return Err(DecodeError::Unterminated("map")),
            }
        }
        Ok(self.ctx.from_map(entries))
    }

    /// Literal or number. Literals match case-insensitively.
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
        if token.eq_ignore_ascii_case("null") {
            return Ok(self.ctx.null());
        }
        let number = parse_number(&token)?;
        trace!(%token, ?number, "json number");
        Ok(self.ctx.from_number(number))
    }
}

/// Parses a bare number token.
///
/// Only `0-9 . - E` are accepted; a trailing `.` or a second `.` is an
/// error. Fractional or exponent tokens are doubles, integers take the
/// narrowest of int, long and unbounded integer.
pub fn parse_number(token: &str) -> Result<Number, DecodeError> {
    let invalid = || DecodeError::InvalidNumber(token.to_owned());
    if token.is_empty()
        || !token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | 'E'))
        || token.ends_with('.')
        || token.matches('.').count() > 1
    {
        return Err(invalid());
    }
    if token.contains(&['.', 'E'][..]) {
        let v: f64 = token.parse().map_err(|_| invalid())?;
        return Ok(Number::Double(v));
    }
    let v: BigInt = token.parse().map_err(|_| invalid())?;
    Ok(Number::big(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConfigContext;
    use crate::{ConfigValue, DEFAULT_MAX_DEPTH};

    fn decode(text: &str) -> Result<ConfigValue, DecodeError> {
        JsonDecoder::new(&ConfigContext, text, DEFAULT_MAX_DEPTH).decode()
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("42").unwrap(), Number::Int(42));
        assert_eq!(parse_number("-3000000000").unwrap(), Number::Long(-3_000_000_000));
        assert_eq!(
            parse_number("170141183460469231731687303715884105727").unwrap(),
            Number::Big(BigInt::from(i128::MAX))
        );
        let wide = "123456789012345678901234567890123456789012";
        assert_eq!(parse_number(wide).unwrap(), Number::Big(wide.parse().unwrap()));
        assert_eq!(
            parse_number(&format!("-{wide}")).unwrap(),
            Number::Big(-wide.parse::<BigInt>().unwrap())
        );
        assert_eq!(parse_number("43.435").unwrap(), Number::Double(43.435));
        assert_eq!(parse_number("1E3").unwrap(), Number::Double(1000.0));
    }

    #[test]
    fn malformed_numbers() {
        for bad in ["1.", "1.2.3", "12a", "1e5", "+1", "-", "1-2", "--1"] {
            assert!(
                matches!(parse_number(bad), Err(DecodeError::InvalidNumber(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn literals_are_case_insensitive() {
        assert_eq!(decode("TRUE").unwrap(), ConfigValue::Bool(true));
        assert_eq!(decode(" False ").unwrap(), ConfigValue::Bool(false));
        assert_eq!(decode("Null").unwrap(), ConfigValue::Null);
    }

    #[test]
    fn escapes() {
        assert_eq!(
            decode(r#""a\/b\tcģ\uuuu5432""#).unwrap(),
            ConfigValue::from("a/b\tc\u{123}\u{5432}")
        );
        assert_eq!(decode(r#""\q""#), Err(DecodeError::InvalidEscape('q')));
    }

    #[test]
    fn unterminated_inputs() {
        assert_eq!(decode("\"abc"), Err(DecodeError::Unterminated("string")));
        assert_eq!(
            decode("[1,2").unwrap_err().root_cause(),
            &DecodeError::Unterminated("list")
        );
        assert_eq!(decode("{\"a\":1"), Err(DecodeError::Unterminated("map")));
        assert_eq!(decode(""), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn rejects_trailing_commas_and_garbage() {
        assert!(decode("[1,]").is_err());
        assert!(decode("{\"a\":1,}").is_err());
        assert_eq!(decode("1 2"), Err(DecodeError::TrailingData));
        assert!(decode("{a:1}").is_err());
    }

    #[test]
    fn depth_limit() {
        let deep = "[".repeat(10) + &"]".repeat(10);
        assert!(JsonDecoder::new(&ConfigContext, &deep, 10).decode().is_ok());
        let err = JsonDecoder::new(&ConfigContext, &deep, 9).decode().unwrap_err();
        assert_eq!(err.root_cause(), &DecodeError::DepthExceeded(9));
    }
}
