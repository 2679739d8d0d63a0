//! Character cursor shared by the text decoders.

use crate::DecodeError;

/// Forward-only cursor over decoded text with one character of lookahead.
pub(crate) struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Character `n` positions ahead of the cursor.
    #[inline]
    pub(crate) fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    #[inline]
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Next character, or `Unterminated(what)` at end of input.
    pub(crate) fn next_in(&mut self, what: &'static str) -> Result<char, DecodeError> {
        self.bump().ok_or(DecodeError::Unterminated(what))
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// Next non-whitespace character without consuming it.
    pub(crate) fn peek_token(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek()
    }

    pub(crate) fn unexpected(&self, found: char, expected: &'static str) -> DecodeError {
        DecodeError::UnexpectedChar {
            found,
            offset: self.pos.saturating_sub(1),
            expected,
        }
    }

    /// Consumes `expected` after optional whitespace.
    pub(crate) fn expect(
        &mut self,
        expected: char,
        what: &'static str,
        context: &'static str,
    ) -> Result<(), DecodeError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.unexpected(c, what)),
            None => Err(DecodeError::Unterminated(context)),
        }
    }

    /// Consumes characters while `keep` holds and returns them.
    pub(crate) fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if keep(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Fails unless only whitespace remains.
    pub(crate) fn finish(&mut self) -> Result<(), DecodeError> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(DecodeError::TrailingData),
        }
    }

    /// Reads `n` hex digits as a code unit.
    pub(crate) fn hex4(&mut self) -> Result<u32, DecodeError> {
        let mut digits = String::with_capacity(4);
        for _ in 0..4 {
            digits.push(self.next_in("string")?);
        }
        u32::from_str_radix(&digits, 16).map_err(|_| DecodeError::InvalidCodePoint(digits))
    }

    /// Reads the body of a `\u` escape. Repeated `u`s are allowed, and a
    /// high surrogate must be followed by an escaped low surrogate.
    pub(crate) fn unicode_escape(&mut self) -> Result<char, DecodeError> {
        while self.peek() == Some('u') {
            self.pos += 1;
        }
        let first = self.hex4()?;
        let code = match first {
            0xD800..=0xDBFF => {
                if self.bump() != Some('\\') || self.peek() != Some('u') {
                    return Err(DecodeError::InvalidCodePoint(format!("{first:04x}")));
                }
                while self.peek() == Some('u') {
                    self.pos += 1;
                }
                let second = self.hex4()?;
                if !(0xDC00..=0xDFFF).contains(&second) {
                    return Err(DecodeError::InvalidCodePoint(format!(
                        "{first:04x}{second:04x}"
                    )));
                }
                0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
            }
            _ => first,
        };
        char::from_u32(code).ok_or_else(|| DecodeError::InvalidCodePoint(format!("{code:04x}")))
    }
}
