//! Error types shared by every codec.

use confpack_buffers::BufferError;
use thiserror::Error;

use crate::context::ValueKind;
use crate::TagKind;

/// A value did not have the shape a narrowing conversion asked for.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected}, found {found}")]
pub struct NotThisType {
    pub expected: ValueKind,
    pub found: ValueKind,
}

/// Failure while reading a document. Decoding never returns partial output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing or malformed header")]
    MissingHeader,
    #[error("unknown compression selector {0}")]
    UnknownCompression(u8),
    #[error("compression '{0}' is not available in this build")]
    UnsupportedCompression(&'static str),
    #[error("unknown tag {0}")]
    UnknownTag(u8),
    #[error("unexpected {0} tag")]
    UnexpectedTag(TagKind),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid unicode code point '{0}'")]
    InvalidCodePoint(String),
    #[error("unable to parse '{0}' as a number")]
    InvalidNumber(String),
    #[error("unterminated {0}")]
    Unterminated(&'static str),
    #[error("unexpected character '{found}' at offset {offset}, expected {expected}")]
    UnexpectedChar {
        found: char,
        offset: usize,
        expected: &'static str,
    },
    #[error("list elements have different tags: {0} and {1}")]
    HeterogeneousList(TagKind, TagKind),
    #[error("index {found} out of order, expected {expected}")]
    IndexOutOfOrder { expected: usize, found: usize },
    #[error("invalid length {0}")]
    InvalidLength(i64),
    #[error("expected root to be a compound")]
    RootNotCompound,
    #[error("maximum nesting depth {0} exceeded")]
    DepthExceeded(usize),
    #[error("trailing data after document")]
    TrailingData,
    #[error("I/O error: {0}")]
    Io(String),
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wraps `self` with a description of where it happened.
    pub fn context(self, context: impl Into<String>) -> Self {
        DecodeError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error of a context chain.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { .. } => DecodeError::UnexpectedEof,
            BufferError::NegativeLength(n) => DecodeError::InvalidLength(n),
            BufferError::LengthOverflow(n, _) => DecodeError::InvalidLength(n as i64),
        }
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => DecodeError::UnexpectedEof,
            std::io::ErrorKind::InvalidData => DecodeError::Io(format!("invalid data: {err}")),
            _ => DecodeError::Io(err.to_string()),
        }
    }
}

/// Failure while writing a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("cannot represent {0} in this format")]
    Untaggable(ValueKind),
    #[error("cannot represent a number of kind {0:?} in this format")]
    UnsupportedNumber(crate::NumberKind),
    #[error("list elements have different tags: {0} and {1}")]
    HeterogeneousList(TagKind, TagKind),
    #[error("representation does not support metadata, required for {0}")]
    MetadataUnsupported(&'static str),
    #[error("root value must be a compound, found {0}")]
    RootNotCompound(ValueKind),
    #[error("string of {0} bytes is too long")]
    StringTooLong(usize),
    #[error("value of kind {kind} cannot be written as {tag}")]
    Unmappable { kind: ValueKind, tag: TagKind },
    #[error("compression '{0}' is not available in this build")]
    UnsupportedCompression(&'static str),
    #[error("character U+{0:04X} cannot be written in the selected charset")]
    Charset(u32),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::Io(err.to_string())
    }
}

impl From<BufferError> for EncodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::LengthOverflow(n, _) => EncodeError::StringTooLong(n),
            other => EncodeError::Io(other.to_string()),
        }
    }
}

impl From<NotThisType> for EncodeError {
    fn from(err: NotThisType) -> Self {
        EncodeError::Untaggable(err.found)
    }
}
