use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer: needed {needed} bytes at offset {offset}, {available} available")]
    EndOfBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("length {0} does not fit in a {1}-byte prefix")]
    LengthOverflow(usize, u8),
    #[error("negative length {0}")]
    NegativeLength(i64),
}
