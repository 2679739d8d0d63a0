//! Byte buffers shared by the confpack binary codecs.
//!
//! [`Writer`] is an auto-growing big-endian output buffer; [`Reader`] is a
//! cursor over a byte slice whose every read is bounds-checked.

mod error;
mod reader;
mod writer;

pub use error::BufferError;
pub use reader::Reader;
pub use writer::Writer;
