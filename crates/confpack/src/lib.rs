//! Configuration files on disk.
//!
//! Re-exports the value model and codecs from `confpack-codec` and adds the
//! file layer: codecs bound to file extensions, a registry that picks one by
//! extension, and a wrapper that keeps a loaded root next to its path.

pub mod cli;
pub mod file;

pub use confpack_codec::*;
pub use file::{default_registry, FileCodec, FileCodecRegistry, FileError, FileWrapper};
