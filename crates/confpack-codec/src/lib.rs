//! Configuration values and the codecs that read and write them.
//!
//! Every codec is written against the [`Context`] trait, so the same codec
//! reads into a [`ConfigValue`] tree or straight into a `serde_json::Value`.

mod scanner;

pub mod binary;
pub mod codec;
pub mod context;
pub mod error;
pub mod json;
pub mod nbt;
pub mod snbt;
pub mod tag_kind;
pub mod value;

pub use binary::{BinaryCodec, Compression};
pub use codec::{AnyCodec, Charset, Codec, DEFAULT_MAX_DEPTH};
pub use context::{convert, ConfigContext, Context, JsonContext, ValueKind};
pub use error::{DecodeError, EncodeError, NotThisType};
pub use json::JsonCodec;
pub use nbt::{uuid_int_array, NbtCodec};
pub use snbt::{QuoteStyle, SnbtCodec};
pub use tag_kind::TagKind;
pub use value::{ConfigList, ConfigMap, ConfigValue, Meta, Number, NumberKind};
