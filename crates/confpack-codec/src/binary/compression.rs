//! Compression applied to the body of a compact binary document.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::{DecodeError, EncodeError};

/// Body transform, selected by the header byte after the magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    /// zlib-wrapped deflate.
    Deflate,
    /// zstd; needs the `zstd` cargo feature.
    Zstd,
}

impl Compression {
    pub fn id(self) -> u8 {
        match self {
            Compression::None => 0,
            Compression::Deflate => 1,
            Compression::Zstd => 2,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, DecodeError> {
        match id {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Deflate),
            2 => Ok(Compression::Zstd),
            other => Err(DecodeError::UnknownCompression(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Deflate => "deflate",
            Compression::Zstd => "zstd",
        }
    }

    /// Whether this build can actually run the transform.
    pub fn is_available(self) -> bool {
        match self {
            Compression::Zstd => cfg!(feature = "zstd"),
            _ => true,
        }
    }

    pub fn compress(self, body: &[u8]) -> Result<Vec<u8>, EncodeError> {
        match self {
            Compression::None => Ok(body.to_vec()),
            Compression::Deflate => {
                let mut enc = ZlibEncoder::new(
                    Vec::with_capacity(body.len() / 2),
                    flate2::Compression::default(),
                );
                enc.write_all(body)?;
                Ok(enc.finish()?)
            }
            Compression::Zstd => zstd_compress(body),
        }
    }

    pub fn decompress(self, body: &[u8]) -> Result<Vec<u8>, DecodeError> {
        match self {
            Compression::None => Ok(body.to_vec()),
            Compression::Deflate => {
                let mut out = Vec::with_capacity(body.len() * 2);
                ZlibDecoder::new(body).read_to_end(&mut out)?;
                Ok(out)
            }
            Compression::Zstd => zstd_decompress(body),
        }
    }
}

impl std::str::FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Compression::None),
            "deflate" | "zlib" => Ok(Compression::Deflate),
            "zstd" => Ok(Compression::Zstd),
            other => Err(format!("unknown compression '{other}'")),
        }
    }
}

#[cfg(feature = "zstd")]
fn zstd_compress(body: &[u8]) -> Result<Vec<u8>, EncodeError> {
    Ok(zstd::stream::encode_all(body, zstd::DEFAULT_COMPRESSION_LEVEL)?)
}

#[cfg(not(feature = "zstd"))]
fn zstd_compress(_body: &[u8]) -> Result<Vec<u8>, EncodeError> {
    Err(EncodeError::UnsupportedCompression("zstd"))
}

#[cfg(feature = "zstd")]
fn zstd_decompress(body: &[u8]) -> Result<Vec<u8>, DecodeError> {
    Ok(zstd::stream::decode_all(body)?)
}

#[cfg(not(feature = "zstd"))]
fn zstd_decompress(_body: &[u8]) -> Result<Vec<u8>, DecodeError> {
    Err(DecodeError::UnsupportedCompression("zstd"))
}
