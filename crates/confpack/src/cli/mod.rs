//! `cfgtool` — converts a config document between formats.
//!
//! The input and output codecs are picked by file extension through
//! [`default_registry`]; the flags only tune the codec on the output side
//! (and, for `--root-name`, both sides of typed-tag text).
//!
//! ```text
//! cfgtool settings.json settings.mdb --compression zstd
//! cfgtool level.dat level.snbt --root-name
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use confpack_codec::{AnyCodec, BinaryCodec, Compression, ConfigContext, JsonCodec, SnbtCodec};
use thiserror::Error;
use tracing::info;

use crate::file::{default_registry, FileCodec, FileError};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error("no codec for {0}; known extensions are json, mdb, nbt, dat and snbt")]
    UnknownFormat(PathBuf),
    #[error("input file {0} does not exist")]
    MissingInput(PathBuf),
    #[error("{0} already exists; pass --force to overwrite it")]
    OutputExists(PathBuf),
    #[error("compression '{0}' is not available in this build")]
    CompressionUnavailable(&'static str),
}

// ── Arguments ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CompressionArg {
    None,
    #[default]
    Deflate,
    Zstd,
}

impl From<CompressionArg> for Compression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => Compression::None,
            CompressionArg::Deflate => Compression::Deflate,
            CompressionArg::Zstd => Compression::Zstd,
        }
    }
}

/// Convert a config file into another format, chosen by extension.
#[derive(Debug, Clone, Parser)]
#[command(name = "cfgtool")]
#[command(version)]
pub struct Args {
    /// File to read (.json, .mdb, .nbt, .dat or .snbt)
    pub input: PathBuf,

    /// File to write; its extension selects the output format
    pub output: PathBuf,

    /// Indentation width for JSON output, 0 for a single line
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Body compression for .mdb output
    #[arg(long, value_enum, default_value_t = CompressionArg::Deflate)]
    pub compression: CompressionArg,

    /// Typed-tag text carries a `name:` prefix before the root compound
    #[arg(long)]
    pub root_name: bool,

    /// Replace the output file if it already exists
    #[arg(long)]
    pub force: bool,
}

/// What [`run`] did, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub input_format: &'static str,
    pub output_format: &'static str,
    pub bytes_written: u64,
}

// ── cfgtool ───────────────────────────────────────────────────────────────

/// Applies the command-line tuning to the registry's codec for `path`.
fn codec_for(args: &Args, path: &Path) -> Result<FileCodec, CliError> {
    let registry = default_registry();
    let base = registry
        .for_path(path)
        .ok_or_else(|| CliError::UnknownFormat(path.to_path_buf()))?;
    let tuned: AnyCodec = match base.codec() {
        AnyCodec::Json(_) => JsonCodec::new(args.indent).into(),
        AnyCodec::Binary(_) => {
            let compression = Compression::from(args.compression);
            if !compression.is_available() {
                return Err(CliError::CompressionUnavailable(compression.name()));
            }
            BinaryCodec::new(compression).into()
        }
        AnyCodec::Snbt(_) => SnbtCodec::new().expect_root_name(args.root_name).into(),
        other => other.clone(),
    };
    let mut codec = FileCodec::new(tuned, base.default_extension());
    for ext in base.extensions() {
        codec = codec.with_extension(ext);
    }
    Ok(codec)
}

/// Reads `args.input` and writes it to `args.output` in the output's format.
pub fn run(args: &Args) -> Result<Conversion, CliError> {
    let input = codec_for(args, &args.input)?;
    let output = codec_for(args, &args.output)?;
    if args.output.exists() && !args.force {
        return Err(CliError::OutputExists(args.output.clone()));
    }
    let ctx = ConfigContext;
    let value = input
        .load_from_file(&ctx, &args.input)?
        .ok_or_else(|| CliError::MissingInput(args.input.clone()))?;
    output.save_to_file(&ctx, &value, &args.output)?;
    let bytes_written = std::fs::metadata(&args.output)
        .map(|m| m.len())
        .map_err(|source| FileError::Io {
            path: args.output.clone(),
            source,
        })?;
    let conversion = Conversion {
        input_format: input.codec().name(),
        output_format: output.codec().name(),
        bytes_written,
    };
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        from = conversion.input_format,
        to = conversion.output_format,
        bytes = conversion.bytes_written,
        "converted"
    );
    Ok(conversion)
}
