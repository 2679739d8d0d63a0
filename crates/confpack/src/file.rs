//! Codecs bound to file extensions.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use confpack_codec::{
    AnyCodec, BinaryCodec, Charset, Codec, Compression, Context, DecodeError, EncodeError,
    JsonCodec, NbtCodec, SnbtCodec,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("unable to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
    #[error("no codec registered for {0}")]
    UnknownExtension(PathBuf),
}

impl FileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Extension of `path` without the dot, if it has one.
fn extension_of(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.rsplit_once('.').map(|(_, ext)| ext)
}

// ── FileCodec ─────────────────────────────────────────────────────────────

/// A codec plus the file extensions it owns.
#[derive(Debug, Clone)]
pub struct FileCodec {
    codec: AnyCodec,
    default_extension: String,
    extensions: Vec<String>,
    charset: Charset,
}

impl FileCodec {
    pub fn new(codec: impl Into<AnyCodec>, default_extension: &str) -> Self {
        Self {
            codec: codec.into(),
            default_extension: default_extension.to_string(),
            extensions: vec![default_extension.to_string()],
            charset: Charset::Utf8,
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        if !self.extensions.iter().any(|e| e == extension) {
            self.extensions.push(extension.to_string());
        }
        self
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn codec(&self) -> &AnyCodec {
        &self.codec
    }

    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Reads and decodes `path`. A missing file is `Ok(None)`.
    pub fn load_from_file<C: Context>(&self, ctx: &C, path: &Path) -> Result<Option<C::Value>, FileError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no file to load");
                return Ok(None);
            }
            Err(e) => return Err(FileError::io(path, e)),
        };
        let mut reader = BufReader::new(file);
        let value = self
            .codec
            .decode(ctx, &mut reader, self.charset)
            .map_err(|source| FileError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), codec = self.codec.name(), "loaded file");
        Ok(Some(value))
    }

    /// Encodes `value` into `path`, replacing it only once the new content
    /// is fully written.
    pub fn save_to_file<C: Context>(&self, ctx: &C, value: &C::Value, path: &Path) -> Result<(), FileError> {
        let bytes = {
            let mut out = Vec::new();
            self.codec
                .encode(ctx, value, &mut out, self.charset)
                .map_err(|source| FileError::Encode {
                    path: path.to_path_buf(),
                    source,
                })?;
            out
        };
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);
        {
            let file = File::create(&tmp).map_err(|e| FileError::io(&tmp, e))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&bytes).map_err(|e| FileError::io(&tmp, e))?;
            writer.flush().map_err(|e| FileError::io(&tmp, e))?;
        }
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(FileError::io(path, e));
        }
        debug!(path = %path.display(), bytes = bytes.len(), codec = self.codec.name(), "saved file");
        Ok(())
    }
}

// ── FileCodecRegistry ─────────────────────────────────────────────────────

/// Picks a [`FileCodec`] by file extension.
#[derive(Debug, Clone, Default)]
pub struct FileCodecRegistry {
    codecs: Vec<FileCodec>,
    by_extension: HashMap<String, usize>,
    default: Option<usize>,
}

impl FileCodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `codec`; the first registered codec becomes the default.
    pub fn register(&mut self, codec: FileCodec) {
        let make_default = self.default.is_none();
        self.register_with_default(codec, make_default);
    }

    pub fn register_with_default(&mut self, codec: FileCodec, make_default: bool) {
        let index = self.codecs.len();
        for ext in codec.extensions() {
            self.by_extension.insert(ext.clone(), index);
        }
        self.codecs.push(codec);
        if make_default {
            self.default = Some(index);
        }
    }

    pub fn default_codec(&self) -> Option<&FileCodec> {
        self.default.and_then(|i| self.codecs.get(i))
    }

    pub fn for_extension(&self, extension: &str) -> Option<&FileCodec> {
        self.by_extension.get(extension).and_then(|&i| self.codecs.get(i))
    }

    pub fn for_path(&self, path: &Path) -> Option<&FileCodec> {
        self.for_extension(extension_of(path)?)
    }

    /// Wraps `path` with the codec matching its extension and loads it.
    pub fn open<'c, C: Context>(&self, ctx: &'c C, path: &Path) -> Result<FileWrapper<'c, C>, FileError> {
        let codec = self
            .for_path(path)
            .ok_or_else(|| FileError::UnknownExtension(path.to_path_buf()))?;
        let mut wrapper = FileWrapper::new(ctx, codec.clone(), path.to_path_buf());
        wrapper.load()?;
        Ok(wrapper)
    }

    /// Finds `<prefix>.<ext>` in `dir` for any registered extension and
    /// opens it. Extensions are tried in registration order.
    pub fn find<'c, C: Context>(
        &self,
        ctx: &'c C,
        dir: &Path,
        prefix: &str,
    ) -> Result<Option<FileWrapper<'c, C>>, FileError> {
        if !dir.is_dir() {
            return Ok(None);
        }
        for codec in &self.codecs {
            for ext in codec.extensions() {
                let path = dir.join(format!("{prefix}.{ext}"));
                if path.is_file() {
                    let mut wrapper = FileWrapper::new(ctx, codec.clone(), path);
                    wrapper.load()?;
                    return Ok(Some(wrapper));
                }
            }
        }
        Ok(None)
    }

    /// Like [`find`](Self::find), but falls back to a new file with the
    /// default codec's extension. `defaults` fill in anything missing from
    /// the loaded root.
    pub fn find_or_create<'c, C: Context>(
        &self,
        ctx: &'c C,
        dir: &Path,
        prefix: &str,
        defaults: C::Value,
    ) -> Result<Option<FileWrapper<'c, C>>, FileError> {
        let mut wrapper = match self.find(ctx, dir, prefix)? {
            Some(wrapper) => wrapper,
            None => {
                let Some(codec) = self.default_codec() else {
                    return Ok(None);
                };
                let path = dir.join(format!("{prefix}.{}", codec.default_extension()));
                FileWrapper::new(ctx, codec.clone(), path)
            }
        };
        wrapper.apply_defaults(&defaults);
        Ok(Some(wrapper))
    }
}

/// JSON (`.json`, default), compact binary (`.mdb`), root-named typed-tag
/// binary (`.nbt`) and typed-tag text (`.snbt`).
pub fn default_registry() -> FileCodecRegistry {
    let mut registry = FileCodecRegistry::new();
    registry.register(FileCodec::new(JsonCodec::readable(), "json"));
    registry.register(FileCodec::new(BinaryCodec::new(Compression::Deflate), "mdb"));
    registry.register(FileCodec::new(NbtCodec::new(true), "nbt").with_extension("dat"));
    registry.register(FileCodec::new(SnbtCodec::new(), "snbt"));
    registry
}

// ── FileWrapper ───────────────────────────────────────────────────────────

/// A root value tied to the file it was loaded from.
pub struct FileWrapper<'c, C: Context> {
    ctx: &'c C,
    codec: FileCodec,
    path: PathBuf,
    root: Option<C::Value>,
}

impl<'c, C: Context> FileWrapper<'c, C> {
    pub fn new(ctx: &'c C, codec: FileCodec, path: PathBuf) -> Self {
        Self {
            ctx,
            codec,
            path,
            root: None,
        }
    }

    /// Replaces the root with the file's content; a missing file clears it.
    pub fn load(&mut self) -> Result<(), FileError> {
        self.root = self.codec.load_from_file(self.ctx, &self.path)?;
        Ok(())
    }

    /// Writes the root; does nothing when there is none.
    pub fn save(&self) -> Result<(), FileError> {
        match &self.root {
            Some(root) => self.codec.save_to_file(self.ctx, root, &self.path),
            None => {
                warn!(path = %self.path.display(), "nothing to save");
                Ok(())
            }
        }
    }

    /// Merges `defaults` under the current root, keeping existing values.
    pub fn apply_defaults(&mut self, defaults: &C::Value) {
        self.root = Some(match self.root.take() {
            Some(root) => self.ctx.merge(&root, defaults),
            None => self.ctx.copy(defaults),
        });
    }

    pub fn root(&self) -> Option<&C::Value> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut C::Value> {
        self.root.as_mut()
    }

    pub fn set_root(&mut self, root: Option<C::Value>) {
        self.root = root;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> &FileCodec {
        &self.codec
    }
}
