//! Representation contexts.
//!
//! A [`Context`] lets a codec read and build values of some concrete tree
//! type without knowing what it is. Every codec in this crate is written once
//! against this trait: the same decoder fills a [`ConfigValue`] tree through
//! [`ConfigContext`] or a `serde_json::Value` tree through [`JsonContext`].
//!
//! [`ConfigValue`]: crate::ConfigValue

mod config;
mod convert;
mod json;

use std::fmt;

pub use config::ConfigContext;
pub use convert::convert;
pub use json::JsonContext;

use crate::{Meta, NotThisType, Number, TagKind};

/// Shape of a value as seen through a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Blob,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Blob => "blob",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        })
    }
}

/// Bridge between the codecs and a concrete value representation.
///
/// Implementations must be free of global side effects so that codecs may run
/// on several threads at once.
pub trait Context {
    type Value;

    fn kind(&self, value: &Self::Value) -> ValueKind;

    fn is_null(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::Null
    }

    fn is_bool(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::Bool
    }

    fn is_number(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::Number
    }

    fn is_string(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::String
    }

    fn is_blob(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::Blob
    }

    fn is_list(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::List
    }

    fn is_map(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::Map
    }

    // ── Narrowing ──────────────────────────────────────────────────────────

    fn as_bool(&self, value: &Self::Value) -> Result<bool, NotThisType>;
    fn as_number(&self, value: &Self::Value) -> Result<Number, NotThisType>;
    fn as_string<'v>(&self, value: &'v Self::Value) -> Result<&'v str, NotThisType>;
    fn as_blob<'v>(&self, value: &'v Self::Value) -> Result<&'v [u8], NotThisType>;
    fn as_list<'v>(&self, value: &'v Self::Value) -> Result<&'v [Self::Value], NotThisType>;
    /// Map entries in the representation's iteration order.
    fn as_map<'v>(
        &self,
        value: &'v Self::Value,
    ) -> Result<Vec<(&'v str, &'v Self::Value)>, NotThisType>;

    // ── Construction ───────────────────────────────────────────────────────

    fn null(&self) -> Self::Value;
    fn from_bool(&self, value: bool) -> Self::Value;
    fn from_number(&self, value: Number) -> Self::Value;
    fn from_string(&self, value: String) -> Self::Value;
    fn from_blob(&self, value: Vec<u8>) -> Self::Value;
    fn from_list(&self, items: Vec<Self::Value>) -> Self::Value;
    /// Later duplicates of a key replace earlier ones.
    fn from_map(&self, entries: Vec<(String, Self::Value)>) -> Self::Value;

    // ── Map access ─────────────────────────────────────────────────────────

    fn get<'v>(&self, key: &str, map: &'v Self::Value) -> Option<&'v Self::Value>;

    /// Keys in insertion order where the representation keeps one.
    fn ordered_keys(&self, map: &Self::Value) -> Vec<String> {
        self.as_map(map)
            .map(|entries| entries.into_iter().map(|(k, _)| k.to_owned()).collect())
            .unwrap_or_default()
    }

    /// Sets `key` to `value`, or removes it when `value` is `None`.
    fn set(
        &self,
        key: &str,
        value: Option<Self::Value>,
        map: Self::Value,
    ) -> Result<Self::Value, NotThisType>;

    /// Deep copy.
    fn copy(&self, value: &Self::Value) -> Self::Value;

    /// Fills keys missing from `base` with copies from `overlay`, recursing
    /// into maps present on both sides. Existing values in `base` win.
    ///
    /// A null `base` yields a copy of `overlay`; any other non-map pair
    /// yields a copy of `base`.
    fn merge(&self, base: &Self::Value, overlay: &Self::Value) -> Self::Value {
        if self.is_null(base) {
            return self.copy(overlay);
        }
        merge_maps(self, base, overlay, false)
    }

    /// Like [`Context::merge`] but values from `overlay` win on conflicts.
    fn merge_overwrite(&self, base: &Self::Value, overlay: &Self::Value) -> Self::Value {
        if !(self.is_map(base) && self.is_map(overlay)) {
            return self.copy(overlay);
        }
        merge_maps(self, base, overlay, true)
    }

    // ── Metadata ───────────────────────────────────────────────────────────

    /// Whether `value` can carry out-of-band typed-tag hints.
    fn supports_metadata(&self, _value: &Self::Value) -> bool {
        false
    }

    fn metadata<'v>(&self, _value: &'v Self::Value) -> Option<&'v Meta> {
        None
    }

    fn metadata_mut<'v>(&self, _value: &'v mut Self::Value) -> Option<&'v mut Meta> {
        None
    }

    fn tag_hint(&self, value: &Self::Value) -> Option<TagKind> {
        self.metadata(value).and_then(|m| m.tag)
    }

    fn element_tag_hint(&self, value: &Self::Value) -> Option<TagKind> {
        self.metadata(value).and_then(|m| m.element_tag)
    }

    fn root_name<'v>(&self, value: &'v Self::Value) -> Option<&'v str> {
        self.metadata(value).and_then(|m| m.root_name.as_deref())
    }

    /// No-op on values without metadata support.
    fn set_tag_hint(&self, value: &mut Self::Value, tag: TagKind) {
        if let Some(meta) = self.metadata_mut(value) {
            meta.tag = Some(tag);
        }
    }

    fn set_element_tag_hint(&self, value: &mut Self::Value, tag: TagKind) {
        if let Some(meta) = self.metadata_mut(value) {
            meta.element_tag = Some(tag);
        }
    }

    fn set_root_name(&self, value: &mut Self::Value, name: String) {
        if let Some(meta) = self.metadata_mut(value) {
            meta.root_name = Some(name);
        }
    }
}

fn merge_maps<C: Context + ?Sized>(
    ctx: &C,
    base: &C::Value,
    overlay: &C::Value,
    overwrite: bool,
) -> C::Value {
    let Ok(entries) = ctx.as_map(overlay) else {
        return ctx.copy(base);
    };
    if !ctx.is_map(base) {
        return ctx.copy(base);
    }
    let mut out = ctx.copy(base);
    for (key, theirs) in entries {
        let merged = match ctx.get(key, base) {
            Some(ours) if ctx.is_map(ours) && ctx.is_map(theirs) => {
                merge_maps(ctx, ours, theirs, overwrite)
            }
            Some(_) if !overwrite => continue,
            _ => ctx.copy(theirs),
        };
        out = match ctx.set(key, Some(merged), out) {
            Ok(v) => v,
            // `out` is a copy of a map, so `set` cannot reject it.
            Err(_) => return ctx.copy(base),
        };
    }
    out
}
