//! `ConfigValue` — the canonical configuration value tree.
//!
//! Numbers keep their width ([`NumberKind`]) so that the binary codecs can
//! round-trip them exactly. Lists and maps carry a small [`Meta`] record for
//! hints that only the typed-tag protocol needs.

use std::fmt;

use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::TagKind;

// ── Numbers ───────────────────────────────────────────────────────────────

/// Width of a [`Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Integer too wide for 64 bits.
    Big,
}

impl NumberKind {
    pub fn is_integral(self) -> bool {
        !matches!(self, NumberKind::Float | NumberKind::Double)
    }
}

/// A number that remembers its width.
///
/// Equality is kind-sensitive: `Int(1) != Long(1)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Unbounded integer, for text that overflows 64 bits.
    Big(BigInt),
}

impl Number {
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Byte(_) => NumberKind::Byte,
            Number::Short(_) => NumberKind::Short,
            Number::Int(_) => NumberKind::Int,
            Number::Long(_) => NumberKind::Long,
            Number::Float(_) => NumberKind::Float,
            Number::Double(_) => NumberKind::Double,
            Number::Big(_) => NumberKind::Big,
        }
    }

    /// `Int` when `v` fits in 32 bits, else `Long`.
    pub fn integer(v: i64) -> Number {
        match i32::try_from(v) {
            Ok(i) => Number::Int(i),
            Err(_) => Number::Long(v),
        }
    }

    /// Narrowest of `Int`, `Long` and `Big` that holds `v`.
    pub fn big(v: BigInt) -> Number {
        match i64::try_from(&v) {
            Ok(l) => Number::integer(l),
            Err(_) => Number::Big(v),
        }
    }

    /// Exact integer value, `None` for floating kinds.
    pub fn as_bigint(&self) -> Option<BigInt> {
        match self {
            Number::Big(v) => Some(v.clone()),
            other => other.as_i64().map(BigInt::from),
        }
    }

    /// Exact integer value if it fits in 64 bits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Byte(v) => Some(i64::from(*v)),
            Number::Short(v) => Some(i64::from(*v)),
            Number::Int(v) => Some(i64::from(*v)),
            Number::Long(v) => Some(*v),
            Number::Big(v) => i64::try_from(v).ok(),
            Number::Float(_) | Number::Double(_) => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Float(v) => f64::from(*v),
            Number::Double(v) => *v,
            Number::Big(v) => v.to_f64().unwrap_or(f64::NAN),
            other => other.as_i64().unwrap_or_default() as f64,
        }
    }

    /// The same value as `kind`, or `None` when it would not survive the
    /// conversion unchanged. Floating values never become integers.
    pub fn exact(&self, kind: NumberKind) -> Option<Number> {
        if self.kind() == kind {
            return Some(self.clone());
        }
        match kind {
            NumberKind::Byte => i8::try_from(self.as_i64()?).ok().map(Number::Byte),
            NumberKind::Short => i16::try_from(self.as_i64()?).ok().map(Number::Short),
            NumberKind::Int => i32::try_from(self.as_i64()?).ok().map(Number::Int),
            NumberKind::Long => self.as_i64().map(Number::Long),
            NumberKind::Big => self.as_bigint().map(Number::Big),
            NumberKind::Float => match self {
                Number::Double(d) => {
                    let f = *d as f32;
                    (f64::from(f) == *d || d.is_nan()).then_some(Number::Float(f))
                }
                other => {
                    let i = other.as_i64()?;
                    let f = i as f32;
                    (f as i128 == i128::from(i)).then_some(Number::Float(f))
                }
            },
            NumberKind::Double => match self {
                Number::Float(f) => Some(Number::Double(f64::from(*f))),
                other => {
                    let i = other.as_i64()?;
                    let d = i as f64;
                    (d as i128 == i128::from(i)).then_some(Number::Double(d))
                }
            },
        }
    }
}

/// Writes `v` so that it always reads back as a floating value.
///
/// Non-finite values have no literal form and are written as `NaN`,
/// `Infinity` or `-Infinity`; text codecs decide what to do with them.
pub(crate) fn write_float(out: &mut String, v: f64, f32_precision: bool) {
    use std::fmt::Write as _;
    if v.is_nan() {
        out.push_str("NaN");
        return;
    }
    if v.is_infinite() {
        out.push_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
        return;
    }
    let start = out.len();
    if f32_precision {
        let _ = write!(out, "{}", v as f32);
    } else {
        let _ = write!(out, "{}", v);
    }
    if !out[start..].contains(&['.', 'e', 'E'][..]) {
        out.push_str(".0");
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Byte(v) => write!(f, "{v}"),
            Number::Short(v) => write!(f, "{v}"),
            Number::Int(v) => write!(f, "{v}"),
            Number::Long(v) => write!(f, "{v}"),
            Number::Big(v) => write!(f, "{v}"),
            Number::Float(v) => {
                let mut s = String::new();
                write_float(&mut s, f64::from(*v), true);
                f.write_str(&s)
            }
            Number::Double(v) => {
                let mut s = String::new();
                write_float(&mut s, *v, false);
                f.write_str(&s)
            }
        }
    }
}

macro_rules! number_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Number {
                fn from(v: $t) -> Self {
                    Number::$variant(v)
                }
            }

            impl From<$t> for ConfigValue {
                fn from(v: $t) -> Self {
                    ConfigValue::Number(Number::$variant(v))
                }
            }
        )*
    };
}

number_from! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigInt => Big,
}

impl From<i128> for Number {
    fn from(v: i128) -> Self {
        Number::Big(BigInt::from(v))
    }
}

impl From<i128> for ConfigValue {
    fn from(v: i128) -> Self {
        ConfigValue::Number(Number::from(v))
    }
}

// ── Metadata ──────────────────────────────────────────────────────────────

/// Out-of-band typed-tag hints attached to a list or map node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    /// Tag the node was decoded from or should be encoded as.
    pub tag: Option<TagKind>,
    /// Element tag of a list or packed array.
    pub element_tag: Option<TagKind>,
    /// Name of the document root compound.
    pub root_name: Option<String>,
}

impl Meta {
    pub fn is_empty(&self) -> bool {
        self.tag.is_none() && self.element_tag.is_none() && self.root_name.is_none()
    }
}

// ── Containers ────────────────────────────────────────────────────────────

/// Ordered list node.
#[derive(Debug, Clone, Default)]
pub struct ConfigList {
    pub items: Vec<ConfigValue>,
    pub meta: Meta,
}

impl ConfigList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, value: impl Into<ConfigValue>) -> Self {
        self.items.push(value.into());
        self
    }

    pub fn push(&mut self, value: impl Into<ConfigValue>) {
        self.items.push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<&ConfigValue> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigValue> {
        self.items.iter()
    }
}

impl PartialEq for ConfigList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl From<Vec<ConfigValue>> for ConfigList {
    fn from(items: Vec<ConfigValue>) -> Self {
        Self {
            items,
            meta: Meta::default(),
        }
    }
}

impl FromIterator<ConfigValue> for ConfigList {
    fn from_iter<I: IntoIterator<Item = ConfigValue>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Insertion-ordered, string-keyed map node.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    pub entries: IndexMap<String, ConfigValue>,
    pub meta: Meta,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Inserts or replaces; a replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ConfigValue::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(ConfigValue::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    pub fn get_map(&self, key: &str) -> Option<&ConfigMap> {
        self.get(key).and_then(ConfigValue::as_map)
    }

    pub fn get_list(&self, key: &str) -> Option<&ConfigList> {
        self.get(key).and_then(ConfigValue::as_list)
    }
}

impl PartialEq for ConfigMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, ConfigValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            meta: Meta::default(),
        }
    }
}

// ── ConfigValue ───────────────────────────────────────────────────────────

/// A node of the canonical tree.
///
/// Equality ignores [`Meta`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Str(String),
    Blob(Vec<u8>),
    List(ConfigList),
    Map(ConfigMap),
}

impl ConfigValue {
    pub fn blob(bytes: impl Into<Vec<u8>>) -> Self {
        ConfigValue::Blob(bytes.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            ConfigValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_i64())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.to_f64())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            ConfigValue::Blob(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ConfigList> {
        match self {
            ConfigValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Metadata record, present only on lists and maps.
    pub fn meta(&self) -> Option<&Meta> {
        match self {
            ConfigValue::List(l) => Some(&l.meta),
            ConfigValue::Map(m) => Some(&m.meta),
            _ => None,
        }
    }

    pub fn meta_mut(&mut self) -> Option<&mut Meta> {
        match self {
            ConfigValue::List(l) => Some(&mut l.meta),
            ConfigValue::Map(m) => Some(&mut m.meta),
            _ => None,
        }
    }

    /// Typed-tag hint of this node, if it carries one.
    pub fn tag_kind(&self) -> Option<TagKind> {
        self.meta().and_then(|m| m.tag)
    }

    /// Sets the typed-tag hint; returns `false` for scalar nodes.
    pub fn set_tag_kind(&mut self, tag: TagKind) -> bool {
        match self.meta_mut() {
            Some(meta) => {
                meta.tag = Some(tag);
                true
            }
            None => false,
        }
    }

    /// Packed byte arrays are blobs; signed values are stored as their
    /// two's-complement bytes.
    pub fn byte_array(values: &[i8]) -> Self {
        ConfigValue::Blob(values.iter().map(|v| *v as u8).collect())
    }

    /// Builds a list tagged as a packed int array.
    pub fn int_array(values: &[i32]) -> Self {
        Self::packed(values.iter().map(|v| ConfigValue::from(*v)), TagKind::IntArray)
    }

    /// Builds a list tagged as a packed long array.
    pub fn long_array(values: &[i64]) -> Self {
        Self::packed(values.iter().map(|v| ConfigValue::from(*v)), TagKind::LongArray)
    }

    fn packed(items: impl Iterator<Item = ConfigValue>, tag: TagKind) -> Self {
        let mut list: ConfigList = items.collect();
        list.meta.tag = Some(tag);
        list.meta.element_tag = tag.array_element();
        ConfigValue::List(list)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}

impl From<Number> for ConfigValue {
    fn from(v: Number) -> Self {
        ConfigValue::Number(v)
    }
}

impl From<ConfigList> for ConfigValue {
    fn from(v: ConfigList) -> Self {
        ConfigValue::List(v)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(v: ConfigMap) -> Self {
        ConfigValue::Map(v)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ConfigValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_equality_is_kind_sensitive() {
        assert_ne!(Number::Int(1), Number::Long(1));
        assert_eq!(Number::Short(7), Number::Short(7));
    }

    #[test]
    fn integer_picks_narrowest() {
        assert_eq!(Number::integer(42), Number::Int(42));
        assert_eq!(Number::integer(1 << 40), Number::Long(1 << 40));
        assert_eq!(Number::big(BigInt::from(-7)), Number::Int(-7));
        let wide: BigInt = BigInt::from(i64::MAX) + 1;
        assert_eq!(Number::big(wide.clone()), Number::Big(wide));
    }

    #[test]
    fn exact_conversions_refuse_loss() {
        assert_eq!(Number::Int(100).exact(NumberKind::Byte), Some(Number::Byte(100)));
        assert_eq!(Number::Int(300).exact(NumberKind::Byte), None);
        assert_eq!(Number::Long(5_000_000_000).exact(NumberKind::Int), None);
        assert_eq!(Number::Double(2.9).exact(NumberKind::Int), None);
        assert_eq!(Number::Double(2.0).exact(NumberKind::Long), None);
        assert_eq!(Number::Int(7).exact(NumberKind::Long), Some(Number::Long(7)));
        assert_eq!(Number::Float(0.5).exact(NumberKind::Double), Some(Number::Double(0.5)));
        assert_eq!(Number::Double(0.5).exact(NumberKind::Float), Some(Number::Float(0.5)));
        assert_eq!(Number::Double(0.1).exact(NumberKind::Float), None);
        assert_eq!(Number::Long(i64::MAX).exact(NumberKind::Double), None);
        assert_eq!(Number::Int(16_777_217).exact(NumberKind::Float), None);
        assert_eq!(
            Number::Short(-3).exact(NumberKind::Big),
            Some(Number::Big(BigInt::from(-3)))
        );
        let wide = Number::Big(BigInt::from(i64::MAX) * 4);
        assert_eq!(wide.exact(NumberKind::Long), None);
        assert_eq!(wide.exact(NumberKind::Double), None);
    }

    #[test]
    fn float_display_keeps_fraction() {
        assert_eq!(Number::Double(4.0).to_string(), "4.0");
        assert_eq!(Number::Float(0.1).to_string(), "0.1");
        assert_eq!(Number::Double(-0.0).to_string(), "-0.0");
        assert_eq!(Number::Double(112.4).to_string(), "112.4");
    }

    #[test]
    fn equality_ignores_meta() {
        let a = ConfigValue::int_array(&[1, 2, 3]);
        let b: ConfigValue = ConfigList::new().with(1).with(2).with(3).into();
        assert_eq!(a, b);
        assert_eq!(a.tag_kind(), Some(TagKind::IntArray));
        assert_eq!(b.tag_kind(), None);
    }

    #[test]
    fn scalars_have_no_meta() {
        let mut v = ConfigValue::from("x");
        assert!(v.meta().is_none());
        assert!(!v.set_tag_kind(TagKind::String));
    }

    #[test]
    fn map_preserves_insertion_order_on_remove() {
        let mut m = ConfigMap::new().with("a", 1).with("b", 2).with("c", 3);
        m.remove("b");
        m.insert("d", 4);
        assert_eq!(m.keys().collect::<Vec<_>>(), ["a", "c", "d"]);
        assert_eq!(m.get_i64("d"), Some(4));
    }
}
