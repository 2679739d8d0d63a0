use crate::{ConfigList, ConfigMap, ConfigValue, Meta, NotThisType, Number};

use super::{Context, ValueKind};

/// [`Context`] over the canonical [`ConfigValue`] tree.
///
/// Lists and maps carry metadata; scalars do not.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigContext;

fn mismatch(expected: ValueKind, value: &ConfigValue) -> NotThisType {
    NotThisType {
        expected,
        found: ConfigContext.kind(value),
    }
}

impl Context for ConfigContext {
    type Value = ConfigValue;

    fn kind(&self, value: &ConfigValue) -> ValueKind {
        match value {
            ConfigValue::Null => ValueKind::Null,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Number(_) => ValueKind::Number,
            ConfigValue::Str(_) => ValueKind::String,
            ConfigValue::Blob(_) => ValueKind::Blob,
            ConfigValue::List(_) => ValueKind::List,
            ConfigValue::Map(_) => ValueKind::Map,
        }
    }

    fn as_bool(&self, value: &ConfigValue) -> Result<bool, NotThisType> {
        value.as_bool().ok_or_else(|| mismatch(ValueKind::Bool, value))
    }

    fn as_number(&self, value: &ConfigValue) -> Result<Number, NotThisType> {
        value
            .as_number()
            .cloned()
            .ok_or_else(|| mismatch(ValueKind::Number, value))
    }

    fn as_string<'v>(&self, value: &'v ConfigValue) -> Result<&'v str, NotThisType> {
        value.as_str().ok_or_else(|| mismatch(ValueKind::String, value))
    }

    fn as_blob<'v>(&self, value: &'v ConfigValue) -> Result<&'v [u8], NotThisType> {
        value.as_blob().ok_or_else(|| mismatch(ValueKind::Blob, value))
    }

    fn as_list<'v>(&self, value: &'v ConfigValue) -> Result<&'v [ConfigValue], NotThisType> {
        value
            .as_list()
            .map(|l| l.items.as_slice())
            .ok_or_else(|| mismatch(ValueKind::List, value))
    }

    fn as_map<'v>(
        &self,
        value: &'v ConfigValue,
    ) -> Result<Vec<(&'v str, &'v ConfigValue)>, NotThisType> {
        value
            .as_map()
            .map(|m| m.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .ok_or_else(|| mismatch(ValueKind::Map, value))
    }

    fn null(&self) -> ConfigValue {
        ConfigValue::Null
    }

    fn from_bool(&self, value: bool) -> ConfigValue {
        ConfigValue::Bool(value)
    }

    fn from_number(&self, value: Number) -> ConfigValue {
        ConfigValue::Number(value)
    }

    fn from_string(&self, value: String) -> ConfigValue {
        ConfigValue::Str(value)
    }

    fn from_blob(&self, value: Vec<u8>) -> ConfigValue {
        ConfigValue::Blob(value)
    }

    fn from_list(&self, items: Vec<ConfigValue>) -> ConfigValue {
        ConfigValue::List(ConfigList::from(items))
    }

    fn from_map(&self, entries: Vec<(String, ConfigValue)>) -> ConfigValue {
        ConfigValue::Map(entries.into_iter().collect::<ConfigMap>())
    }

    fn get<'v>(&self, key: &str, map: &'v ConfigValue) -> Option<&'v ConfigValue> {
        map.as_map().and_then(|m| m.get(key))
    }

    fn ordered_keys(&self, map: &ConfigValue) -> Vec<String> {
        map.as_map()
            .map(|m| m.keys().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn set(
        &self,
        key: &str,
        value: Option<ConfigValue>,
        mut map: ConfigValue,
    ) -> Result<ConfigValue, NotThisType> {
        let Some(entries) = map.as_map_mut() else {
            return Err(mismatch(ValueKind::Map, &map));
        };
        match value {
            Some(v) => entries.insert(key, v),
            None => {
                entries.remove(key);
            }
        }
        Ok(map)
    }

    fn copy(&self, value: &ConfigValue) -> ConfigValue {
        value.clone()
    }

    fn supports_metadata(&self, value: &ConfigValue) -> bool {
        value.meta().is_some()
    }

    fn metadata<'v>(&self, value: &'v ConfigValue) -> Option<&'v Meta> {
        value.meta()
    }

    fn metadata_mut<'v>(&self, value: &'v mut ConfigValue) -> Option<&'v mut Meta> {
        value.meta_mut()
    }
}
