use super::Context;

/// Deep-converts `value` from one representation into another.
///
/// Metadata is carried across when both sides support it on the node.
pub fn convert<A, B>(from: &A, value: &A::Value, to: &B) -> B::Value
where
    A: Context + ?Sized,
    B: Context + ?Sized,
{
    use super::ValueKind;

    let mut out = match from.kind(value) {
        ValueKind::Null => to.null(),
        ValueKind::Bool => from.as_bool(value).map_or_else(|_| to.null(), |b| to.from_bool(b)),
        ValueKind::Number => from
            .as_number(value)
            .map_or_else(|_| to.null(), |n| to.from_number(n)),
        ValueKind::String => from
            .as_string(value)
            .map_or_else(|_| to.null(), |s| to.from_string(s.to_owned())),
        ValueKind::Blob => from
            .as_blob(value)
            .map_or_else(|_| to.null(), |b| to.from_blob(b.to_vec())),
        ValueKind::List => {
            let items = from.as_list(value).unwrap_or_default();
            to.from_list(items.iter().map(|item| convert(from, item, to)).collect())
        }
        ValueKind::Map => {
            let entries = from.as_map(value).unwrap_or_default();
            to.from_map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_owned(), convert(from, v, to)))
                    .collect(),
            )
        }
    };

    if let Some(meta) = from.metadata(value) {
        if let Some(target) = to.metadata_mut(&mut out) {
            *target = meta.clone();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConfigContext, JsonContext};
    use crate::{ConfigList, ConfigMap, ConfigValue, TagKind};
    use serde_json::json;

    #[test]
    fn canonical_to_json_and_back() {
        let value: ConfigValue = ConfigMap::new()
            .with("name", "demo")
            .with("count", 3)
            .with("ratio", 0.5)
            .with("tags", ConfigList::new().with("a").with("b"))
            .with("nothing", ConfigValue::Null)
            .into();
        let j = convert(&ConfigContext, &value, &JsonContext);
        assert_eq!(
            j,
            json!({"name": "demo", "count": 3, "ratio": 0.5, "tags": ["a", "b"], "nothing": null})
        );
        let back = convert(&JsonContext, &j, &ConfigContext);
        assert_eq!(back, value);
    }

    #[test]
    fn metadata_survives_canonical_copy() {
        let value = ConfigValue::long_array(&[1, 2]);
        let copy = convert(&ConfigContext, &value, &ConfigContext);
        assert_eq!(copy.tag_kind(), Some(TagKind::LongArray));
    }
}
