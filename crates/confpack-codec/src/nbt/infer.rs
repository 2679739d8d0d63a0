//! Typed-tag inference for values that may or may not carry hints.

use crate::context::{Context, ValueKind};
use crate::{EncodeError, Number, NumberKind, TagKind};

/// Tag a value encodes as. A metadata hint wins over the value's shape.
pub fn tag_of<C: Context>(ctx: &C, value: &C::Value) -> Result<TagKind, EncodeError> {
    if let Some(tag) = ctx.tag_hint(value) {
        return Ok(tag);
    }
    Ok(match ctx.kind(value) {
        ValueKind::String => TagKind::String,
        ValueKind::Bool => TagKind::Byte,
        ValueKind::Number => match ctx.as_number(value)?.kind() {
            NumberKind::Byte => TagKind::Byte,
            NumberKind::Short => TagKind::Short,
            NumberKind::Int => TagKind::Int,
            NumberKind::Long => TagKind::Long,
            NumberKind::Float => TagKind::Float,
            NumberKind::Double => TagKind::Double,
            NumberKind::Big => return Err(EncodeError::UnsupportedNumber(NumberKind::Big)),
        },
        ValueKind::Blob => TagKind::ByteArray,
        ValueKind::Map => TagKind::Compound,
        ValueKind::List => {
            let items = ctx.as_list(value)?;
            if items.is_empty() {
                TagKind::List
            } else {
                // Byte lists stay generic; packed bytes are blobs.
                match element_tag_of(ctx, value)? {
                    element @ (TagKind::Int | TagKind::Long) => {
                        TagKind::array_of(element).unwrap_or(TagKind::List)
                    }
                    _ => TagKind::List,
                }
            }
        }
        ValueKind::Null => return Err(EncodeError::Untaggable(ValueKind::Null)),
    })
}

/// Element tag of a generic list.
///
/// Empty lists use their element hint, or `End` without one. Otherwise every
/// element must resolve to the same tag.
pub fn element_tag_of<C: Context>(ctx: &C, list: &C::Value) -> Result<TagKind, EncodeError> {
    let items = ctx.as_list(list)?;
    let Some((first, rest)) = items.split_first() else {
        return Ok(ctx.element_tag_hint(list).unwrap_or(TagKind::End));
    };
    let tag = tag_of(ctx, first)?;
    for item in rest {
        let other = tag_of(ctx, item)?;
        if other != tag {
            return Err(EncodeError::HeterogeneousList(tag, other));
        }
    }
    Ok(tag)
}

/// The number `value` holds, converted to the width of the numeric `tag`.
///
/// Booleans are accepted for `Byte`. A value that does not fit the width
/// exactly, or a floating value under an integer tag, is `Unmappable`.
pub fn number_for<C: Context>(ctx: &C, value: &C::Value, tag: TagKind) -> Result<Number, EncodeError> {
    let unmappable = |kind| EncodeError::Unmappable { kind, tag };
    let n = match ctx.kind(value) {
        ValueKind::Number => ctx.as_number(value)?,
        ValueKind::Bool if tag == TagKind::Byte => return Ok(Number::Byte(ctx.as_bool(value)? as i8)),
        kind => return Err(unmappable(kind)),
    };
    tag.number_kind()
        .and_then(|kind| n.exact(kind))
        .ok_or_else(|| unmappable(ValueKind::Number))
}
