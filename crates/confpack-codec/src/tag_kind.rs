//! `TagKind` — tag identifiers of the typed-tag protocol.

use std::fmt;

use crate::NumberKind;

/// The thirteen tags of the typed-tag protocol, with their wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub const ALL: [TagKind; 13] = [
        TagKind::End,
        TagKind::Byte,
        TagKind::Short,
        TagKind::Int,
        TagKind::Long,
        TagKind::Float,
        TagKind::Double,
        TagKind::ByteArray,
        TagKind::String,
        TagKind::List,
        TagKind::Compound,
        TagKind::IntArray,
        TagKind::LongArray,
    ];

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<TagKind> {
        Self::ALL.get(id as usize).copied()
    }

    /// Element tag of the three packed array kinds.
    pub fn array_element(self) -> Option<TagKind> {
        match self {
            TagKind::ByteArray => Some(TagKind::Byte),
            TagKind::IntArray => Some(TagKind::Int),
            TagKind::LongArray => Some(TagKind::Long),
            _ => None,
        }
    }

    /// Packed array kind for an element tag, if one exists.
    pub fn array_of(element: TagKind) -> Option<TagKind> {
        match element {
            TagKind::Byte => Some(TagKind::ByteArray),
            TagKind::Int => Some(TagKind::IntArray),
            TagKind::Long => Some(TagKind::LongArray),
            _ => None,
        }
    }

    /// Number width carried by a numeric tag.
    pub fn number_kind(self) -> Option<NumberKind> {
        match self {
            TagKind::Byte => Some(NumberKind::Byte),
            TagKind::Short => Some(NumberKind::Short),
            TagKind::Int => Some(NumberKind::Int),
            TagKind::Long => Some(NumberKind::Long),
            TagKind::Float => Some(NumberKind::Float),
            TagKind::Double => Some(NumberKind::Double),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "TAG_End",
            TagKind::Byte => "TAG_Byte",
            TagKind::Short => "TAG_Short",
            TagKind::Int => "TAG_Int",
            TagKind::Long => "TAG_Long",
            TagKind::Float => "TAG_Float",
            TagKind::Double => "TAG_Double",
            TagKind::ByteArray => "TAG_Byte_Array",
            TagKind::String => "TAG_String",
            TagKind::List => "TAG_List",
            TagKind::Compound => "TAG_Compound",
            TagKind::IntArray => "TAG_Int_Array",
            TagKind::LongArray => "TAG_Long_Array",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
