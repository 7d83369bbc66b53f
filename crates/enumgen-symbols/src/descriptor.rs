//! Typed descriptors for discovered enumeration types.

use serde::{Deserialize, Serialize};

use enumgen_common::SourceLocation;

use crate::program::TypeId;

/// Declared accessibility of a type. Only `Public` types reach synthesis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// The eight integer widths an enum may declare as its underlying kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnderlyingKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl UnderlyingKind {
    /// Keyword used when the emitter widens/narrows to this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            UnderlyingKind::I8 => "sbyte",
            UnderlyingKind::U8 => "byte",
            UnderlyingKind::I16 => "short",
            UnderlyingKind::U16 => "ushort",
            UnderlyingKind::I32 => "int",
            UnderlyingKind::U32 => "uint",
            UnderlyingKind::I64 => "long",
            UnderlyingKind::U64 => "ulong",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            UnderlyingKind::I8 | UnderlyingKind::I16 | UnderlyingKind::I32 | UnderlyingKind::I64
        )
    }

    pub fn bits(self) -> u32 {
        match self {
            UnderlyingKind::I8 | UnderlyingKind::U8 => 8,
            UnderlyingKind::I16 | UnderlyingKind::U16 => 16,
            UnderlyingKind::I32 | UnderlyingKind::U32 => 32,
            UnderlyingKind::I64 | UnderlyingKind::U64 => 64,
        }
    }

    /// Whether `value` is representable in this kind.
    pub fn contains(self, value: i128) -> bool {
        match self {
            UnderlyingKind::I8 => i8::try_from(value).is_ok(),
            UnderlyingKind::U8 => u8::try_from(value).is_ok(),
            UnderlyingKind::I16 => i16::try_from(value).is_ok(),
            UnderlyingKind::U16 => u16::try_from(value).is_ok(),
            UnderlyingKind::I32 => i32::try_from(value).is_ok(),
            UnderlyingKind::U32 => u32::try_from(value).is_ok(),
            UnderlyingKind::I64 => i64::try_from(value).is_ok(),
            UnderlyingKind::U64 => u64::try_from(value).is_ok(),
        }
    }

    /// Render a constant of this kind as a source literal.
    ///
    /// The value is kept as an exact `i128` throughout the pipeline and only
    /// formatted here; it is never reinterpreted through a narrower type.
    pub fn render_literal(self, value: i128) -> String {
        match self {
            UnderlyingKind::U32 => format!("{value}U"),
            UnderlyingKind::I64 => format!("{value}L"),
            UnderlyingKind::U64 => format!("{value}UL"),
            _ => format!("{value}"),
        }
    }
}

impl Default for UnderlyingKind {
    fn default() -> Self {
        UnderlyingKind::I32
    }
}

/// One declared enumerator: name, exact constant value, optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    /// Exact underlying constant, wide enough for all eight kinds.
    pub value: i128,
    /// Serialization alias payload, when the member carries one.
    pub alias: Option<String>,
}

/// Everything the synthesizer needs to know about one enumeration type.
///
/// Identity equality is by `TypeId` (symbol identity): two same-named enums
/// in different namespaces are distinct. Rebuilt every pipeline run from
/// current symbol information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumTypeDescriptor {
    pub id: TypeId,
    pub qualified_name: String,
    pub display_name: String,
    pub underlying: UnderlyingKind,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
    pub is_flags: bool,
    pub visibility: Visibility,
    pub decl_location: SourceLocation,
}

impl EnumTypeDescriptor {
    pub fn aliased_members(&self) -> impl Iterator<Item = &EnumMember> {
        self.members.iter().filter(|m| m.alias.is_some())
    }

    pub fn has_aliases(&self) -> bool {
        self.members.iter().any(|m| m.alias.is_some())
    }
}
