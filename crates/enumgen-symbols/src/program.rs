//! The queryable view over the host program's symbol information.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use enumgen_common::SourceLocation;
use enumgen_common::names;

use crate::descriptor::{EnumMember, EnumTypeDescriptor, UnderlyingKind, Visibility};

/// Opaque symbol identity. Equality is identity, never name comparison.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Declarative metadata attached to a symbol by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeData {
    pub name: String,
    pub payload: Option<String>,
}

impl AttributeData {
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_payload(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload.into()),
        }
    }
}

/// A field declared on a type symbol.
///
/// `is_enumerator` separates genuine enumerator fields from synthetic
/// backing members the host's model may surface alongside them. `constant`
/// is the host's folded compile-time value, when one resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSymbol {
    pub name: String,
    pub is_enumerator: bool,
    pub constant: Option<i128>,
    pub attributes: Vec<AttributeData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Enum { underlying: UnderlyingKind },
    /// Non-enum types the host surfaces (e.g. the generated dispatch base).
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub id: TypeId,
    pub name: String,
    pub namespace: Option<String>,
    pub kind: TypeKind,
    pub visibility: Visibility,
    pub attributes: Vec<AttributeData>,
    pub fields: Vec<FieldSymbol>,
    pub location: SourceLocation,
}

impl TypeSymbol {
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { .. })
    }
}

/// A resolved generic invocation the host observed in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub operation: String,
    pub type_args: Vec<TypeId>,
    pub location: SourceLocation,
}

/// All symbol information one pipeline run consumes.
///
/// Immutable once built; every stage is a pure function of this view, so
/// the host's memoization can key on its structural equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ProgramSymbolsData", into = "ProgramSymbolsData")]
pub struct ProgramSymbols {
    types: Vec<TypeSymbol>,
    call_sites: Vec<CallSite>,
    by_id: FxHashMap<TypeId, usize>,
}

impl PartialEq for ProgramSymbols {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types && self.call_sites == other.call_sites
    }
}

impl Eq for ProgramSymbols {}

/// Wire form of `ProgramSymbols`; the id index is rebuilt on the way in.
#[derive(Clone, Serialize, Deserialize)]
struct ProgramSymbolsData {
    types: Vec<TypeSymbol>,
    call_sites: Vec<CallSite>,
}

impl From<ProgramSymbolsData> for ProgramSymbols {
    fn from(data: ProgramSymbolsData) -> Self {
        ProgramSymbols::new(data.types, data.call_sites)
    }
}

impl From<ProgramSymbols> for ProgramSymbolsData {
    fn from(symbols: ProgramSymbols) -> Self {
        ProgramSymbolsData {
            types: symbols.types,
            call_sites: symbols.call_sites,
        }
    }
}

impl ProgramSymbols {
    pub(crate) fn new(types: Vec<TypeSymbol>, call_sites: Vec<CallSite>) -> Self {
        let by_id = types
            .iter()
            .enumerate()
            .map(|(index, ty)| (ty.id, index))
            .collect();
        Self {
            types,
            call_sites,
            by_id,
        }
    }

    pub fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    pub fn call_sites(&self) -> &[CallSite] {
        &self.call_sites
    }

    pub fn type_symbol(&self, id: TypeId) -> Option<&TypeSymbol> {
        self.by_id.get(&id).map(|&index| &self.types[index])
    }

    /// Declaration-order iterator over types carrying `marker`.
    pub fn marked_types<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a TypeSymbol> {
        self.types.iter().filter(move |ty| ty.has_attribute(marker))
    }

    /// Constant-folding facility: the host's resolved compile-time value of
    /// a declared field, if any.
    pub fn constant_value(&self, id: TypeId, field: &str) -> Option<i128> {
        self.type_symbol(id)?
            .fields
            .iter()
            .find(|f| f.name == field)?
            .constant
    }

    /// Build the typed descriptor for an enumeration type.
    ///
    /// This is where attribute recognition happens, once per run: the flags
    /// marker and per-member alias payloads become plain fields on the
    /// descriptor, so nothing downstream inspects attributes again. Only
    /// genuine enumerator fields with a resolved constant survive member
    /// extraction.
    pub fn enum_descriptor(&self, id: TypeId) -> Option<EnumTypeDescriptor> {
        let symbol = self.type_symbol(id)?;
        let TypeKind::Enum { underlying } = symbol.kind else {
            return None;
        };

        let members = symbol
            .fields
            .iter()
            .filter(|f| f.is_enumerator)
            .filter_map(|f| {
                // members without a folded constant cannot be generated
                let value = f.constant?;
                let alias = f
                    .attributes
                    .iter()
                    .find(|a| a.name == names::ALIAS_ATTRIBUTE)
                    .and_then(|a| a.payload.clone());
                Some(EnumMember {
                    name: f.name.clone(),
                    value,
                    alias,
                })
            })
            .collect();

        Some(EnumTypeDescriptor {
            id,
            qualified_name: symbol.qualified_name(),
            display_name: symbol.qualified_name(),
            underlying,
            members,
            is_flags: symbol.has_attribute(names::FLAGS_ATTRIBUTE),
            visibility: symbol.visibility,
            decl_location: symbol.location.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{EnumDecl, ProgramSymbolsBuilder};

    #[test]
    fn descriptor_skips_synthetic_and_unfolded_members() {
        let mut builder = ProgramSymbolsBuilder::new();
        let id = builder.add_enum(EnumDecl::new("Color").member("Red", 0).member("Green", 1));
        let mut symbols = builder.finish();

        // Splice in a synthetic backing field and an unresolved constant the
        // way a host model might surface them.
        let mut types = symbols.types().to_vec();
        types[0].fields.push(FieldSymbol {
            name: "value__".to_string(),
            is_enumerator: false,
            constant: None,
            attributes: Vec::new(),
        });
        types[0].fields.push(FieldSymbol {
            name: "Broken".to_string(),
            is_enumerator: true,
            constant: None,
            attributes: Vec::new(),
        });
        symbols = ProgramSymbols::new(types, symbols.call_sites().to_vec());

        let descriptor = symbols.enum_descriptor(id).unwrap();
        let names: Vec<&str> = descriptor.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Green"]);
    }

    #[test]
    fn same_name_different_namespace_are_distinct_identities() {
        let mut builder = ProgramSymbolsBuilder::new();
        let a = builder.add_enum(EnumDecl::new("Color").namespace("app").member("Red", 0));
        let b = builder.add_enum(EnumDecl::new("Color").namespace("lib").member("Red", 0));
        let symbols = builder.finish();

        assert_ne!(a, b);
        let da = symbols.enum_descriptor(a).unwrap();
        let db = symbols.enum_descriptor(b).unwrap();
        assert_eq!(da.qualified_name, "app.Color");
        assert_eq!(db.qualified_name, "lib.Color");
    }

    #[test]
    fn flags_marker_and_alias_payload_become_descriptor_fields() {
        let mut builder = ProgramSymbolsBuilder::new();
        let id = builder.add_enum(
            EnumDecl::new("Perm")
                .flags()
                .member("None", 0)
                .member_aliased("Read", 1, "r")
                .member("Write", 2),
        );
        let symbols = builder.finish();

        let descriptor = symbols.enum_descriptor(id).unwrap();
        assert!(descriptor.is_flags);
        assert_eq!(descriptor.members[1].alias.as_deref(), Some("r"));
        assert_eq!(descriptor.members[2].alias, None);
        assert!(descriptor.has_aliases());
    }

    #[test]
    fn constant_folding_lookup() {
        let mut builder = ProgramSymbolsBuilder::new();
        let id = builder.add_enum(EnumDecl::new("Color").member("Red", 3));
        let symbols = builder.finish();

        assert_eq!(symbols.constant_value(id, "Red"), Some(3));
        assert_eq!(symbols.constant_value(id, "Missing"), None);
    }
}
