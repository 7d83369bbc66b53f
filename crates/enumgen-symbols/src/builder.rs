//! Construction of `ProgramSymbols` views.
//!
//! Hosts adapt their own symbol tables through this builder; tests use it
//! to assemble small fixture programs.

use enumgen_common::SourceLocation;
use enumgen_common::names;

use crate::descriptor::{UnderlyingKind, Visibility};
use crate::program::{
    AttributeData, CallSite, FieldSymbol, ProgramSymbols, TypeId, TypeKind, TypeSymbol,
};

/// Declaration-shaped builder for one enum type symbol.
#[derive(Debug, Clone)]
pub struct EnumDecl {
    name: String,
    namespace: Option<String>,
    underlying: UnderlyingKind,
    visibility: Visibility,
    attributes: Vec<AttributeData>,
    fields: Vec<FieldSymbol>,
    location: SourceLocation,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            underlying: UnderlyingKind::default(),
            visibility: Visibility::Public,
            attributes: Vec::new(),
            fields: Vec::new(),
            location: SourceLocation::unknown(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn underlying(mut self, kind: UnderlyingKind) -> Self {
        self.underlying = kind;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Mark as a combinable bit-flags type.
    pub fn flags(mut self) -> Self {
        self.attributes
            .push(AttributeData::marker(names::FLAGS_ATTRIBUTE));
        self
    }

    /// Attach the declaration-level opt-in marker (discovery channel B).
    pub fn marked(mut self) -> Self {
        self.attributes
            .push(AttributeData::marker(names::OPT_IN_MARKER_ATTRIBUTE));
        self
    }

    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn member(mut self, name: impl Into<String>, value: i128) -> Self {
        self.fields.push(FieldSymbol {
            name: name.into(),
            is_enumerator: true,
            constant: Some(value),
            attributes: Vec::new(),
        });
        self
    }

    pub fn member_aliased(
        mut self,
        name: impl Into<String>,
        value: i128,
        alias: impl Into<String>,
    ) -> Self {
        self.fields.push(FieldSymbol {
            name: name.into(),
            is_enumerator: true,
            constant: Some(value),
            attributes: vec![AttributeData::with_payload(names::ALIAS_ATTRIBUTE, alias)],
        });
        self
    }
}

/// Accumulates type symbols and call sites into a `ProgramSymbols` view.
#[derive(Debug, Default)]
pub struct ProgramSymbolsBuilder {
    types: Vec<TypeSymbol>,
    call_sites: Vec<CallSite>,
    next_id: u32,
}

impl ProgramSymbolsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> TypeId {
        let id = TypeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_enum(&mut self, decl: EnumDecl) -> TypeId {
        let id = self.allocate_id();
        self.types.push(TypeSymbol {
            id,
            name: decl.name,
            namespace: decl.namespace,
            kind: TypeKind::Enum {
                underlying: decl.underlying,
            },
            visibility: decl.visibility,
            attributes: decl.attributes,
            fields: decl.fields,
            location: decl.location,
        });
        id
    }

    /// A non-enum type symbol, e.g. the generated dispatch base as the host
    /// sees it once a previous generation round has been compiled in.
    pub fn add_other_type(&mut self, name: impl Into<String>, namespace: Option<&str>) -> TypeId {
        let id = self.allocate_id();
        self.types.push(TypeSymbol {
            id,
            name: name.into(),
            namespace: namespace.map(str::to_string),
            kind: TypeKind::Other,
            visibility: Visibility::Public,
            attributes: Vec::new(),
            fields: Vec::new(),
            location: SourceLocation::unknown(),
        });
        id
    }

    pub fn add_call_site(
        &mut self,
        operation: impl Into<String>,
        type_args: impl IntoIterator<Item = TypeId>,
    ) -> &mut Self {
        self.call_sites.push(CallSite {
            operation: operation.into(),
            type_args: type_args.into_iter().collect(),
            location: SourceLocation::unknown(),
        });
        self
    }

    pub fn add_call_site_at(
        &mut self,
        operation: impl Into<String>,
        type_args: impl IntoIterator<Item = TypeId>,
        location: SourceLocation,
    ) -> &mut Self {
        self.call_sites.push(CallSite {
            operation: operation.into(),
            type_args: type_args.into_iter().collect(),
            location,
        });
        self
    }

    pub fn finish(self) -> ProgramSymbols {
        ProgramSymbols::new(self.types, self.call_sites)
    }
}
