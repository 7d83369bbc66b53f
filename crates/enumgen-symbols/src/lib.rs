//! Host-facing program symbol model.
//!
//! The pipeline does not parse source itself; the host supplies an
//! already-resident, in-memory view over its parsed program. This crate
//! defines that view (`ProgramSymbols`), the identities flowing through the
//! pipeline (`TypeId`), and the typed descriptor (`EnumTypeDescriptor`)
//! built once during analysis so generated code never inspects metadata at
//! runtime.
//!
//! The attribute-recognition and constant-folding facilities the rest of
//! the pipeline consumes live here: `ProgramSymbols::enum_descriptor` folds
//! field constants and recognizes the flags marker and alias payloads.

pub mod descriptor;
pub use descriptor::{EnumMember, EnumTypeDescriptor, UnderlyingKind, Visibility};

pub mod program;
pub use program::{
    AttributeData, CallSite, FieldSymbol, ProgramSymbols, TypeId, TypeKind, TypeSymbol,
};

pub mod builder;
pub use builder::{EnumDecl, ProgramSymbolsBuilder};
