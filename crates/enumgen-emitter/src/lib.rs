//! Emit layer of the enumgen pipeline.
//!
//! Transforms produce structured IR instead of strings; the printer walks
//! IR trees and emits generated source text. The dispatch module assembles
//! per-type implementations behind the abstract dispatch base and the
//! public generic façade.

pub mod ir;
pub use ir::{
    IrBody, IrConstructor, IrField, IrMember, IrMethod, IrNode, IrParam, IrProperty, IrSwitchArm,
    IrTypeDecl, IrTypeKind, IrUnit,
};

pub mod printer;
pub use printer::Printer;

pub mod artifact;
pub use artifact::GeneratedArtifact;

pub mod dispatch;
pub use dispatch::{
    DISPATCHERS_ARTIFACT_NAME, ROOT_ARTIFACT_NAME, SynthesizedEnum, dispatcher_class_name,
    emit_dispatch_root, emit_dispatchers,
};
