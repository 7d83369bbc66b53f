//! Incremental enum-metadata code generation.
//!
//! `enumgen` scans a program's symbol information for uses of the generic
//! enum utility operations, discovers the enum types bound to them,
//! synthesizes reflection-free per-type implementations, and emits them
//! behind a generic dispatch façade. Hosts feed a [`ProgramSymbols`]
//! snapshot in and get source artifacts plus diagnostics back; nothing
//! here touches the filesystem.
//!
//! The one-shot drivers live in [`pipeline`]; [`pipeline::db`] wraps the
//! same stages in a salsa database for incremental reruns.
//!
//! ```
//! use enumgen::symbols::{EnumDecl, ProgramSymbolsBuilder};
//! use enumgen::{CancellationToken, run_pipeline};
//!
//! let mut builder = ProgramSymbolsBuilder::new();
//! let color = builder.add_enum(
//!     EnumDecl::new("Color").namespace("app").member("Red", 0),
//! );
//! builder.add_call_site("GetName", [color]);
//!
//! let output = run_pipeline(&builder.finish(), &CancellationToken::new())?;
//! assert_eq!(output.artifacts.len(), 2);
//! # Ok::<(), enumgen::Cancelled>(())
//! ```

pub use enumgen_common as common;
pub use enumgen_emitter as emitter;
pub use enumgen_pipeline as pipeline;
pub use enumgen_scanner as scanner;
pub use enumgen_symbols as symbols;
pub use enumgen_synth as synth;

pub use enumgen_common::{CancellationToken, Cancelled, Diagnostic, SourceLocation};
pub use enumgen_emitter::GeneratedArtifact;
pub use enumgen_pipeline::db::{EnumGenDatabase, EnumGenDatabaseImpl};
pub use enumgen_pipeline::{GenerationOutput, run_pipeline, run_pipeline_parallel};
pub use enumgen_symbols::{ProgramSymbols, TypeId};
