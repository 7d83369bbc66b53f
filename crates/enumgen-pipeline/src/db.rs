//! Salsa-based query database for incremental generation.
//!
//! The program symbol snapshot is the single salsa input; discovery,
//! per-type synthesis, and final assembly are memoized queries layered on
//! top of it. When the host swaps in an updated snapshot, salsa backdates
//! unchanged intermediate results, so an edit that leaves a type's
//! descriptor identical does not re-synthesize that type.
//!
//! Queries run inside salsa's pure-function model and therefore observe no
//! external cancellation token; salsa's own unwind-based cancellation
//! applies instead. Hosts that need cooperative cancellation use the
//! `run_pipeline` drivers directly.

use std::sync::Arc;

use enumgen_common::CancellationToken;
use enumgen_scanner::discover_enum_types;
use enumgen_symbols::{EnumTypeDescriptor, ProgramSymbols, TypeId};
use enumgen_synth::{SynthOutcome, synthesize_enum};

use crate::{GenerationOutput, assemble_from_outcomes};

/// The salsa query group for the generation pipeline.
#[salsa::query_group(EnumGenStorage)]
pub trait EnumGenDatabase: salsa::Database {
    /// The current program symbol snapshot (input).
    #[salsa::input]
    fn program_symbols(&self) -> Arc<ProgramSymbols>;

    /// Distinct discovered enum types, in discovery order (memoized).
    fn distinct_enum_types(&self) -> Arc<[TypeId]>;

    /// Descriptor for one type id, `None` when the id does not name an
    /// enum in the current snapshot (memoized).
    fn enum_descriptor_query(&self, id: TypeId) -> Option<Arc<EnumTypeDescriptor>>;

    /// Synthesis outcome for one discovered type (memoized).
    fn synthesized_enum_query(&self, id: TypeId) -> Option<Arc<SynthOutcome>>;

    /// Full generation output for the current snapshot (memoized).
    fn generation_output(&self) -> Arc<GenerationOutput>;
}

// =============================================================================
// Query implementations
// =============================================================================

fn distinct_enum_types(db: &dyn EnumGenDatabase) -> Arc<[TypeId]> {
    let symbols = db.program_symbols();
    // The token is never cancelled inside a query, so discovery cannot fail.
    discover_enum_types(&symbols, &CancellationToken::new())
        .unwrap_or_default()
        .into()
}

fn enum_descriptor_query(db: &dyn EnumGenDatabase, id: TypeId) -> Option<Arc<EnumTypeDescriptor>> {
    db.program_symbols().enum_descriptor(id).map(Arc::new)
}

fn synthesized_enum_query(db: &dyn EnumGenDatabase, id: TypeId) -> Option<Arc<SynthOutcome>> {
    let descriptor = db.enum_descriptor_query(id)?;
    synthesize_enum(&descriptor, &CancellationToken::new())
        .ok()
        .map(Arc::new)
}

fn generation_output(db: &dyn EnumGenDatabase) -> Arc<GenerationOutput> {
    let ids = db.distinct_enum_types();
    let outcomes = ids
        .iter()
        .filter_map(|id| db.synthesized_enum_query(*id))
        .map(|outcome| outcome.as_ref().clone())
        .collect();
    Arc::new(assemble_from_outcomes(outcomes))
}

/// Concrete salsa database for the generation pipeline.
#[salsa::database(EnumGenStorage)]
pub struct EnumGenDatabaseImpl {
    storage: salsa::Storage<EnumGenDatabaseImpl>,
}

impl EnumGenDatabaseImpl {
    pub fn new(symbols: Arc<ProgramSymbols>) -> Self {
        let mut db = EnumGenDatabaseImpl {
            storage: Default::default(),
        };
        db.set_program_symbols(symbols);
        db
    }

    /// Swap in an updated snapshot; memoized results whose inputs did not
    /// change are reused on the next query.
    pub fn update_symbols(&mut self, symbols: Arc<ProgramSymbols>) {
        self.set_program_symbols(symbols);
    }
}

impl salsa::Database for EnumGenDatabaseImpl {}
