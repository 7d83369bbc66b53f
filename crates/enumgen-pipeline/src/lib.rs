//! End-to-end generation pipeline.
//!
//! Drives discovery, synthesis, and emission over one `ProgramSymbols`
//! snapshot. Three drivers share the same stages: `run_pipeline` runs
//! sequentially, `run_pipeline_parallel` fans synthesis out over rayon,
//! and `db::EnumGenDatabaseImpl` memoizes every stage through salsa for
//! incremental reruns.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use enumgen_common::{CancellationToken, Cancelled, Diagnostic};
use enumgen_emitter::{GeneratedArtifact, emit_dispatch_root, emit_dispatchers};
use enumgen_scanner::discover_enum_types;
use enumgen_symbols::{EnumTypeDescriptor, ProgramSymbols};
use enumgen_synth::{SynthOutcome, synthesize_enum};

pub mod db;

/// Everything one generation run hands back to the host: the generated
/// source artifacts plus the diagnostics raised along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub artifacts: Vec<GeneratedArtifact>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    pub fn artifact(&self, hint_name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.hint_name == hint_name)
    }
}

/// Run the full pipeline sequentially.
///
/// The root artifact is emitted unconditionally; a program with no
/// discovered enum types still yields a façade whose resolver knows no
/// dispatchers.
#[tracing::instrument(skip_all, fields(call_sites = symbols.call_sites().len()))]
pub fn run_pipeline(
    symbols: &ProgramSymbols,
    cancel: &CancellationToken,
) -> Result<GenerationOutput, Cancelled> {
    let distinct = discover_enum_types(symbols, cancel)?;
    let mut outcomes = Vec::with_capacity(distinct.len());
    for descriptor in descriptors(symbols, &distinct) {
        cancel.check()?;
        outcomes.push(synthesize_enum(&descriptor, cancel)?);
    }
    cancel.check()?;
    Ok(assemble_from_outcomes(outcomes))
}

/// Run the full pipeline with synthesis fanned out over the rayon pool.
///
/// Synthesis of different types shares no state, so the fan-out changes
/// only wall time; outcomes are collected back in discovery order and the
/// output is identical to the sequential driver's.
#[tracing::instrument(skip_all, fields(call_sites = symbols.call_sites().len()))]
pub fn run_pipeline_parallel(
    symbols: &ProgramSymbols,
    cancel: &CancellationToken,
) -> Result<GenerationOutput, Cancelled> {
    use rayon::prelude::*;

    let distinct = discover_enum_types(symbols, cancel)?;
    let descriptors: Vec<EnumTypeDescriptor> = descriptors(symbols, &distinct).collect();
    let outcomes = descriptors
        .par_iter()
        .map(|descriptor| synthesize_enum(descriptor, cancel))
        .collect::<Result<Vec<_>, _>>()?;
    cancel.check()?;
    Ok(assemble_from_outcomes(outcomes))
}

/// Descriptors for the discovered ids, in discovery order. Ids whose
/// symbol is no longer an enum in this snapshot are dropped.
fn descriptors<'a>(
    symbols: &'a ProgramSymbols,
    distinct: &'a [enumgen_symbols::TypeId],
) -> impl Iterator<Item = EnumTypeDescriptor> + 'a {
    distinct.iter().filter_map(|id| symbols.enum_descriptor(*id))
}

pub(crate) fn assemble_from_outcomes(outcomes: Vec<SynthOutcome>) -> GenerationOutput {
    let mut generated = Vec::new();
    let mut diagnostics = Vec::new();
    for outcome in outcomes {
        match outcome {
            SynthOutcome::Generated(synthesized) => generated.push(synthesized),
            SynthOutcome::Skipped(diagnostic) => {
                debug!(code = diagnostic.code, "recording synthesis diagnostic");
                diagnostics.push(diagnostic);
            }
        }
    }
    info!(
        dispatchers = generated.len(),
        diagnostics = diagnostics.len(),
        "assembling generation output"
    );
    GenerationOutput {
        artifacts: vec![emit_dispatch_root(), emit_dispatchers(&generated)],
        diagnostics,
    }
}
