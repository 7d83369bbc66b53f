//! Symbol scanner: finds enumeration types worth generating for.
//!
//! Two independent discovery channels feed the registry:
//!
//! - **Channel A** walks the host's resolved call sites and keeps those
//!   whose operation name is in the fixed recognized set, yielding the
//!   first bound type argument of each.
//! - **Channel B** walks type declarations carrying the opt-in marker
//!   attribute, catching usages invisible to call-site scanning.
//!
//! Channel B results are appended after channel A during merge, so
//! diagnostics stemming from call-site usage take priority. Per the
//! recorded open-question decision, the marker channel is the mechanism
//! hosts should rely on; call-site scanning is a convenience that is
//! brittle to operation renames.

use tracing::{debug, trace};

use enumgen_common::names;
use enumgen_common::{CancellationToken, Cancelled};
use enumgen_symbols::{ProgramSymbols, TypeId};

pub mod registry;

/// Operation names that make a bound type argument "enum-worthy".
pub const RECOGNIZED_OPERATIONS: [&str; 12] = [
    "GetValues",
    "GetLength",
    "GetNames",
    "GetName",
    "IsDefined",
    "Parse",
    "TryParse",
    "ToStringFast",
    "GetAliasValue",
    "HasBitFlag",
    "AsFlags",
    "NextFlag",
];

pub fn is_recognized_operation(name: &str) -> bool {
    RECOGNIZED_OPERATIONS.contains(&name)
}

/// One qualifying call site: operation name plus the enum type it binds.
///
/// Ephemeral; produced lazily and consumed immediately by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSite<'a> {
    pub operation: &'a str,
    pub type_id: TypeId,
}

/// Channel A: lazy, order-preserving scan of qualifying call sites.
///
/// A call site with multiple type parameters always selects the first;
/// that convention is part of the recognized-operation surface. The
/// generated dispatch base itself is excluded so the generator's own
/// forwarding calls never trigger self-referential generation.
pub fn scan_call_sites(symbols: &ProgramSymbols) -> impl Iterator<Item = UsageSite<'_>> {
    let dispatch_base = names::dispatch_base_qualified();
    symbols.call_sites().iter().filter_map(move |site| {
        if !is_recognized_operation(&site.operation) {
            return None;
        }
        let &type_id = site.type_args.first()?;
        let symbol = symbols.type_symbol(type_id)?;
        if symbol.qualified_name() == dispatch_base {
            trace!(operation = %site.operation, "skipping dispatch base self-reference");
            return None;
        }
        if !symbol.is_enum() {
            return None;
        }
        trace!(operation = %site.operation, ty = %symbol.qualified_name(), "usage site");
        Some(UsageSite {
            operation: &site.operation,
            type_id,
        })
    })
}

/// Channel B: types explicitly opted in with the declaration-level marker.
pub fn scan_marked_types(symbols: &ProgramSymbols) -> impl Iterator<Item = TypeId> + '_ {
    symbols
        .marked_types(names::OPT_IN_MARKER_ATTRIBUTE)
        .filter(|ty| ty.is_enum())
        .map(|ty| ty.id)
}

/// Full discovery: both channels merged and deduplicated, observing the
/// cancellation token per scanned unit.
pub fn discover_enum_types(
    symbols: &ProgramSymbols,
    cancel: &CancellationToken,
) -> Result<Vec<TypeId>, Cancelled> {
    cancel.check()?;

    let mut channel_a = Vec::new();
    for site in scan_call_sites(symbols) {
        cancel.check()?;
        channel_a.push(site);
    }

    let mut channel_b = Vec::new();
    for type_id in scan_marked_types(symbols) {
        cancel.check()?;
        channel_b.push(type_id);
    }

    let distinct = registry::merge_distinct(channel_a.into_iter(), channel_b.into_iter());
    debug!(count = distinct.len(), "discovered distinct enum types");
    Ok(distinct)
}
