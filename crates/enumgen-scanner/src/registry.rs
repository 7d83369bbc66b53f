//! Registry/deduplicator: merges the two discovery channels.
//!
//! `union(channelA, channelB)` with identity-based equality. First
//! insertion wins, so the output order is the first-discovery order and is
//! stable across unchanged inputs; nothing here depends on hash iteration
//! order.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use enumgen_symbols::TypeId;

use crate::UsageSite;

/// Ordered, duplicate-free union of both channels.
pub fn merge_distinct<'a>(
    channel_a: impl Iterator<Item = UsageSite<'a>>,
    channel_b: impl Iterator<Item = TypeId>,
) -> Vec<TypeId> {
    let mut distinct: IndexSet<TypeId, FxBuildHasher> = IndexSet::default();
    for site in channel_a {
        distinct.insert(site.type_id);
    }
    for type_id in channel_b {
        distinct.insert(type_id);
    }
    distinct.into_iter().collect()
}
