//! Well-known identifiers shared across pipeline stages.
//!
//! The scanner needs the generated dispatch base's name to exclude it from
//! discovery, and the emitter needs the same name to declare it; keeping
//! both in one place avoids the two stages drifting apart.

/// Namespace every generated artifact is emitted into.
pub const GENERATED_NAMESPACE: &str = "EnumGenerated";

/// Public generic façade exposing every enum utility operation.
pub const FACADE_NAME: &str = "EnumUtility";

/// Abstract dispatch base parameterized by the enum type. Call sites bound
/// to this type are the generator's own forwarding calls and must never
/// trigger generation for it.
pub const DISPATCH_BASE_NAME: &str = "EnumDispatcher";

/// Static resolver emitted alongside the per-type subclasses.
pub const RESOLVER_NAME: &str = "EnumDispatchResolver";

/// Two-state iterator struct wrapping the flag-decomposition step.
pub const FLAGS_ENUMERATOR_NAME: &str = "FlagsEnumerator";

/// Declaration-level opt-in marker attribute (discovery channel B).
pub const OPT_IN_MARKER_ATTRIBUTE: &str = "EnumSupport";

/// Marker attribute designating an enum as a combinable bit-flags type.
pub const FLAGS_ATTRIBUTE: &str = "Flags";

/// Attribute carrying a serialization alias payload on an enum member.
pub const ALIAS_ATTRIBUTE: &str = "EnumAlias";

/// Qualified name of the dispatch base, as the scanner sees it.
pub fn dispatch_base_qualified() -> String {
    format!("{GENERATED_NAMESPACE}.{DISPATCH_BASE_NAME}")
}
