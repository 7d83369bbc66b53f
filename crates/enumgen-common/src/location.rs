//! Source locations for diagnostics and declaration sites.

use serde::{Deserialize, Serialize};

/// A half-open byte range inside a named source file.
///
/// The pipeline never reads file contents; locations flow through from the
/// host's symbol information to diagnostics unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub start: u32,
    pub length: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, start: u32, length: u32) -> Self {
        Self {
            file: file.into(),
            start,
            length,
        }
    }

    /// Placeholder location for symbols the host did not attribute.
    pub fn unknown() -> Self {
        Self {
            file: "<unknown>".to_string(),
            start: 0,
            length: 0,
        }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::unknown()
    }
}
