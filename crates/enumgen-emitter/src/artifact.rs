//! Named in-memory source artifacts handed back to the host.

use serde::{Deserialize, Serialize};

/// One generated source file: a stable identifier plus its full text.
///
/// Artifacts are compiled alongside the original program by the host; the
/// pipeline never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub hint_name: String,
    pub text: String,
}

impl GeneratedArtifact {
    pub fn new(hint_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            hint_name: hint_name.into(),
            text: text.into(),
        }
    }
}
