//! Structured diagnostics reported by the pipeline.
//!
//! Diagnostics carry a stable numeric code, a severity category, and the
//! source location of the offending declaration. Reporting is non-fatal:
//! the pipeline emits the diagnostic and keeps processing remaining types.

use serde::{Deserialize, Serialize};

use crate::location::SourceLocation;

/// Category grouping every diagnostic this pipeline can produce.
pub const DIAGNOSTIC_GROUP: &str = "enum-codegen";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    /// Target enum type is not publicly accessible.
    pub const NON_PUBLIC_ENUM: u32 = 9001;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const NON_PUBLIC_ENUM: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::NON_PUBLIC_ENUM,
        category: DiagnosticCategory::Error,
        message: "Enum type '{0}' must be public to take part in enum utility generation.",
    };
}

const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[diagnostic_messages::NON_PUBLIC_ENUM];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub location: SourceLocation,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(location: SourceLocation, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            location,
            message_text: message.into(),
        }
    }

    /// All diagnostics from this pipeline share one reporting group.
    pub fn group(&self) -> &'static str {
        DIAGNOSTIC_GROUP
    }

    /// The one per-type recoverable condition: a non-public target enum.
    pub fn non_public_enum(location: SourceLocation, display_name: &str) -> Self {
        let template = diagnostic_messages::NON_PUBLIC_ENUM;
        Self::error(
            location,
            format_message(template.message, &[display_name]),
            template.code,
        )
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
