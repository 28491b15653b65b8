//! Error types for mock generation and reconciliation

use thiserror::Error;

/// Zone of a variation a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Primary,
    Items,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Primary => write!(f, "primary"),
            Zone::Items => write!(f, "items"),
        }
    }
}

/// Errors that can occur while building mock content
#[derive(Debug, Error)]
pub enum MockError {
    /// No generator exists for the field's declared kind
    #[error("Unsupported field kind '{kind}' for field '{field}'")]
    UnsupportedFieldKind { field: String, kind: String },

    /// A configured override does not fit the field it targets
    #[error("Malformed override for '{variation}.{zone}.{field}': {reason}")]
    MalformedOverride {
        variation: String,
        zone: Zone,
        field: String,
        reason: String,
    },
}

/// Result type alias for mock operations
pub type MockResult<T> = Result<T, MockError>;
