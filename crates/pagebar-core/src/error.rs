//! Error types for Pagebar.

use thiserror::Error;

/// A shared error type for the sidebar store, resolver and pipeline.
///
/// Validation failures (`InvalidName`, `DuplicateSidebar`) are recoverable and
/// leave the previously persisted store untouched. `NoActivePage` is a
/// precondition violation by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PagebarError {
    /// Sidebar name was empty or blank
    #[error("Invalid sidebar name: {0:?}")]
    InvalidName(String),

    /// Resolver invoked without a viewed page
    #[error("No active page: the resolver needs a viewed page context")]
    NoActivePage,

    /// A stored definition has neither `pages` nor `locations`
    #[error("Malformed legacy sidebar record '{id}': no pages or locations")]
    MalformedLegacyRecord { id: String },

    /// Two entries in one snapshot share an id
    #[error("Duplicate sidebar id '{0}'")]
    DuplicateSidebar(String),

    /// Every numeric suffix has been handed out
    #[error("Sidebar id counter exhausted at {0}")]
    CounterExhausted(u64),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PagebarError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a submission-time validation rejection.
    ///
    /// Callers re-prompt on these instead of treating them as failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidName(_) | Self::DuplicateSidebar(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PagebarError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for PagebarError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PagebarError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PagebarError>`.
pub type Result<T> = std::result::Result<T, PagebarError>;
