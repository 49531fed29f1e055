//! Error types for table configuration.

use std::path::PathBuf;

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while building or configuring a table.
///
/// Layout and interaction never fail: malformed widths fall back to the
/// default width and operations on unknown row IDs are no-ops. Only
/// configuration is validated.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// JSON configuration could not be parsed.
    #[error("invalid JSON table configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("invalid TOML table configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Props could not be serialized to TOML.
    #[error("failed to serialize table configuration to TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Configuration file could not be read.
    #[error("failed to read table configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two leaf columns share a key.
    #[error("duplicate column key '{0}'")]
    DuplicateColumnKey(String),

    /// A column has an empty key.
    #[error("column with label '{label}' has an empty key")]
    EmptyColumnKey { label: String },

    /// The estimated row height is zero, negative or not finite.
    #[error("row height must be a positive number, got {0}")]
    InvalidRowHeight(f32),

    /// The overscan is larger than [`MAX_OVERSCAN`](crate::widget::virtualizer::MAX_OVERSCAN).
    #[error("overscan {0} exceeds the maximum of {max}", max = crate::widget::virtualizer::MAX_OVERSCAN)]
    InvalidOverscan(usize),
}

impl GridError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
