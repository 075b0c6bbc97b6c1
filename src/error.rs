//! Error types for contract violations in the form engine
//!
//! Validation failures are not errors: they are plain messages stored in the
//! error map. These variants cover writes and loads that cannot be expressed
//! against a value tree at all.

use thiserror::Error;

/// Result alias used by the path accessor and value loading
pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    /// A dotted key contained an empty segment (`"a..b"`, `".a"`, `""`)
    #[error("field key `{key}` has an empty path segment")]
    EmptySegment { key: String },

    /// A write tried to descend through a scalar value
    #[error("field key `{key}` descends through scalar value at `{segment}`")]
    NotAMapping { key: String, segment: String },

    /// Initial values could not be turned into a value tree
    #[error("invalid form values: {0}")]
    InvalidValues(#[from] serde_json::Error),
}
