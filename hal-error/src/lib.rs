//! Unified error handling for switchhal
//!
//! One error type is shared by every switchhal crate. Most hardware access is
//! best-effort and never produces an error at all (a failed read is `None`, a
//! failed write is `false`); what remains here are construction-time
//! validation failures and discrete lookup misses that point at a broken
//! platform table.

use std::io;
use std::path::PathBuf;

/// Result type alias using HalError
pub type Result<T> = std::result::Result<T, HalError>;

/// Unified error type for all switchhal operations
#[derive(thiserror::Error, Debug)]
pub enum HalError {
    // ============================================================================
    // File System Errors
    // ============================================================================
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Discrete Value Mapping Errors
    // ============================================================================
    #[error("Value {value} read from {entry} has no mapping")]
    UnmappedValue {
        entry: String,
        value: String,
    },

    #[error("Color {color} has no mapping for {entry}")]
    UnmappedColor {
        entry: String,
        color: String,
    },

    #[error("Duplicate mapping: {0}")]
    DuplicateMapping(String),

    // ============================================================================
    // Construction and Configuration Errors
    // ============================================================================
    #[error("Invalid linear range {from:?} -> {to:?}")]
    InvalidRange {
        from: (i64, i64),
        to: (i64, i64),
    },

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl HalError {
    /// Create an invalid descriptor error from a string
    pub fn invalid_descriptor(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }

    /// True for errors that signal a platform table mismatch rather than a
    /// transient hardware condition.
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            Self::UnmappedValue { .. } | Self::UnmappedColor { .. } | Self::DuplicateMapping(_)
        )
    }
}
