//! Unified error types for the contrail workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ContrailError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// A notification carried a lifecycle phase tag outside the known set.
    ///
    /// This is a contract violation between the event source and the
    /// translator. Callers decide whether to abort the stream or skip.
    #[error("unrecognized container phase tag: {tag:?}")]
    UnrecognizedPhase {
        /// The offending tag as received.
        tag: String,
    },

    /// Enumerating existing containers for the metadata cache failed.
    #[error("metadata cache bootstrap failed: {message}")]
    Bootstrap {
        /// Description of the enumeration failure.
        message: String,
    },

    /// The other end of a pipeline channel went away.
    #[error("pipeline channel closed")]
    ChannelClosed,
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ContrailError>;
