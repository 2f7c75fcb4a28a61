//! Unified error types for the pathbind workspace.
//!
//! Recoverable conditions are logged and resolved where they are detected;
//! these variants are what travels between the steps that make that call.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum PathbindError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A system call on a path failed.
    #[error("{path}: {source}")]
    Sys {
        /// Path handed to the failing call.
        path: PathBuf,
        /// Error number reported by the kernel.
        source: nix::errno::Errno,
    },

    /// A configuration value is invalid. Fatal before tracing starts.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A rewritten pathname would not fit within the pathname limit.
    #[error("pathname too long: {length} bytes (limit {max})")]
    NameTooLong {
        /// Length the rewritten path would have had.
        length: usize,
        /// Exclusive upper bound on pathname length.
        max: usize,
    },

    /// A binding tried to replace the whole guest root.
    #[error("can't create a binding in \"/\" (from {path})")]
    RootBinding {
        /// Guest path as it was requested.
        path: PathBuf,
    },

    /// Too many symbolic links were followed while canonicalizing.
    #[error("too many levels of symbolic links: {path}")]
    SymlinkLoop {
        /// Path being canonicalized.
        path: PathBuf,
    },

    /// The binding table was already finalized.
    #[error("bindings are already finalized")]
    AlreadyFinalized,

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl PathbindError {
    /// Builds an [`PathbindError::Sys`] from a path and an error number.
    #[must_use]
    pub fn sys(path: impl Into<PathBuf>, source: nix::errno::Errno) -> Self {
        Self::Sys {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PathbindError>;
