//! Error types for the tidynotes application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur while organizing notes and folders.
//!
//! A lookup miss is deliberately *not* an error anywhere in the core:
//! operations targeting an absent id degrade to a silent no-op.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the tidynotes application.
#[derive(Error, Debug)]
pub enum TidyError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An import envelope carried a version this build does not understand.
    #[error("Unsupported envelope version: {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// An import envelope was structurally invalid.
    #[error("Invalid envelope: {message}")]
    InvalidEnvelope { message: String },

    /// The data directory could not be created or accessed.
    #[error("Failed to create or access data directory: {path}")]
    DataDirError { path: PathBuf },

    /// Errors from launching or running the external editor.
    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
