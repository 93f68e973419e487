/*!
 * Error types for the langtagger application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when probing a media file for audio streams
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The probing executable could not be found
    #[error("'{tool}' not found. Please install ffmpeg (which includes ffprobe) and ensure it is in your PATH")]
    ToolUnavailable {
        /// Program that was invoked
        tool: String,
    },

    /// The probing executable could not be run or exited with a failure
    #[error("{tool} error on {}: {message}", .path.display())]
    InvocationFailed {
        /// Program that was invoked
        tool: String,
        /// File being probed
        path: PathBuf,
        /// Exit status and stderr of the process
        message: String,
    },

    /// The probing executable did not finish in time
    #[error("{tool} timed out after {secs} seconds on {}", .path.display())]
    TimedOut {
        /// Program that was invoked
        tool: String,
        /// File being probed
        path: PathBuf,
        /// Timeout that elapsed
        secs: u64,
    },

    /// The output of the probing executable could not be parsed
    #[error("Could not parse ffprobe output for {}: {message}", .path.display())]
    MalformedOutput {
        /// File being probed
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

/// Errors that can occur while reading, merging or writing sidecar files
#[derive(Error, Debug)]
pub enum SidecarError {
    /// The sidecar content is not well-formed XML
    #[error("Malformed sidecar document: {0}")]
    Malformed(String),

    /// The sidecar exists but could not be read
    #[error("Failed to read sidecar {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sidecar could not be written
    #[error("Failed to write sidecar {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialized
    #[error("Failed to serialize sidecar document: {0}")]
    Serialize(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the media prober
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Error from sidecar handling
    #[error("Sidecar error: {0}")]
    Sidecar(#[from] SidecarError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
