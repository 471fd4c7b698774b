//! Structured error handling for the synthesis pipeline
//!
//! Every failure in the pipeline is unrecoverable at the point of detection:
//! the run either produces a complete track plus log, or neither. The enum
//! below is the whole taxonomy; there is no retry layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with SceneError
pub type Result<T> = std::result::Result<T, SceneError>;

/// Main error type for the synthesis pipeline
#[derive(Error, Debug)]
pub enum SceneError {
    /// Configuration errors (bad config file, bad credentials, bad output format)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Malformed or incomplete dialogue line; `line` is 1-based
    #[error("Line {line}: {message}")]
    Validation { message: String, line: usize },

    /// No voice mapping, no alias, and no fallback voice for a speaker
    #[error("No voice mapping found for speaker '{speaker}' and no fallback voice configured")]
    MissingVoice { speaker: String },

    /// The external speech engine canceled or failed
    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    /// A clip's wave format differs from the first clip's format
    #[error("Audio format mismatch at clip {index}: expected {expected}, found {actual}")]
    FormatMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    /// Concatenation was invoked with no clips
    #[error("No audio clips were provided for concatenation")]
    EmptyInput,

    /// Export was requested in a format the exporter does not implement
    #[error("Export format '{format}' is not supported. Use wav or mp3")]
    UnsupportedFormat { format: String },

    /// An input file is missing
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },
}

impl From<std::io::Error> for SceneError {
    fn from(err: std::io::Error) -> Self {
        SceneError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<hound::Error> for SceneError {
    fn from(err: hound::Error) -> Self {
        SceneError::Io {
            message: format!("wave processing failed: {err}"),
            path: None,
        }
    }
}
