/*!
 * Error types for the srtsmith library.
 *
 * This module contains custom error types for the different stages of
 * subtitle generation, using the thiserror crate for ergonomic error
 * definitions. Every error is reported by the stage that detects it and no
 * partial timeline is ever returned alongside one.
 */

use thiserror::Error;

/// Errors raised by the segmentation and timing pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentationError {
    /// The transcript contained no words after normalization
    #[error("Transcript contains no words after tokenization")]
    EmptyInput,

    /// Aligned timing was requested but some words carry no timestamps
    #[error("Alignment is incomplete: {missing} word(s) lack timestamps (first at word index {first_missing_index})")]
    IncompleteAlignment {
        /// Number of words without a start/end pair
        missing: usize,
        /// Index of the first untimed word
        first_missing_index: usize,
    },

    /// A word carries a timestamp pair that cannot be used
    #[error("Malformed alignment at word index {index}: start {start}, end {end}")]
    MalformedAlignment {
        index: usize,
        start: f64,
        end: f64,
    },

    /// Duration bounds cannot be honored without overlapping cues
    #[error("Cue {index} is degenerate after clamping ({start:.3}s >= {end:.3}s) with bounds [{min_cue_duration}s, {max_cue_duration}s]; relax min_cue_duration")]
    DegenerateCue {
        /// 1-based cue index
        index: usize,
        start: f64,
        end: f64,
        min_cue_duration: f64,
        max_cue_duration: f64,
    },

    /// The supplied media duration is not a positive number of seconds
    #[error("Invalid total duration: {0}")]
    InvalidTotalDuration(f64),

    /// Even timing was requested without a media duration to spread over
    #[error("Even timing requires the media duration")]
    MissingTotalDuration,

    /// Aligned timestamps were supplied together with heuristic-only parameters
    #[error("Conflicting timing parameters: {0}")]
    ConflictingTimingParameters(String),
}

/// Errors raised while validating configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field holds a value outside its allowed range
    #[error("Invalid configuration value for '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading forced-aligner output
#[derive(Error, Debug)]
pub enum AlignmentError {
    /// The alignment file could not be read
    #[error("Failed to read alignment file: {0}")]
    Io(#[from] std::io::Error),

    /// The alignment document is not valid JSON or has an unexpected shape
    #[error("Failed to parse alignment data: {0}")]
    Parse(String),

    /// A fragment carries a timestamp that is not a number
    #[error("Invalid timestamp '{value}' in fragment {fragment}")]
    InvalidTimestamp {
        fragment: usize,
        value: String,
    },
}

/// Errors raised while probing media duration
#[derive(Error, Debug)]
pub enum MediaError {
    /// The media file does not exist
    #[error("Media file not found: {0}")]
    NotFound(String),

    /// ffprobe could not be executed
    #[error("Failed to execute ffprobe: {0}")]
    ProbeFailed(String),

    /// ffprobe did not answer in time
    #[error("ffprobe timed out after {0} seconds")]
    Timeout(u64),

    /// ffprobe answered but reported no usable duration
    #[error("No duration reported for media: {0}")]
    NoDuration(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the segmentation pipeline
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),

    /// Error from aligner input
    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    /// Error from media probing
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

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
