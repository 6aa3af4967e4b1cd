/*!
 * # srtsmith - Transcript to SRT subtitle generator
 *
 * A Rust library that turns transcripts into subtitle cues laid out to fixed
 * presentation rules and synchronized to the associated media.
 *
 * ## Features
 *
 * - Word/line/cue layout with configurable limits
 * - Two timing sources:
 *   - Forced-aligner word timestamps (word list or fragment sync map)
 *   - Reading-speed model normalized against the media duration
 * - Duration bounds and drift reconciliation
 * - Optional sentence-aware cue breaks with per-language abbreviations
 * - Media duration probing through ffprobe
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmentation`: The segmentation and timing engine:
 *   - `segmentation::tokenizer`: Text to words
 *   - `segmentation::cue_builder`: Words to line/cue blocks
 *   - `segmentation::timing`: Provisional cue timing
 *   - `segmentation::reconciler`: Duration bounds and drift correction
 * - `subtitle`: Timecodes, SRT rendering and timeline validation
 * - `generator`: Pipeline entry point for programmatic callers
 * - `alignment`: Forced-aligner output loading
 * - `media`: Media duration probing
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod alignment;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod generator;
pub mod language_utils;
pub mod media;
pub mod segmentation;
pub mod subtitle;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use generator::{GeneratedSubtitles, SubtitleGenerator};
pub use segmentation::{Cue, Line, Timeline, Word};
pub use language_utils::{normalize_to_part1_or_part2t, validate_language_code};
pub use errors::{AlignmentError, AppError, ConfigError, MediaError, SegmentationError};
