/*!
 * Segmentation and timing engine.
 *
 * Turns a transcript into timed cues in four strict stages:
 *
 * - `tokenizer`: raw text to words, with optional sentence boundaries
 * - `cue_builder`: words to fixed-size line/cue blocks
 * - `timing`: provisional cue times from alignment or reading speed
 * - `reconciler`: duration bounds and drift correction
 *
 * Every stage is a pure function of its input and the configuration.
 */

pub mod cue_builder;
pub mod model;
pub mod reconciler;
pub mod timing;
pub mod tokenizer;

// Re-export main types
pub use cue_builder::CueBuilder;
pub use model::{Cue, CueBlock, Line, Timeline, TimelineStats, TokenStream, Word};
pub use reconciler::{Reconciler, RESIDUAL_DRIFT_TOLERANCE_SECS};
pub use timing::{ProvisionalTimeline, TimingAllocator, TimingSource, TranscriptWords};
pub use tokenizer::Tokenizer;
