/*!
 * Subtitle output for generated timelines.
 *
 * - `timecode`: seconds to `HH:MM:SS,mmm`
 * - `srt`: SRT document rendering
 * - `validation`: timeline invariant checks
 */

pub mod srt;
pub mod timecode;
pub mod validation;

// Re-export main types
pub use srt::{to_srt_string, write_srt, SrtEntry};
pub use timecode::format_timestamp;
pub use validation::{TimelineIssue, TimelineValidator, TimelineValidatorConfig};
