/*!
 * Timeline validation for generated cues.
 *
 * This module checks that a timeline is:
 * - Logically consistent (start < end)
 * - Within the configured duration bounds
 * - Non-overlapping between cues
 * - Within the known media duration
 * - Within the configured line and word limits
 */

use log::debug;

use crate::app_config::Config;
use crate::segmentation::model::{Cue, Timeline};
use crate::segmentation::reconciler::RESIDUAL_DRIFT_TOLERANCE_SECS;

/// Float comparison slack in seconds
const EPSILON_SECS: f64 = 1e-9;

/// Result of validation for a single cue
#[derive(Debug, Clone)]
pub struct CueCheckResult {
    /// Sequence number of the cue (1-based)
    pub seq_num: usize,
    /// Whether the cue passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimelineIssue>,
}

impl CueCheckResult {
    /// Create a passing result
    pub fn passed(seq_num: usize) -> Self {
        Self {
            seq_num,
            passed: true,
            issues: vec![],
        }
    }

    /// Create a failing result
    pub fn failed(seq_num: usize, issues: Vec<TimelineIssue>) -> Self {
        Self {
            seq_num,
            passed: false,
            issues,
        }
    }
}

/// Types of timeline issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineIssue {
    /// Start time is not before end time
    InvalidTimeRange {
        start: f64,
        end: f64,
    },
    /// Duration is too short
    DurationTooShort {
        duration: f64,
        min_duration: f64,
    },
    /// Duration is too long
    DurationTooLong {
        duration: f64,
        max_duration: f64,
    },
    /// Overlaps with the previous cue
    OverlapsWithCue {
        other_seq_num: usize,
        overlap: f64,
    },
    /// Ends after the media does
    ExceedsMediaDuration {
        end: f64,
        total_duration: f64,
    },
    /// More lines than the layout allows
    TooManyLines {
        lines: usize,
        max_lines: usize,
    },
    /// A line holds more words than the layout allows
    LineTooLong {
        line: usize,
        words: usize,
        max_words: usize,
    },
}

impl std::fmt::Display for TimelineIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: start {:.3}s >= end {:.3}s", start, end)
            }
            TimelineIssue::DurationTooShort { duration, min_duration } => {
                write!(f, "Duration too short: {:.3}s (min: {:.3}s)", duration, min_duration)
            }
            TimelineIssue::DurationTooLong { duration, max_duration } => {
                write!(f, "Duration too long: {:.3}s (max: {:.3}s)", duration, max_duration)
            }
            TimelineIssue::OverlapsWithCue { other_seq_num, overlap } => {
                write!(f, "Overlaps with cue {} by {:.3}s", other_seq_num, overlap)
            }
            TimelineIssue::ExceedsMediaDuration { end, total_duration } => {
                write!(f, "Ends at {:.3}s, after media end {:.3}s", end, total_duration)
            }
            TimelineIssue::TooManyLines { lines, max_lines } => {
                write!(f, "Too many lines: {} (max: {})", lines, max_lines)
            }
            TimelineIssue::LineTooLong { line, words, max_words } => {
                write!(f, "Line {} has {} words (max: {})", line, words, max_words)
            }
        }
    }
}

/// Result of validating a whole timeline
#[derive(Debug, Clone)]
pub struct TimelineValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each cue
    pub cue_results: Vec<CueCheckResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of overlapping cue pairs
    pub overlap_count: usize,
}

impl TimelineValidationResult {
    /// Get all failed cues
    pub fn failed_cues(&self) -> Vec<&CueCheckResult> {
        self.cue_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Configuration for timeline validation
#[derive(Debug, Clone)]
pub struct TimelineValidatorConfig {
    /// Minimum cue duration in seconds
    pub min_duration: f64,
    /// Maximum cue duration in seconds
    pub max_duration: f64,
    /// Maximum words per line
    pub words_per_line: usize,
    /// Maximum lines per cue
    pub lines_per_cue: usize,
    /// Whether to check for overlaps
    pub check_overlaps: bool,
    /// Allowed overshoot of the media duration in seconds
    pub media_tolerance: f64,
}

impl Default for TimelineValidatorConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl TimelineValidatorConfig {
    /// Derive validator limits from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_duration: config.timing.min_cue_duration,
            max_duration: config.timing.max_cue_duration,
            words_per_line: config.layout.words_per_line,
            lines_per_cue: config.layout.lines_per_cue,
            check_overlaps: true,
            media_tolerance: RESIDUAL_DRIFT_TOLERANCE_SECS,
        }
    }
}

/// Validator for generated timelines
pub struct TimelineValidator {
    config: TimelineValidatorConfig,
}

impl Default for TimelineValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: TimelineValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimelineValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single cue
    pub fn validate_cue(&self, seq_num: usize, cue: &Cue) -> CueCheckResult {
        let mut issues = Vec::new();

        if cue.lines.len() > self.config.lines_per_cue {
            issues.push(TimelineIssue::TooManyLines {
                lines: cue.lines.len(),
                max_lines: self.config.lines_per_cue,
            });
        }

        for (i, line) in cue.lines.iter().enumerate() {
            if line.len() > self.config.words_per_line {
                issues.push(TimelineIssue::LineTooLong {
                    line: i + 1,
                    words: line.len(),
                    max_words: self.config.words_per_line,
                });
            }
        }

        if cue.end_time <= cue.start_time {
            issues.push(TimelineIssue::InvalidTimeRange {
                start: cue.start_time,
                end: cue.end_time,
            });
            // Can't do further validation with invalid times
            return CueCheckResult::failed(seq_num, issues);
        }

        let duration = cue.duration();

        if duration < self.config.min_duration - EPSILON_SECS {
            issues.push(TimelineIssue::DurationTooShort {
                duration,
                min_duration: self.config.min_duration,
            });
        }

        if duration > self.config.max_duration + EPSILON_SECS {
            issues.push(TimelineIssue::DurationTooLong {
                duration,
                max_duration: self.config.max_duration,
            });
        }

        if issues.is_empty() {
            CueCheckResult::passed(seq_num)
        } else {
            CueCheckResult::failed(seq_num, issues)
        }
    }

    /// Validate every cue of a timeline
    pub fn validate_timeline(&self, timeline: &Timeline) -> TimelineValidationResult {
        if timeline.is_empty() {
            return TimelineValidationResult {
                passed: true,
                cue_results: vec![],
                total_issues: 0,
                overlap_count: 0,
            };
        }

        let mut cue_results: Vec<CueCheckResult> = timeline
            .cues
            .iter()
            .enumerate()
            .map(|(i, cue)| self.validate_cue(i + 1, cue))
            .collect();

        let mut overlap_count = 0;

        if self.config.check_overlaps {
            for i in 1..timeline.cues.len() {
                let previous = &timeline.cues[i - 1];
                let current = &timeline.cues[i];

                if previous.end_time > current.start_time + EPSILON_SECS {
                    overlap_count += 1;
                    let result = &mut cue_results[i];
                    result.issues.push(TimelineIssue::OverlapsWithCue {
                        other_seq_num: i,
                        overlap: previous.end_time - current.start_time,
                    });
                    result.passed = false;
                }
            }
        }

        if let (Some(total), Some(last)) = (timeline.total_duration, timeline.cues.last()) {
            if last.end_time > total + self.config.media_tolerance {
                if let Some(result) = cue_results.last_mut() {
                    result.issues.push(TimelineIssue::ExceedsMediaDuration {
                        end: last.end_time,
                        total_duration: total,
                    });
                    result.passed = false;
                }
            }
        }

        let total_issues: usize = cue_results.iter().map(|r| r.issues.len()).sum();
        let passed = total_issues == 0;

        debug!(
            "Timeline validation: {} cues, {} issues, {} overlaps",
            timeline.len(),
            total_issues,
            overlap_count
        );

        TimelineValidationResult {
            passed,
            cue_results,
            total_issues,
            overlap_count,
        }
    }
}
