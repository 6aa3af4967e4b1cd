/*!
 * Timing allocator.
 *
 * Assigns provisional start/end times to cue blocks, either from aligner
 * timestamps carried by the words, from a words-per-minute reading model,
 * or by spreading cues evenly over a known media duration. The resulting
 * provisional timeline is handed to the reconciler.
 */

use log::{debug, warn};

use crate::app_config::{TimingConfig, TimingMode};
use crate::errors::SegmentationError;
use crate::segmentation::model::{Cue, CueBlock, Word};

/// Which timestamp source produced a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSource {
    /// Times come from a forced aligner and reflect ground truth
    Aligned,
    /// Times are synthesized from reading speed
    Heuristic,
    /// Equal slots spread over the media duration
    Even,
}

// @const: Overlap between consecutive aligned words accepted as aligner rounding
const WORD_OVERLAP_TOLERANCE_SECS: f64 = 0.001;

// @const: Shortest slot even timing hands to a cue
pub const EVEN_MIN_SLOT_SECS: f64 = 2.0;

/// Transcript words tagged by the timestamp source they support.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptWords {
    /// Every word carries aligner timestamps
    Aligned(Vec<Word>),
    /// No word carries timestamps
    Unaligned(Vec<Word>),
}

impl TranscriptWords {
    /// Tag a word sequence, enforcing the configured timing mode.
    ///
    /// Aligned timestamps always take precedence; supplying them together
    /// with heuristic-only parameters is rejected. A partially aligned
    /// sequence is an error unless heuristic fallback was explicitly
    /// allowed, in which case all timestamps are discarded.
    pub fn classify(words: Vec<Word>, timing: &TimingConfig) -> Result<Self, SegmentationError> {
        if words.is_empty() {
            return Err(SegmentationError::EmptyInput);
        }

        if timing.mode == TimingMode::Even {
            if let Some(wpm) = timing.reading_speed_wpm {
                return Err(SegmentationError::ConflictingTimingParameters(format!(
                    "reading_speed_wpm={} has no effect on even timing; remove it",
                    wpm
                )));
            }
        }

        let missing: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_timed())
            .map(|(i, _)| i)
            .collect();

        if missing.is_empty() {
            if matches!(timing.mode, TimingMode::Heuristic | TimingMode::Even) {
                return Err(SegmentationError::ConflictingTimingParameters(format!(
                    "{} timing mode requested but every word carries aligner timestamps",
                    timing.mode
                )));
            }
            if let Some(wpm) = timing.reading_speed_wpm {
                return Err(SegmentationError::ConflictingTimingParameters(format!(
                    "reading_speed_wpm={} has no effect on aligned timestamps; remove it",
                    wpm
                )));
            }
            validate_timestamps(&words)?;
            return Ok(Self::Aligned(words));
        }

        let fully_unaligned = missing.len() == words.len();

        if fully_unaligned && timing.mode != TimingMode::Aligned {
            return Ok(Self::Unaligned(words));
        }

        let incomplete = SegmentationError::IncompleteAlignment {
            missing: missing.len(),
            first_missing_index: missing[0],
        };

        if fully_unaligned {
            return Err(incomplete);
        }

        if timing.allow_heuristic_fallback && timing.mode != TimingMode::Aligned {
            warn!(
                "Discarding partial alignment ({} of {} words untimed), falling back to heuristic timing",
                missing.len(),
                words.len()
            );
            return Ok(Self::Unaligned(words.iter().map(Word::without_timing).collect()));
        }

        Err(incomplete)
    }

    pub fn words(&self) -> &[Word] {
        match self {
            Self::Aligned(words) | Self::Unaligned(words) => words,
        }
    }

    pub fn into_words(self) -> Vec<Word> {
        match self {
            Self::Aligned(words) | Self::Unaligned(words) => words,
        }
    }

    /// Timing source for these words under the configured mode.
    pub fn source(&self, mode: TimingMode) -> TimingSource {
        match (self, mode) {
            (Self::Aligned(_), _) => TimingSource::Aligned,
            (Self::Unaligned(_), TimingMode::Even) => TimingSource::Even,
            (Self::Unaligned(_), _) => TimingSource::Heuristic,
        }
    }
}

/// Each pair must be finite, non-negative and forward, and no word may start
/// before the previous word ends.
fn validate_timestamps(words: &[Word]) -> Result<(), SegmentationError> {
    let mut previous_end: Option<f64> = None;

    for (index, word) in words.iter().enumerate() {
        let (Some(start), Some(end)) = (word.start_time, word.end_time) else {
            continue;
        };
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end < start {
            return Err(SegmentationError::MalformedAlignment { index, start, end });
        }
        if let Some(prev) = previous_end {
            if start < prev - WORD_OVERLAP_TOLERANCE_SECS {
                debug!("Word {} starts at {:.3}s, before the previous word ends at {:.3}s", index, start, prev);
                return Err(SegmentationError::MalformedAlignment { index, start, end });
            }
        }
        previous_end = Some(end);
    }

    Ok(())
}

/// Cues with provisional timing and the source that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionalTimeline {
    pub source: TimingSource,
    pub cues: Vec<Cue>,
}

/// Assigns provisional times to cue blocks.
#[derive(Debug, Clone)]
pub struct TimingAllocator<'a> {
    timing: &'a TimingConfig,
}

impl<'a> TimingAllocator<'a> {
    pub fn new(timing: &'a TimingConfig) -> Self {
        Self { timing }
    }

    /// Allocate times for blocks built from words of the given source.
    ///
    /// Even timing needs the media duration; the other sources ignore it here.
    pub fn allocate(
        &self,
        blocks: Vec<CueBlock>,
        source: TimingSource,
        total_duration: Option<f64>,
    ) -> Result<ProvisionalTimeline, SegmentationError> {
        if blocks.is_empty() {
            return Err(SegmentationError::EmptyInput);
        }

        let cues = match source {
            TimingSource::Aligned => Self::allocate_aligned(blocks)?,
            TimingSource::Heuristic => self.allocate_heuristic(blocks),
            TimingSource::Even => {
                let total = total_duration.ok_or(SegmentationError::MissingTotalDuration)?;
                self.allocate_even(blocks, total)
            }
        };

        Ok(ProvisionalTimeline { source, cues })
    }

    /// Cue spans run from the first word's start to the last word's end.
    fn allocate_aligned(blocks: Vec<CueBlock>) -> Result<Vec<Cue>, SegmentationError> {
        let untimed: Vec<usize> = blocks
            .iter()
            .flat_map(|b| b.words())
            .enumerate()
            .filter(|(_, w)| !w.is_timed())
            .map(|(i, _)| i)
            .collect();

        if let Some(&first_missing_index) = untimed.first() {
            return Err(SegmentationError::IncompleteAlignment {
                missing: untimed.len(),
                first_missing_index,
            });
        }

        let mut cues = Vec::with_capacity(blocks.len());
        for block in blocks {
            let start = block.first_word().and_then(|w| w.start_time);
            let end = block.last_word().and_then(|w| w.end_time);
            let (Some(start), Some(end)) = (start, end) else {
                return Err(SegmentationError::EmptyInput);
            };
            cues.push(Cue::from_block(block, start, end));
        }

        debug!("Allocated {} cue(s) from aligner timestamps", cues.len());
        Ok(cues)
    }

    /// Consecutive cues sized by word count at the configured reading speed.
    fn allocate_heuristic(&self, blocks: Vec<CueBlock>) -> Vec<Cue> {
        let wpm = self.timing.effective_wpm();
        let seconds_per_word = 60.0 / wpm;

        let mut cursor = 0.0;
        let cues: Vec<Cue> = blocks
            .into_iter()
            .map(|block| {
                let start = cursor;
                let end = start + block.word_count() as f64 * seconds_per_word;
                cursor = end;
                Cue::from_block(block, start, end)
            })
            .collect();

        debug!(
            "Allocated {} cue(s) heuristically at {} WPM ({:.3}s per word, provisional span {:.3}s)",
            cues.len(),
            wpm,
            seconds_per_word,
            cursor
        );

        cues
    }

    /// Equal slots of `total / blocks`, never shorter than `EVEN_MIN_SLOT_SECS`
    /// or the minimum cue duration. Cues fill their slot up to the maximum
    /// duration; the last cue of an unfloored timeline ends on `total`.
    fn allocate_even(&self, blocks: Vec<CueBlock>, total: f64) -> Vec<Cue> {
        let count = blocks.len();
        let fitted = total / count as f64;
        let slot = fitted.max(EVEN_MIN_SLOT_SECS).max(self.timing.min_cue_duration);
        let duration = slot.min(self.timing.max_cue_duration);
        let reaches_end = slot == fitted && duration == slot;

        let cues: Vec<Cue> = blocks
            .into_iter()
            .enumerate()
            .map(|(i, block)| {
                let start = i as f64 * slot;
                let end = if reaches_end && i + 1 == count {
                    total
                } else {
                    start + duration
                };
                Cue::from_block(block, start, end)
            })
            .collect();

        debug!(
            "Allocated {} cue(s) evenly: {:.3}s slots, {:.3}s cues over {:.3}s",
            count, slot, duration, total
        );

        cues
    }
}
