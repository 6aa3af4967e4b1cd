/*!
 * Timing reconciler.
 *
 * Enforces per-cue duration bounds on a provisional timeline and, for
 * heuristic timing with a known media duration, rescales the timeline to
 * track the media length.
 *
 * Heuristic timelines go through clamp, scale, then re-clamp. Re-clamping
 * after the scale can push the final cue past or short of the media end;
 * that residual drift is accepted. It is only reported when it exceeds
 * `RESIDUAL_DRIFT_TOLERANCE_SECS`.
 *
 * Aligned timelines are ground truth: only cues shorter than the minimum
 * are extended, never past the next cue's start.
 *
 * Even timelines already honor the duration window and pass through.
 */

use log::{debug, warn};

use crate::app_config::TimingConfig;
use crate::errors::SegmentationError;
use crate::segmentation::model::{Cue, Timeline};
use crate::segmentation::timing::{ProvisionalTimeline, TimingSource};

/// Drift between the final cue end and the media duration that is reported
/// as a warning rather than silently accepted.
pub const RESIDUAL_DRIFT_TOLERANCE_SECS: f64 = 0.5;

/// Applies duration bounds and drift correction.
#[derive(Debug, Clone)]
pub struct Reconciler<'a> {
    timing: &'a TimingConfig,
}

impl<'a> Reconciler<'a> {
    pub fn new(timing: &'a TimingConfig) -> Self {
        Self { timing }
    }

    /// Produce the final timeline.
    pub fn reconcile(&self, provisional: ProvisionalTimeline, total_duration: Option<f64>) -> Result<Timeline, SegmentationError> {
        let mut cues = provisional.cues;

        match provisional.source {
            TimingSource::Heuristic => self.reconcile_heuristic(&mut cues, total_duration),
            TimingSource::Aligned => self.reconcile_aligned(&mut cues, total_duration),
            TimingSource::Even => {}
        }

        self.check_degenerate(&cues)?;

        if let Some(total) = total_duration {
            self.report_drift(&cues, total, provisional.source);
        }

        Ok(Timeline::new(cues, total_duration))
    }

    fn reconcile_heuristic(&self, cues: &mut [Cue], total_duration: Option<f64>) {
        // Clamp provisional durations and re-chain from zero
        let mut cursor = 0.0;
        for cue in cues.iter_mut() {
            let duration = self.timing.clamp_duration(cue.duration());
            cue.start_time = cursor;
            cue.end_time = cursor + duration;
            cursor = cue.end_time;
        }

        let Some(total) = total_duration else {
            return;
        };
        if cursor <= 0.0 || total <= 0.0 {
            return;
        }

        let scale = total / cursor;
        debug!("Scaling heuristic timeline by {:.4} ({:.3}s -> {:.3}s)", scale, cursor, total);

        for cue in cues.iter_mut() {
            cue.start_time *= scale;
            cue.end_time *= scale;
        }

        // Re-clamp by moving ends only; a later cue never starts before the
        // adjusted end of the one before it
        let mut previous_end: Option<f64> = None;
        for cue in cues.iter_mut() {
            if let Some(prev) = previous_end {
                if cue.start_time < prev {
                    cue.start_time = prev;
                }
            }
            let duration = self.timing.clamp_duration(cue.duration());
            cue.end_time = cue.start_time + duration;
            previous_end = Some(cue.end_time);
        }
    }

    fn reconcile_aligned(&self, cues: &mut [Cue], total_duration: Option<f64>) {
        let min = self.timing.min_cue_duration;
        let mut extended = 0;

        for i in 0..cues.len() {
            if cues[i].duration() >= min {
                continue;
            }

            let mut target = cues[i].start_time + min;
            match cues.get(i + 1) {
                Some(next) => target = target.min(next.start_time),
                None => {
                    if let Some(total) = total_duration {
                        target = target.min(total);
                    }
                }
            }

            if target > cues[i].end_time {
                cues[i].end_time = target;
                extended += 1;
            }
        }

        for pair in cues.windows(2) {
            if pair[0].end_time > pair[1].start_time {
                warn!(
                    "Aligner timestamps overlap: cue ending at {:.3}s precedes cue starting at {:.3}s",
                    pair[0].end_time, pair[1].start_time
                );
            }
        }

        debug!("Extended {} aligned cue(s) toward the {}s minimum", extended, min);
    }

    // Aligned times are never fitted to the media, so their distance from it
    // is not drift
    fn report_drift(&self, cues: &[Cue], total: f64, source: TimingSource) {
        let span = cues.last().map_or(0.0, |c| c.end_time);
        let drift = span - total;

        match source {
            TimingSource::Aligned => debug!(
                "Aligned timeline ends at {:.3}s, media duration {:.3}s",
                span, total
            ),
            TimingSource::Heuristic | TimingSource::Even if drift.abs() > RESIDUAL_DRIFT_TOLERANCE_SECS => warn!(
                "Residual drift of {:+.3}s between last cue end ({:.3}s) and media duration ({:.3}s)",
                drift, span, total
            ),
            _ => {}
        }
    }

    fn check_degenerate(&self, cues: &[Cue]) -> Result<(), SegmentationError> {
        match cues.iter().position(|c| c.start_time >= c.end_time) {
            Some(i) => Err(SegmentationError::DegenerateCue {
                index: i + 1,
                start: cues[i].start_time,
                end: cues[i].end_time,
                min_cue_duration: self.timing.min_cue_duration,
                max_cue_duration: self.timing.max_cue_duration,
            }),
            None => Ok(()),
        }
    }
}
