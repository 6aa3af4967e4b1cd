use log::{debug, warn};

use crate::app_config::{Config, GroupingPolicy};
use crate::errors::{ConfigError, SegmentationError};
use crate::segmentation::{
    CueBuilder, Reconciler, Timeline, TimingAllocator, TimingSource, TokenStream, Tokenizer,
    TranscriptWords, Word,
};
use crate::subtitle::srt;
use crate::subtitle::validation::{TimelineValidator, TimelineValidatorConfig};

// @module: Subtitle generation pipeline

/// Output of one generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSubtitles {
    // @field: Final cue timeline
    pub timeline: Timeline,

    // @field: Rendered SRT document
    pub srt: String,

    // @field: Where cue times came from
    pub source: TimingSource,
}

/// Runs tokenizer, cue builder, timing allocator, reconciler and serializer
/// for one document at a time.
///
/// The generator holds only an immutable configuration, so a single
/// instance can serve independent requests from several threads.
#[derive(Debug, Clone)]
pub struct SubtitleGenerator {
    // @field: Validated configuration
    config: Config,
}

impl SubtitleGenerator {
    // @method: Create a generator, validating the configuration first
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate subtitles from free transcript text.
    pub fn generate_from_text(&self, text: &str, total_duration: Option<f64>) -> Result<GeneratedSubtitles, SegmentationError> {
        let stream = self.tokenizer().tokenize(text)?;
        self.classify_and_run(stream, total_duration)
    }

    /// Generate subtitles from a sentence stream produced by a text extractor.
    pub fn generate_from_sentences<S: AsRef<str>>(&self, sentences: &[S], total_duration: Option<f64>) -> Result<GeneratedSubtitles, SegmentationError> {
        let stream = self.tokenizer().tokenize_sentences(sentences)?;
        self.classify_and_run(stream, total_duration)
    }

    /// Generate subtitles from words that may carry aligner timestamps.
    pub fn generate_from_words(&self, words: Vec<Word>, total_duration: Option<f64>) -> Result<GeneratedSubtitles, SegmentationError> {
        let stream = self.tokenizer().annotate(words)?;
        self.classify_and_run(stream, total_duration)
    }

    fn tokenizer(&self) -> Tokenizer {
        let sentence_aware = self.config.layout.grouping == GroupingPolicy::Sentence;
        Tokenizer::new(&self.config.language, sentence_aware)
    }

    fn classify_and_run(&self, stream: TokenStream, total_duration: Option<f64>) -> Result<GeneratedSubtitles, SegmentationError> {
        if let Some(total) = total_duration {
            if !total.is_finite() || total <= 0.0 {
                return Err(SegmentationError::InvalidTotalDuration(total));
            }
        }

        let TokenStream { words, sentence_ends } = stream;
        let tagged = TranscriptWords::classify(words, &self.config.timing)?;
        let source = tagged.source(self.config.timing.mode);
        let stream = TokenStream {
            words: tagged.into_words(),
            sentence_ends,
        };

        let blocks = CueBuilder::new(&self.config.layout).build(&stream);
        let provisional = TimingAllocator::new(&self.config.timing).allocate(blocks, source, total_duration)?;
        let timeline = Reconciler::new(&self.config.timing).reconcile(provisional, total_duration)?;

        self.report_issues(&timeline, source);

        let srt = srt::to_srt_string(&timeline);
        debug!("Generated {} ({:?} timing)", timeline.stats(), source);

        Ok(GeneratedSubtitles {
            timeline,
            srt,
            source,
        })
    }

    fn report_issues(&self, timeline: &Timeline, source: TimingSource) {
        let validator = TimelineValidator::with_config(TimelineValidatorConfig::from_config(&self.config));
        let result = validator.validate_timeline(timeline);
        if result.passed {
            return;
        }

        for cue in result.failed_cues() {
            for issue in &cue.issues {
                match source {
                    // Aligned ground truth may legitimately sit outside the bounds
                    TimingSource::Aligned => debug!("Cue {}: {}", cue.seq_num, issue),
                    TimingSource::Heuristic | TimingSource::Even => warn!("Cue {}: {}", cue.seq_num, issue),
                }
            }
        }
    }
}
