/*!
 * End-to-end tests for aligner output to SRT generation
 */

use std::fs;
use anyhow::Result;
use srtsmith::alignment;
use srtsmith::app_config::Config;
use srtsmith::app_controller::{Controller, JobOptions, JobOutcome};
use srtsmith::errors::SegmentationError;
use srtsmith::segmentation::TimingSource;
use srtsmith::SubtitleGenerator;
use crate::common::{self, approx_eq};

const SYNC_MAP: &str = r#"{
    "fragments": [
        { "begin": "0.000", "end": "1.800", "id": "f000001", "lines": ["Hello world!"] },
        { "begin": "1.800", "end": "4.200", "id": "f000002", "lines": ["This is a test of the"] },
        { "begin": "4.200", "end": "6.000", "id": "f000003", "lines": ["professional SRT generator."] },
        { "begin": "6.000", "end": "6.500", "id": "f000004", "lines": [] }
    ]
}"#;

#[test]
fn test_alignmentWorkflow_withSyncMap_shouldUseFragmentBoundaries() -> Result<()> {
    let words = alignment::parse_words(SYNC_MAP)?;
    assert_eq!(words.len(), 11);

    let generator = SubtitleGenerator::new(Config::default())?;
    let generated = generator.generate_from_words(words, Some(6.5))?;
    let timeline = &generated.timeline;

    assert_eq!(generated.source, TimingSource::Aligned);
    assert_eq!(timeline.len(), 2);

    // Eight words cover the first two fragments exactly
    assert_eq!(timeline.cues[0].start_time, 0.0);
    assert!(approx_eq(timeline.cues[0].end_time, 4.2));
    assert_eq!(timeline.cues[0].lines[1].text(), "a test of the");

    // The empty trailing fragment contributes no words
    assert!(approx_eq(timeline.cues[1].start_time, 4.2));
    assert!(approx_eq(timeline.cues[1].end_time, 6.0));

    Ok(())
}

/// Aligned times are never rescaled to the media duration
#[test]
fn test_alignmentWorkflow_withGroundTruthTimes_shouldNotRescale() -> Result<()> {
    let words = alignment::parse_words(
        r#"[
            {"text": "one", "start": 0.0, "end": 0.3},
            {"text": "two", "start": 0.3, "end": 0.6},
            {"text": "three", "start": 10.0, "end": 18.0}
        ]"#,
    )?;
    let mut config = Config::default();
    config.layout.words_per_line = 1;
    config.layout.lines_per_cue = 1;

    let generated = SubtitleGenerator::new(config)?.generate_from_words(words, Some(30.0))?;
    let cues = &generated.timeline.cues;

    // Short cues grow up to the next start, long aligned cues are left alone
    assert!(approx_eq(cues[0].end_time, 0.3));
    assert!(approx_eq(cues[1].end_time, 1.8));
    assert!(approx_eq(cues[2].start_time, 10.0));
    assert!(approx_eq(cues[2].end_time, 18.0));

    Ok(())
}

#[test]
fn test_alignmentWorkflow_withMalformedTimestamps_shouldFail() -> Result<()> {
    let words = alignment::parse_words(r#"[{"text": "backwards", "start": 2.0, "end": 1.0}]"#)?;

    let result = SubtitleGenerator::new(Config::default())?.generate_from_words(words, None);

    assert!(matches!(result, Err(SegmentationError::MalformedAlignment { index: 0, .. })));

    Ok(())
}

#[tokio::test]
async fn test_alignmentWorkflow_withTranscriptAndAlignmentFiles_shouldWriteAlignedSrt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_sample_transcript(temp_dir.path(), "talk.txt")?;
    let alignment_path = common::create_test_file(temp_dir.path(), "talk.aeneas.json", SYNC_MAP)?;

    let controller = Controller::with_config(Config::default())?;
    let options = JobOptions {
        alignment: Some(alignment_path),
        duration: Some(6.5),
        ..JobOptions::default()
    };
    let outcome = controller.run(&transcript, &options).await?;

    assert!(matches!(outcome, JobOutcome::Written { source: TimingSource::Aligned, .. }));

    let srt = fs::read_to_string(temp_dir.path().join("talk.srt"))?;
    assert!(srt.contains("00:00:04,200 --> 00:00:06,000\nprofessional SRT generator.\n"));

    Ok(())
}

#[tokio::test]
async fn test_alignmentWorkflow_withPartialAlignment_shouldFailUnlessFallbackAllowed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "clip.txt", "Hi there")?;
    let alignment_path = common::create_test_file(
        temp_dir.path(),
        "clip.json",
        r#"[{"text": "Hi", "start": 0.0, "end": 0.4}, {"text": "there", "start": null, "end": null}]"#,
    )?;
    let options = JobOptions {
        alignment: Some(alignment_path),
        ..JobOptions::default()
    };

    let strict = Controller::with_config(Config::default())?;
    let result = strict.run(&transcript, &options).await;
    assert!(format!("{:#}", result.unwrap_err()).contains("Alignment is incomplete"));
    assert!(!temp_dir.path().join("clip.srt").exists());

    let mut config = Config::default();
    config.timing.allow_heuristic_fallback = true;
    let lenient = Controller::with_config(config)?;
    let outcome = lenient.run(&transcript, &options).await?;
    assert!(matches!(outcome, JobOutcome::Written { source: TimingSource::Heuristic, .. }));

    Ok(())
}

#[tokio::test]
async fn test_alignmentWorkflow_withOutOfOrderWords_shouldFailWithoutWritingOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let alignment_path = common::create_word_alignment(
        temp_dir.path(),
        "clip.json",
        &[("later", 5.0, 5.5), ("earlier", 0.0, 0.5)],
    )?;

    let words = alignment::load_words(&alignment_path)?;
    let result = SubtitleGenerator::new(Config::default())?.generate_from_words(words, None);
    assert!(matches!(result, Err(SegmentationError::MalformedAlignment { index: 1, .. })));

    let outcome = Controller::with_config(Config::default())?
        .run(&alignment_path, &JobOptions::default())
        .await;
    assert!(format!("{:#}", outcome.unwrap_err()).contains("Malformed alignment at word index 1"));
    assert!(!temp_dir.path().join("clip.srt").exists());

    Ok(())
}

/// Multi-word entries are split and their span shared by character length
#[test]
fn test_alignmentWorkflow_withPhraseEntries_shouldSplitWords() -> Result<()> {
    let words = alignment::parse_words(r#"[{"text": "ab cdef", "start": 0.0, "end": 3.0}, {"text": "  ", "start": 3.0, "end": 3.5}]"#)?;

    assert_eq!(words.len(), 2);
    assert_eq!(words[0].end_time, Some(1.0));
    assert_eq!(words[1].end_time, Some(3.0));

    Ok(())
}
