/*!
 * End-to-end tests for transcript to SRT generation
 */

use std::fs;
use anyhow::Result;
use srtsmith::app_config::{Config, GroupingPolicy, TimingMode};
use srtsmith::app_controller::{Controller, JobOptions};
use srtsmith::subtitle::{self, TimelineValidator, TimelineValidatorConfig};
use srtsmith::SubtitleGenerator;
use crate::common;

/// One parsed SRT block: index, start ms, end ms, text lines
struct ParsedCue {
    index: usize,
    start_ms: u64,
    end_ms: u64,
    lines: Vec<String>,
}

fn parse_timestamp(value: &str) -> u64 {
    let (hms, ms) = value.split_once(',').unwrap();
    let parts: Vec<u64> = hms.split(':').map(|p| p.parse().unwrap()).collect();
    ((parts[0] * 60 + parts[1]) * 60 + parts[2]) * 1000 + ms.parse::<u64>().unwrap()
}

fn parse_srt(content: &str) -> Vec<ParsedCue> {
    content
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            let mut lines = block.lines();
            let index = lines.next().unwrap().parse().unwrap();
            let (start, end) = lines.next().unwrap().split_once(" --> ").unwrap();
            ParsedCue {
                index,
                start_ms: parse_timestamp(start),
                end_ms: parse_timestamp(end),
                lines: lines.map(str::to_string).collect(),
            }
        })
        .collect()
}

fn long_transcript() -> String {
    let sentences = [
        "Welcome back to the channel.",
        "Today we are looking at how subtitles are timed when no aligner is available.",
        "Every cue gets a share of the running time based on how many words it holds.",
        "Short cues are stretched so they stay on screen long enough to read!",
        "Long cues are trimmed so they never linger.",
        "Finally the whole timeline is scaled to match the audio.",
    ];
    sentences.join("\n")
}

#[tokio::test]
async fn test_subtitleWorkflow_withTranscriptFile_shouldWriteWellFormedSrt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "lecture.txt", &long_transcript())?;

    let controller = Controller::with_config(Config::default())?;
    let options = JobOptions {
        duration: Some(30.0),
        ..JobOptions::default()
    };
    controller.run(&transcript, &options).await?;

    let content = fs::read_to_string(temp_dir.path().join("lecture.srt"))?;
    let cues = parse_srt(&content);

    assert!(!cues.is_empty());
    for (i, cue) in cues.iter().enumerate() {
        assert_eq!(cue.index, i + 1);
        assert!(cue.end_ms > cue.start_ms);
        assert!(cue.lines.len() <= 2);
        assert!(cue.lines.iter().all(|l| l.split(' ').count() <= 4));
    }
    for pair in cues.windows(2) {
        assert!(pair[0].end_ms <= pair[1].start_ms);
    }

    // Every word survives, in order
    let written: Vec<String> = cues
        .iter()
        .flat_map(|c| c.lines.iter().flat_map(|l| l.split(' ').map(str::to_string)))
        .collect();
    let original: Vec<String> = long_transcript().split_whitespace().map(str::to_string).collect();
    assert_eq!(written, original);

    // Final cue lands on the media duration
    assert!(cues.last().unwrap().end_ms.abs_diff(30_000) <= 1);

    Ok(())
}

#[tokio::test]
async fn test_subtitleWorkflow_withConfigFile_shouldApplyLayout() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("srtsmith.json");

    let mut config = Config::default();
    config.layout.words_per_line = 4;
    config.layout.lines_per_cue = 3;
    config.layout.grouping = GroupingPolicy::Sentence;
    config.save(&config_path)?;

    let loaded = Config::from_file(&config_path)?;
    let controller = Controller::with_config(loaded)?;
    let transcript = common::create_test_file(temp_dir.path(), "lecture.txt", &long_transcript())?;
    controller.run(&transcript, &JobOptions::default()).await?;

    let cues = parse_srt(&fs::read_to_string(temp_dir.path().join("lecture.srt"))?);

    assert!(cues.iter().all(|c| c.lines.len() <= 3));
    assert!(cues.iter().all(|c| c.lines.iter().all(|l| l.split(' ').count() <= 4)));
    // The five-word opening sentence fills a line and closes a cue of its own
    assert_eq!(cues[0].lines, vec!["Welcome back to the", "channel."]);
    assert!(cues[1].lines[0].starts_with("Today"));

    Ok(())
}

#[test]
fn test_subtitleWorkflow_withGeneratedTimeline_shouldPassValidation() {
    let config = Config::default();
    let generator = SubtitleGenerator::new(config.clone()).unwrap();

    let generated = generator.generate_from_text(&long_transcript(), Some(40.0)).unwrap();

    let validator = TimelineValidator::with_config(TimelineValidatorConfig::from_config(&config));
    let result = validator.validate_timeline(&generated.timeline);
    assert!(result.passed, "unexpected issues: {:?}", result.failed_cues());
}

#[test]
fn test_subtitleWorkflow_withWriter_shouldMatchStringRendering() -> Result<()> {
    let generator = SubtitleGenerator::new(Config::default())?;
    let generated = generator.generate_from_text(&long_transcript(), None)?;

    let mut buffer = Vec::new();
    subtitle::write_srt(&generated.timeline, &mut buffer)?;

    assert_eq!(String::from_utf8(buffer)?, generated.srt);

    Ok(())
}

#[test]
fn test_subtitleWorkflow_withTimelineFile_shouldWriteSameBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let generator = SubtitleGenerator::new(Config::default())?;
    let generated = generator.generate_from_text(common::SAMPLE_TRANSCRIPT, Some(5.0))?;
    let path = temp_dir.path().join("nested").join("sample.srt");

    subtitle::srt::write_to_file(&generated.timeline, &path)?;

    assert_eq!(fs::read_to_string(&path)?, generated.srt);

    Ok(())
}

#[tokio::test]
async fn test_subtitleWorkflow_withEvenMode_shouldFillMediaDuration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = common::create_test_file(temp_dir.path(), "lecture.txt", &long_transcript())?;

    let mut config = Config::default();
    config.timing.mode = TimingMode::Even;
    let options = JobOptions {
        duration: Some(45.0),
        ..JobOptions::default()
    };
    Controller::with_config(config)?.run(&transcript, &options).await?;

    let cues = parse_srt(&fs::read_to_string(temp_dir.path().join("lecture.srt"))?);

    // 66 words make 9 blocks of 5s
    assert_eq!(cues.len(), 9);
    for (i, cue) in cues.iter().enumerate() {
        assert_eq!(cue.start_ms, i as u64 * 5_000);
        assert_eq!(cue.end_ms, (i as u64 + 1) * 5_000);
    }

    Ok(())
}
