/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use srtsmith::app_config::{Config, GroupingPolicy, LogLevel, TimingMode, DEFAULT_READING_SPEED_WPM};
use srtsmith::errors::ConfigError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.layout.words_per_line, 4);
    assert_eq!(config.layout.lines_per_cue, 2);
    assert_eq!(config.layout.grouping, GroupingPolicy::Fixed);

    assert_eq!(config.timing.min_cue_duration, 1.5);
    assert_eq!(config.timing.max_cue_duration, 6.0);
    assert_eq!(config.timing.reading_speed_wpm, None);
    assert_eq!(config.timing.effective_wpm(), DEFAULT_READING_SPEED_WPM);
    assert_eq!(config.timing.mode, TimingMode::Auto);
    assert!(!config.timing.allow_heuristic_fallback);

    assert_eq!(config.language, "en");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.layout.words_per_line = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "words_per_line", .. })
    ));

    let mut config = Config::default();
    config.layout.lines_per_cue = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "lines_per_cue", .. })
    ));

    let mut config = Config::default();
    config.timing.min_cue_duration = 7.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "min_cue_duration", .. })
    ));

    let mut config = Config::default();
    config.timing.max_cue_duration = f64::NAN;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "max_cue_duration", .. })
    ));

    let mut config = Config::default();
    config.timing.reading_speed_wpm = Some(0.0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "reading_speed_wpm", .. })
    ));

    let mut config = Config::default();
    config.language = "zz".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "language", .. })
    ));
}

/// min == max is a fixed cue length and stays valid
#[test]
fn test_config_validation_withEqualBounds_shouldPass() {
    let mut config = Config::default();
    config.timing.min_cue_duration = 3.0;
    config.timing.max_cue_duration = 3.0;

    assert!(config.validate().is_ok());
    assert_eq!(config.timing.clamp_duration(0.5), 3.0);
    assert_eq!(config.timing.clamp_duration(9.0), 3.0);
}

/// Test that a partial JSON document is completed with defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "layout": { "words_per_line": 6, "grouping": "sentence" },
        "timing": { "reading_speed_wpm": 150, "mode": "heuristic" },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.layout.words_per_line, 6);
    assert_eq!(config.layout.lines_per_cue, 2);
    assert_eq!(config.layout.grouping, GroupingPolicy::Sentence);
    assert_eq!(config.timing.reading_speed_wpm, Some(150.0));
    assert_eq!(config.timing.mode, TimingMode::Heuristic);
    assert_eq!(config.timing.min_cue_duration, 1.5);
    assert_eq!(config.language, "en");
    assert_eq!(config.log_level, LogLevel::Debug);

    Ok(())
}

/// Test saving and loading a configuration file
#[test]
fn test_config_saveAndLoad_withTempFile_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("srtsmith.json");

    let mut config = Config::default();
    config.layout.lines_per_cue = 3;
    config.timing.max_cue_duration = 7.5;
    config.timing.allow_heuristic_fallback = true;
    config.language = "fr".to_string();

    config.save(&path)?;
    let loaded = Config::from_file(&path)?;

    assert_eq!(loaded, config);

    Ok(())
}

/// Test loading a malformed configuration file
#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    let result = Config::from_file(&path);

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse config file"));

    Ok(())
}

/// Timing modes serialize as lowercase identifiers
#[test]
fn test_timingMode_withSerde_shouldUseLowercaseNames() -> Result<()> {
    assert_eq!(serde_json::to_string(&TimingMode::Even)?, "\"even\"");
    assert_eq!(serde_json::from_str::<TimingMode>("\"aligned\"")?, TimingMode::Aligned);
    assert!(serde_json::from_str::<TimingMode>("\"guess\"").is_err());

    assert_eq!(TimingMode::Heuristic.to_string(), "heuristic");

    Ok(())
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
