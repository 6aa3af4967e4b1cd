use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. The configuration is an
/// immutable value handed to every pipeline stage.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Cue layout rules
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Cue timing rules
    #[serde(default)]
    pub timing: TimingConfig,

    /// Transcript language code (ISO), used for sentence boundary detection
    #[serde(default = "default_language")]
    pub language: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How words are grouped into cues
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupingPolicy {
    // @policy: Strict fixed-size blocks
    #[default]
    Fixed,
    // @policy: Close cues early at sentence boundaries when allowed
    Sentence,
}

/// Which timestamp source the timing allocator uses
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimingMode {
    // @mode: Decide from the timestamps present on the words
    #[default]
    Auto,
    // @mode: Require aligner timestamps on every word
    Aligned,
    // @mode: Synthesize timing from reading speed
    Heuristic,
    // @mode: Spread cues evenly over the media duration
    Even,
}

impl std::fmt::Display for TimingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Aligned => "aligned",
            Self::Heuristic => "heuristic",
            Self::Even => "even",
        };
        write!(f, "{}", name)
    }
}

/// Line and cue size limits
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Maximum words on one physical line
    #[serde(default = "default_words_per_line")]
    pub words_per_line: usize,

    /// Maximum lines in one cue
    #[serde(default = "default_lines_per_cue")]
    pub lines_per_cue: usize,

    /// Grouping policy for cue boundaries
    #[serde(default)]
    pub grouping: GroupingPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            words_per_line: default_words_per_line(),
            lines_per_cue: default_lines_per_cue(),
            grouping: GroupingPolicy::default(),
        }
    }
}

/// Cue duration policy and timestamp source selection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    /// Shortest allowed cue, in seconds
    #[serde(default = "default_min_cue_duration")]
    pub min_cue_duration: f64,

    /// Longest allowed cue, in seconds
    #[serde(default = "default_max_cue_duration")]
    pub max_cue_duration: f64,

    /// Reading speed in words per minute for heuristic timing
    ///
    /// Left unset, heuristic timing runs at 165 WPM. Setting it explicitly
    /// while supplying aligned timestamps is rejected as conflicting.
    #[serde(default)]
    pub reading_speed_wpm: Option<f64>,

    /// Timestamp source selection
    #[serde(default)]
    pub mode: TimingMode,

    /// Drop partial alignment and fall back to heuristic timing
    #[serde(default)]
    pub allow_heuristic_fallback: bool,
}

impl TimingConfig {
    /// Reading speed actually used by heuristic timing
    pub fn effective_wpm(&self) -> f64 {
        self.reading_speed_wpm.unwrap_or(DEFAULT_READING_SPEED_WPM)
    }

    /// Clamp a duration into `[min_cue_duration, max_cue_duration]`
    pub fn clamp_duration(&self, duration: f64) -> f64 {
        duration.max(self.min_cue_duration).min(self.max_cue_duration)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_cue_duration: default_min_cue_duration(),
            max_cue_duration: default_max_cue_duration(),
            reading_speed_wpm: None,
            mode: TimingMode::default(),
            allow_heuristic_fallback: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Reading speed used when none is configured (professional range is 150-180)
pub const DEFAULT_READING_SPEED_WPM: f64 = 165.0;

fn default_words_per_line() -> usize {
    4
}

fn default_lines_per_cue() -> usize {
    2
}

fn default_min_cue_duration() -> f64 {
    1.5
}

fn default_max_cue_duration() -> f64 {
    6.0
}

fn default_language() -> String {
    "en".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.words_per_line == 0 {
            return Err(ConfigError::invalid("words_per_line", "must be at least 1"));
        }
        if self.layout.lines_per_cue == 0 {
            return Err(ConfigError::invalid("lines_per_cue", "must be at least 1"));
        }

        let timing = &self.timing;
        if !timing.min_cue_duration.is_finite() || timing.min_cue_duration < 0.0 {
            return Err(ConfigError::invalid(
                "min_cue_duration",
                format!("must be a non-negative number of seconds, got {}", timing.min_cue_duration),
            ));
        }
        if !timing.max_cue_duration.is_finite() || timing.max_cue_duration <= 0.0 {
            return Err(ConfigError::invalid(
                "max_cue_duration",
                format!("must be a positive number of seconds, got {}", timing.max_cue_duration),
            ));
        }
        if timing.min_cue_duration > timing.max_cue_duration {
            return Err(ConfigError::invalid(
                "min_cue_duration",
                format!(
                    "{}s exceeds max_cue_duration {}s",
                    timing.min_cue_duration, timing.max_cue_duration
                ),
            ));
        }
        if let Some(wpm) = timing.reading_speed_wpm {
            if !wpm.is_finite() || wpm <= 0.0 {
                return Err(ConfigError::invalid(
                    "reading_speed_wpm",
                    format!("must be a positive number, got {}", wpm),
                ));
            }
        }

        crate::language_utils::validate_language_code(&self.language)
            .map_err(|e| ConfigError::invalid("language", e.to_string()))?;

        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            layout: LayoutConfig::default(),
            timing: TimingConfig::default(),
            language: default_language(),
            log_level: LogLevel::default(),
        }
    }
}
