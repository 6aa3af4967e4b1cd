// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use srtsmith::app_config::{self, Config, GroupingPolicy, TimingMode};
use srtsmith::app_controller::{Controller, JobOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for TimingMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTimingMode {
    Auto,
    Aligned,
    Heuristic,
    Even,
}

impl From<CliTimingMode> for TimingMode {
    fn from(cli_mode: CliTimingMode) -> Self {
        match cli_mode {
            CliTimingMode::Auto => TimingMode::Auto,
            CliTimingMode::Aligned => TimingMode::Aligned,
            CliTimingMode::Heuristic => TimingMode::Heuristic,
            CliTimingMode::Even => TimingMode::Even,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate SRT subtitles from a transcript (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate shell completions for srtsmith
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// Transcript (.txt), aligner output (.json) or a directory of transcripts
    #[arg(value_name = "TRANSCRIPT")]
    input_path: PathBuf,

    /// Media file whose duration the subtitles are synchronized to
    #[arg(long, value_name = "FILE")]
    media: Option<PathBuf>,

    /// Total media duration in seconds (skips probing)
    #[arg(long, value_name = "SECS", conflicts_with = "media")]
    duration: Option<f64>,

    /// Forced-aligner output with word or fragment timestamps
    #[arg(long, value_name = "FILE")]
    alignment: Option<PathBuf>,

    /// Output file (or directory when processing a directory)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Maximum words per subtitle line
    #[arg(long, value_name = "N")]
    words_per_line: Option<usize>,

    /// Maximum lines per cue
    #[arg(long, value_name = "N")]
    lines_per_cue: Option<usize>,

    /// Reading speed in words per minute for heuristic timing
    #[arg(long, value_name = "N")]
    wpm: Option<f64>,

    /// Minimum cue duration in seconds
    #[arg(long, value_name = "S")]
    min_duration: Option<f64>,

    /// Maximum cue duration in seconds
    #[arg(long, value_name = "S")]
    max_duration: Option<f64>,

    /// Prefer cue breaks at sentence boundaries
    #[arg(long)]
    sentence_aware: bool,

    /// Timing source selection (even spreads cues over the media duration)
    #[arg(long, value_enum)]
    mode: Option<CliTimingMode>,

    /// Use heuristic timing when alignment is incomplete
    #[arg(long)]
    allow_heuristic_fallback: bool,

    /// Transcript language code (e.g., 'en', 'fr', 'deu')
    #[arg(short, long)]
    language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "srtsmith.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// srtsmith - Transcript to SRT subtitle generator
///
/// Splits a transcript into cues of a fixed number of words and lines and
/// times them from forced-aligner output, a reading-speed model fitted
/// to the media duration, or even slots across that duration.
#[derive(Parser, Debug)]
#[command(name = "srtsmith")]
#[command(version)]
#[command(about = "Transcript to SRT subtitle generator")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "srtsmith turns transcripts into SRT subtitles with fixed line and cue limits.

EXAMPLES:
    srtsmith talk.txt                               # Heuristic timing, media found by stem
    srtsmith talk.txt --duration 312.5              # Fit timing to a known duration
    srtsmith talk.txt --media talk.mp4 -o out.srt   # Probe a specific media file
    srtsmith talk.txt --alignment talk.json         # Use forced-aligner timestamps
    srtsmith talk.txt --mode even --duration 90     # Spread cues evenly over 90s
    srtsmith --words-per-line 5 --sentence-aware talk.txt
    srtsmith -f transcripts/                        # Process a directory, overwrite outputs
    srtsmith completions bash > srtsmith.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in srtsmith.json by default. You can specify a
    different config file with --config-path. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: Option<GenerateArgs>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger; the facade's max level does the filtering
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or command line says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtsmith", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            let args = cli.generate.ok_or_else(|| {
                anyhow!("TRANSCRIPT is required when no subcommand is specified")
            })?;
            run_generate(args).await
        }
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let config = load_config(&options)?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    let job = JobOptions {
        media: options.media.clone(),
        duration: options.duration,
        alignment: options.alignment.clone(),
        output: options.output.clone(),
        force_overwrite: options.force_overwrite,
    };

    if options.input_path.is_file() {
        controller.run(&options.input_path, &job).await?;
    } else if options.input_path.is_dir() {
        let summary = controller.run_folder(&options.input_path, &job).await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} transcript(s) failed", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

/// Load or create the configuration file, then apply command line overrides
fn load_config(options: &GenerateArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);

    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path.display());

        let config = Config::default();
        config.save(config_path)
            .context("Failed to write default config")?;
        config
    };

    if let Some(words_per_line) = options.words_per_line {
        config.layout.words_per_line = words_per_line;
    }

    if let Some(lines_per_cue) = options.lines_per_cue {
        config.layout.lines_per_cue = lines_per_cue;
    }

    if options.sentence_aware {
        config.layout.grouping = GroupingPolicy::Sentence;
    }

    if let Some(wpm) = options.wpm {
        config.timing.reading_speed_wpm = Some(wpm);
    }

    if let Some(min_duration) = options.min_duration {
        config.timing.min_cue_duration = min_duration;
    }

    if let Some(max_duration) = options.max_duration {
        config.timing.max_cue_duration = max_duration;
    }

    if let Some(mode) = &options.mode {
        config.timing.mode = mode.clone().into();
    }

    if options.allow_heuristic_fallback {
        config.timing.allow_heuristic_fallback = true;
    }

    if let Some(language) = &options.language {
        config.language = language.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}
