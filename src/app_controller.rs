use anyhow::{Result, Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};

use crate::alignment;
use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::generator::{GeneratedSubtitles, SubtitleGenerator};
use crate::media;
use crate::segmentation::TimingSource;

// @module: Application controller for subtitle generation

/// Inputs for one generation run that are not part of the configuration
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    // @field: Media file to probe for the total duration
    pub media: Option<PathBuf>,

    // @field: Known total duration in seconds, skips probing
    pub duration: Option<f64>,

    // @field: Forced-aligner output for the transcript
    pub alignment: Option<PathBuf>,

    // @field: Output file for single input, output directory for folder input
    pub output: Option<PathBuf>,

    // @field: Overwrite existing subtitle files
    pub force_overwrite: bool,
}

/// Result of processing a single input
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// A subtitle file was written
    Written {
        path: PathBuf,
        cue_count: usize,
        source: TimingSource,
    },
    /// The output already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Counters reported after processing a directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle generation
pub struct Controller {
    // @field: Pipeline with validated configuration
    generator: SubtitleGenerator,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let generator = SubtitleGenerator::new(config)
            .context("Configuration validation failed")?;

        Ok(Self { generator })
    }

    pub fn config(&self) -> &Config {
        self.generator.config()
    }

    /// Generate subtitles for a single transcript or alignment file
    pub async fn run(&self, input_file: &Path, options: &JobOptions) -> Result<JobOutcome> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = match &options.output {
            Some(path) => path.clone(),
            None => {
                let output_dir = input_file.parent().unwrap_or(Path::new("."));
                FileManager::generate_output_path(input_file, output_dir, "srt")
            }
        };

        if output_path.exists() && !options.force_overwrite {
            warn!("Skipping {:?}, subtitle already exists (use -f to force overwrite)", output_path);
            return Ok(JobOutcome::Skipped(output_path));
        }

        let total_duration = self.resolve_duration(input_file, options).await?;
        let generated = self.generate(input_file, options, total_duration)?;

        FileManager::write_to_file(&output_path, &generated.srt)?;

        info!(
            "Success: {} ({}, {} timing, {})",
            output_path.display(),
            generated.timeline.stats(),
            match generated.source {
                TimingSource::Aligned => "aligned",
                TimingSource::Heuristic => "heuristic",
                TimingSource::Even => "even",
            },
            Self::format_duration(start_time.elapsed())
        );

        Ok(JobOutcome::Written {
            path: output_path,
            cue_count: generated.timeline.len(),
            source: generated.source,
        })
    }

    /// Run the workflow in folder mode, processing every transcript in a directory
    /// Transcripts that already have subtitles are skipped
    pub async fn run_folder(&self, input_dir: &Path, options: &JobOptions) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        if options.media.is_some() || options.duration.is_some() || options.alignment.is_some() {
            return Err(anyhow!(
                "--media, --duration and --alignment apply to a single transcript, not a directory"
            ));
        }

        let transcripts = FileManager::find_files(input_dir, "txt")?;
        if transcripts.is_empty() {
            return Err(anyhow!("No transcript files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(transcripts.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for transcript in &transcripts {
            let file_name = transcript.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            folder_pb.set_message(format!("Processing: {}", file_name));

            let file_options = JobOptions {
                alignment: FileManager::find_matching_alignment(transcript),
                output: options.output.as_ref()
                    .map(|dir| FileManager::generate_output_path(transcript, dir, "srt")),
                force_overwrite: options.force_overwrite,
                ..JobOptions::default()
            };

            match self.run(transcript, &file_options).await {
                Ok(JobOutcome::Written { .. }) => summary.processed += 1,
                Ok(JobOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors in {}",
            summary.processed,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Explicit duration first, then the given media, then media sharing the transcript's stem
    async fn resolve_duration(&self, input_file: &Path, options: &JobOptions) -> Result<Option<f64>> {
        if let Some(duration) = options.duration {
            return Ok(Some(duration));
        }

        if let Some(media_path) = &options.media {
            let duration = media::probe_duration(media_path)
                .await
                .with_context(|| format!("Failed to read media duration: {:?}", media_path))?;
            return Ok(Some(duration));
        }

        let Some(media_path) = FileManager::find_matching_media(input_file) else {
            debug!("No media found for {:?}; timing from reading speed alone", input_file);
            return Ok(None);
        };

        match media::probe_duration(&media_path).await {
            Ok(duration) => {
                debug!("Using media {:?} ({:.3}s)", media_path, duration);
                Ok(Some(duration))
            }
            Err(e) => {
                warn!("Ignoring media {:?}: {}", media_path, e);
                Ok(None)
            }
        }
    }

    fn generate(&self, input_file: &Path, options: &JobOptions, total_duration: Option<f64>) -> Result<GeneratedSubtitles> {
        let generated = match FileManager::detect_file_type(input_file) {
            FileType::Transcript => {
                let text = FileManager::read_to_string(input_file)?;

                match &options.alignment {
                    Some(alignment_path) => {
                        let words = alignment::load_words(alignment_path)
                            .with_context(|| format!("Failed to load alignment: {:?}", alignment_path))?;

                        let transcript_words = text.split_whitespace().count();
                        if transcript_words != words.len() {
                            warn!(
                                "Alignment {:?} has {} words but transcript has {}; using alignment words",
                                alignment_path, words.len(), transcript_words
                            );
                        }

                        self.generator.generate_from_words(words, total_duration)?
                    }
                    None => self.generator.generate_from_text(&text, total_duration)?,
                }
            }
            FileType::Alignment => {
                let words = alignment::load_words(input_file)
                    .with_context(|| format!("Failed to load alignment: {:?}", input_file))?;
                self.generator.generate_from_words(words, total_duration)?
            }
            other => {
                return Err(anyhow!("Unsupported input ({:?}): {:?}", other, input_file));
            }
        };

        Ok(generated)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
