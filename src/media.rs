use log::{debug, error};
use std::path::Path;
use tokio::process::Command;

use crate::errors::MediaError;

// @module: Media duration probing through ffprobe

// @const: Seconds to wait for ffprobe before giving up
const PROBE_TIMEOUT_SECS: u64 = 60;

/// Probe the duration of an audio or video file in seconds.
///
/// The segmentation core never calls this itself; callers resolve the
/// duration first and pass it in.
pub async fn probe_duration<P: AsRef<Path>>(media_path: P) -> Result<f64, MediaError> {
    let media_path = media_path.as_ref();

    if !media_path.exists() {
        return Err(MediaError::NotFound(media_path.display().to_string()));
    }

    let mut command = ffprobe_command(media_path);
    let ffprobe_future = command.output();

    let timeout_duration = std::time::Duration::from_secs(PROBE_TIMEOUT_SECS);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| MediaError::ProbeFailed(e.to_string()))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(MediaError::Timeout(PROBE_TIMEOUT_SECS));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("ffprobe failed: {}", stderr.trim());
        return Err(MediaError::ProbeFailed(stderr.trim().to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration = parse_duration_output(&stdout)
        .ok_or_else(|| MediaError::NoDuration(media_path.display().to_string()))?;

    debug!("Media duration for {:?}: {:.3}s", media_path, duration);
    Ok(duration)
}

// @returns: ffprobe invocation printing only the container duration; the
// child is killed if the probe future is dropped on timeout
fn ffprobe_command(media_path: &Path) -> Command {
    let mut command = Command::new("ffprobe");
    command
        .args([
            "-v", "quiet",
            "-show_entries", "format=duration",
            "-of", "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(media_path)
        .kill_on_drop(true);
    command
}

/// Parse ffprobe's bare `format=duration` output.
pub fn parse_duration_output(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Common audio and video extensions accepted as media input
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "wav", "mp3", "m4a", "aac", "flac", "ogg", "opus", "wma",
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg",
];
