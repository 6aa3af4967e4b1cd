/*!
 * SRT timestamp formatting.
 *
 * Seconds are converted to whole milliseconds by truncation, then split
 * into `HH:MM:SS,mmm` by integer division at each unit boundary.
 */

/// Slack added before truncating so that values such as `4.9999999999`
/// produced by float scaling do not lose a whole millisecond.
const TRUNCATION_SLACK_MS: f64 = 1e-6;

/// Convert seconds to whole milliseconds, truncating toward zero.
///
/// Negative and non-finite inputs map to 0.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0 + TRUNCATION_SLACK_MS).trunc() as u64
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp_ms(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format seconds as an SRT timestamp
pub fn format_timestamp(seconds: f64) -> String {
    format_timestamp_ms(seconds_to_millis(seconds))
}
