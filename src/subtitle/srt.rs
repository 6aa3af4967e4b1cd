use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::segmentation::model::{Cue, Timeline};
use crate::subtitle::timecode::format_timestamp;

// @module: SRT document rendering

/// A cue paired with its 1-based sequence number for rendering
pub struct SrtEntry<'a> {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Cue being rendered
    pub cue: &'a Cue,
}

impl SrtEntry<'_> {
    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.cue.start_time)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.cue.end_time)
    }
}

impl fmt::Display for SrtEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        for line in &self.cue.lines {
            writeln!(f, "{}", line.text())?;
        }
        writeln!(f)
    }
}

/// Iterate cues with their sequence numbers
pub fn entries(timeline: &Timeline) -> impl Iterator<Item = SrtEntry<'_>> {
    timeline
        .cues
        .iter()
        .enumerate()
        .map(|(i, cue)| SrtEntry { seq_num: i + 1, cue })
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for entry in entries(self) {
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Render a timeline as an SRT document
pub fn to_srt_string(timeline: &Timeline) -> String {
    timeline.to_string()
}

/// Write a timeline as SRT to any writer
pub fn write_srt<W: Write>(timeline: &Timeline, writer: &mut W) -> Result<()> {
    for entry in entries(timeline) {
        write!(writer, "{}", entry)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a timeline to an SRT file, creating parent directories as needed
pub fn write_to_file<P: AsRef<Path>>(timeline: &Timeline, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_srt(timeline, &mut writer)
        .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
}
