use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::media::MEDIA_EXTENSIONS;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for a generated subtitle
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.as_ref().join(output_filename)
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::has_extension(path, &[wanted]) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Find a media file sharing the transcript's stem in the same directory
    pub fn find_matching_media<P: AsRef<Path>>(transcript: P) -> Option<PathBuf> {
        Self::find_sibling(transcript.as_ref(), MEDIA_EXTENSIONS)
    }

    /// Find aligner output (`<stem>.json`) next to a transcript
    pub fn find_matching_alignment<P: AsRef<Path>>(transcript: P) -> Option<PathBuf> {
        Self::find_sibling(transcript.as_ref(), &["json"])
    }

    fn find_sibling(path: &Path, extensions: &[&str]) -> Option<PathBuf> {
        let stem = path.file_stem()?;
        let dir = path.parent().unwrap_or(Path::new("."));

        extensions
            .iter()
            .map(|ext| {
                let mut name = stem.to_os_string();
                name.push(".");
                name.push(ext);
                dir.join(name)
            })
            .find(|candidate| candidate.is_file())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify an input file by extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let path = path.as_ref();

        if Self::has_extension(path, &["txt", "text"]) {
            FileType::Transcript
        } else if Self::has_extension(path, &["json"]) {
            FileType::Alignment
        } else if Self::has_extension(path, &["srt"]) {
            FileType::Subtitle
        } else if Self::has_extension(path, MEDIA_EXTENSIONS) {
            FileType::Media
        } else {
            FileType::Unknown
        }
    }

    fn has_extension(path: &Path, extensions: &[&str]) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
    }
}

/// Enum representing the input file kinds the generator understands
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    /// Plain-text transcript
    Transcript,
    /// Forced-aligner JSON output
    Alignment,
    /// Existing SRT subtitle file
    Subtitle,
    /// Audio or video file
    Media,
    /// Unknown file type
    Unknown,
}
