/*!
 * Loader for forced-aligner output.
 *
 * Two JSON shapes are accepted:
 *
 * - a word list: `[{"text": "Hi", "start": 0.0, "end": 0.4}, ...]`, where
 *   `start`/`end` may be missing or null for untimed words
 * - a fragment sync map: `{"fragments": [{"begin": "0.000", "end": "1.200",
 *   "lines": ["Hi there"]}]}`, with times as strings or numbers
 *
 * Multi-word entries are split on whitespace and their span is shared
 * across the words in proportion to character length.
 */

use log::debug;
use serde::Deserialize;
use std::path::Path;

use crate::errors::AlignmentError;
use crate::segmentation::model::{spread_span, Word};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AlignmentDocument {
    Words(Vec<WordRecord>),
    SyncMap(SyncMap),
}

#[derive(Debug, Deserialize)]
struct WordRecord {
    #[serde(alias = "word")]
    text: String,
    #[serde(default, alias = "start_time", alias = "begin")]
    start: Option<f64>,
    #[serde(default, alias = "end_time")]
    end: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SyncMap {
    fragments: Vec<Fragment>,
}

#[derive(Debug, Deserialize)]
struct Fragment {
    begin: TimeValue,
    end: TimeValue,
    #[serde(default)]
    lines: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimeValue {
    Seconds(f64),
    Text(String),
}

impl TimeValue {
    fn to_seconds(&self, fragment: usize) -> Result<f64, AlignmentError> {
        match self {
            TimeValue::Seconds(value) => Ok(*value),
            TimeValue::Text(text) => text.trim().parse::<f64>().map_err(|_| AlignmentError::InvalidTimestamp {
                fragment,
                value: text.clone(),
            }),
        }
    }
}

/// Read aligner output from a JSON file.
pub fn load_words<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, AlignmentError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_words(&content)
}

/// Parse aligner output from a JSON string.
pub fn parse_words(json: &str) -> Result<Vec<Word>, AlignmentError> {
    let document: AlignmentDocument =
        serde_json::from_str(json).map_err(|e| AlignmentError::Parse(e.to_string()))?;

    let words = match document {
        AlignmentDocument::Words(records) => from_word_records(records),
        AlignmentDocument::SyncMap(map) => from_fragments(map.fragments)?,
    };

    debug!("Loaded {} aligned word(s)", words.len());
    Ok(words)
}

fn from_word_records(records: Vec<WordRecord>) -> Vec<Word> {
    records
        .into_iter()
        .flat_map(|record| {
            Word {
                text: record.text,
                start_time: record.start,
                end_time: record.end,
            }
            .split_tokens()
        })
        .collect()
}

fn from_fragments(fragments: Vec<Fragment>) -> Result<Vec<Word>, AlignmentError> {
    let mut words = Vec::new();

    for (index, fragment) in fragments.iter().enumerate() {
        let begin = fragment.begin.to_seconds(index)?;
        let end = fragment.end.to_seconds(index)?;

        let text = fragment.lines.join(" ");
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        words.extend(spread_span(&tokens, begin, end));
    }

    Ok(words)
}
