/*!
 * Data model shared by the segmentation stages.
 *
 * Words are produced once by the tokenizer or the aligner loader and never
 * mutated. The cue builder produces untimed `CueBlock`s; the timing
 * allocator turns those into timed `Cue`s, which the reconciler may adjust
 * once before serialization.
 */

use serde::{Deserialize, Serialize};

/// A single transcript token, optionally carrying aligner timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Token text, never containing whitespace
    pub text: String,

    /// Start time in seconds, present only when sourced from alignment
    #[serde(default, rename = "start", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    /// End time in seconds, present only when sourced from alignment
    #[serde(default, rename = "end", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl Word {
    /// Create an untimed word.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start_time: None,
            end_time: None,
        }
    }

    /// Create a word with aligner timestamps.
    pub fn timed(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    /// Both timestamps are present.
    pub fn is_timed(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }

    /// Copy of this word with any timestamps removed.
    pub fn without_timing(&self) -> Self {
        Self::new(self.text.clone())
    }

    /// Split into whitespace-free words.
    ///
    /// Blank text yields no word. A timed word holding several tokens shares
    /// its span across them by character length.
    pub fn split_tokens(&self) -> Vec<Word> {
        let tokens: Vec<&str> = self.text.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Vec::new(),
            [only] => vec![Word {
                text: (*only).to_string(),
                start_time: self.start_time,
                end_time: self.end_time,
            }],
            parts => match (self.start_time, self.end_time) {
                (Some(start), Some(end)) => spread_span(parts, start, end),
                _ => parts.iter().map(|part| Word::new(*part)).collect(),
            },
        }
    }
}

/// Divide `[start, end]` across tokens by character length; the last token
/// always ends at `end`.
pub fn spread_span(tokens: &[&str], start: f64, end: f64) -> Vec<Word> {
    let total_chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
    if total_chars == 0 {
        return Vec::new();
    }

    let span = end - start;
    let mut consumed = 0usize;

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let word_start = start + span * consumed as f64 / total_chars as f64;
            consumed += token.chars().count();
            let word_end = if i + 1 == tokens.len() {
                end
            } else {
                start + span * consumed as f64 / total_chars as f64
            };
            Word::timed(*token, word_start, word_end)
        })
        .collect()
}

/// Ordered words of a transcript with optional sentence boundaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenStream {
    /// Words in original order
    pub words: Vec<Word>,

    /// Exclusive end offsets (word indices) of each sentence, ascending.
    /// Empty when sentence-aware splitting was not requested.
    pub sentence_ends: Vec<usize>,
}

impl TokenStream {
    /// Wrap words without sentence information.
    pub fn from_words(words: Vec<Word>) -> Self {
        Self {
            words,
            sentence_ends: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether a sentence ends right after the word at `index`.
    pub fn ends_sentence(&self, index: usize) -> bool {
        self.sentence_ends.binary_search(&(index + 1)).is_ok()
    }
}

/// One physical subtitle line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    /// Words joined by a single space.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// A cue whose lines are fixed but whose timing is not yet assigned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CueBlock {
    pub lines: Vec<Line>,
}

impl CueBlock {
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }

    /// All words of the block in order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    pub fn first_word(&self) -> Option<&Word> {
        self.words().next()
    }

    pub fn last_word(&self) -> Option<&Word> {
        self.lines.iter().rev().find_map(|line| line.words.last())
    }
}

/// One timed subtitle entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Displayed lines, never empty
    pub lines: Vec<Line>,

    /// Start time in seconds
    pub start_time: f64,

    /// End time in seconds
    pub end_time: f64,
}

impl Cue {
    /// Attach timing to a block.
    pub fn from_block(block: CueBlock, start_time: f64, end_time: f64) -> Self {
        Self {
            lines: block.lines,
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }

    /// All words of the cue in order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    /// Cue text with one line per physical line.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ordered cues of one generated document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    pub cues: Vec<Cue>,

    /// Known media duration in seconds, if supplied
    pub total_duration: Option<f64>,
}

impl Timeline {
    pub fn new(cues: Vec<Cue>, total_duration: Option<f64>) -> Self {
        Self { cues, total_duration }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Every word of every cue, in order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.cues.iter().flat_map(Cue::words)
    }

    /// End of the last cue, or 0 for an empty timeline.
    pub fn span(&self) -> f64 {
        self.cues.last().map_or(0.0, |cue| cue.end_time)
    }

    /// Summary figures for reporting.
    pub fn stats(&self) -> TimelineStats {
        TimelineStats {
            cue_count: self.cues.len(),
            word_count: self.cues.iter().map(Cue::word_count).sum(),
            span: self.span(),
            total_duration: self.total_duration,
        }
    }
}

/// Summary of a generated timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineStats {
    pub cue_count: usize,
    pub word_count: usize,
    pub span: f64,
    pub total_duration: Option<f64>,
}

impl std::fmt::Display for TimelineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} cues, {} words, span {:.3}s", self.cue_count, self.word_count, self.span)?;
        if let Some(total) = self.total_duration {
            write!(f, " (media {:.3}s)", total)?;
        }
        Ok(())
    }
}
