/*!
 * Transcript tokenizer.
 *
 * Splits raw text on Unicode whitespace into words and, when requested,
 * records sentence boundaries using language-aware abbreviation rules.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SegmentationError;
use crate::language_utils;
use crate::segmentation::model::{TokenStream, Word};

// @const: Sentence-final punctuation, optionally followed by closing quotes or brackets
static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?…]["'”’»)\]]*$"#).unwrap()
});

// @const: A single capital initial such as "J."
static INITIAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lu}\.$").unwrap());

const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "e.g.", "i.e.", "mt.",
    "no.", "inc.", "ltd.", "co.", "approx.",
];

const FRENCH_ABBREVIATIONS: &[&str] = &["m.", "mme.", "mlle.", "dr.", "st.", "ste.", "p.", "ex."];

const GERMAN_ABBREVIATIONS: &[&str] = &[
    "z.b.", "bzw.", "usw.", "dr.", "hr.", "fr.", "ca.", "vgl.", "nr.", "u.a.",
];

const SPANISH_ABBREVIATIONS: &[&str] = &["sr.", "sra.", "srta.", "dr.", "dra.", "ud.", "uds.", "p.ej."];

/// Abbreviations that never end a sentence for a given language.
fn abbreviations_for(language: &str) -> &'static [&'static str] {
    match language_utils::normalize_to_part1_or_part2t(language).as_deref() {
        Ok("en") => ENGLISH_ABBREVIATIONS,
        Ok("fr") => FRENCH_ABBREVIATIONS,
        Ok("de") => GERMAN_ABBREVIATIONS,
        Ok("es") => SPANISH_ABBREVIATIONS,
        Ok(other) => {
            debug!("No abbreviation list for language '{}', using punctuation only", other);
            &[]
        }
        Err(e) => {
            debug!("Language code issue: {}", e);
            &[]
        }
    }
}

/// Turns raw transcript text into a `TokenStream`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    sentence_aware: bool,
    abbreviations: &'static [&'static str],
}

impl Tokenizer {
    /// Create a tokenizer for a language; sentence boundaries are only
    /// recorded when `sentence_aware` is set.
    pub fn new(language: &str, sentence_aware: bool) -> Self {
        Self {
            sentence_aware,
            abbreviations: abbreviations_for(language),
        }
    }

    /// Tokenize free text.
    pub fn tokenize(&self, text: &str) -> Result<TokenStream, SegmentationError> {
        let words: Vec<Word> = text.split_whitespace().map(Word::new).collect();

        if words.is_empty() {
            return Err(SegmentationError::EmptyInput);
        }

        let sentence_ends = if self.sentence_aware {
            self.detect_sentence_ends(&words)
        } else {
            Vec::new()
        };

        debug!(
            "Tokenized {} words in {} sentence(s)",
            words.len(),
            sentence_ends.len().max(1)
        );

        Ok(TokenStream { words, sentence_ends })
    }

    /// Tokenize a sentence stream produced by a text extractor.
    ///
    /// Each item is treated as one sentence; items without any word are
    /// skipped.
    pub fn tokenize_sentences<S: AsRef<str>>(&self, sentences: &[S]) -> Result<TokenStream, SegmentationError> {
        let mut words = Vec::new();
        let mut sentence_ends = Vec::new();

        for sentence in sentences {
            let before = words.len();
            words.extend(sentence.as_ref().split_whitespace().map(Word::new));
            if words.len() > before {
                sentence_ends.push(words.len());
            }
        }

        if words.is_empty() {
            return Err(SegmentationError::EmptyInput);
        }

        if !self.sentence_aware {
            sentence_ends.clear();
        }

        Ok(TokenStream { words, sentence_ends })
    }

    /// Normalize caller-supplied words, such as aligner output, keeping their
    /// timestamps and recording sentence boundaries when requested.
    ///
    /// Blank words are dropped and words holding whitespace are split, with a
    /// timed word's span shared across its parts.
    pub fn annotate(&self, words: Vec<Word>) -> Result<TokenStream, SegmentationError> {
        let supplied = words.len();
        let words: Vec<Word> = words.iter().flat_map(Word::split_tokens).collect();

        if words.is_empty() {
            return Err(SegmentationError::EmptyInput);
        }
        if words.len() != supplied {
            debug!("Normalized {} supplied word(s) into {} token(s)", supplied, words.len());
        }

        let sentence_ends = if self.sentence_aware {
            self.detect_sentence_ends(&words)
        } else {
            Vec::new()
        };

        Ok(TokenStream { words, sentence_ends })
    }

    fn detect_sentence_ends(&self, words: &[Word]) -> Vec<usize> {
        let mut ends: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, word)| self.is_sentence_end(&word.text))
            .map(|(i, _)| i + 1)
            .collect();

        if ends.last() != Some(&words.len()) {
            ends.push(words.len());
        }

        ends
    }

    fn is_sentence_end(&self, token: &str) -> bool {
        if !SENTENCE_END_REGEX.is_match(token) {
            return false;
        }
        if INITIAL_REGEX.is_match(token) {
            return false;
        }

        let lowered = token.to_lowercase();
        !self.abbreviations.contains(&lowered.as_str())
    }
}
