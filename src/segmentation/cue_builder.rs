/*!
 * Cue builder.
 *
 * Partitions a word stream into untimed cue blocks of at most
 * `lines_per_cue` lines holding at most `words_per_line` words each. The
 * partition is lossless: flattening every block reproduces the input.
 */

use log::{debug, error};

use crate::app_config::{GroupingPolicy, LayoutConfig};
use crate::segmentation::model::{CueBlock, Line, TokenStream, Word};

/// Groups words into cue blocks according to a layout.
#[derive(Debug, Clone)]
pub struct CueBuilder {
    words_per_line: usize,
    lines_per_cue: usize,
    grouping: GroupingPolicy,
}

impl CueBuilder {
    /// Create a builder from the layout configuration; zero limits are
    /// raised to 1.
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            words_per_line: layout.words_per_line.max(1),
            lines_per_cue: layout.lines_per_cue.max(1),
            grouping: layout.grouping,
        }
    }

    /// Partition the stream into blocks.
    ///
    /// With sentence grouping a block is closed early right after a
    /// sentence-final word, provided the block already fills at least one
    /// full line. Streams without recorded sentence ends always fall back to
    /// fixed-size grouping.
    pub fn build(&self, stream: &TokenStream) -> Vec<CueBlock> {
        let capacity = self.words_per_line * self.lines_per_cue;
        let sentence_breaks =
            self.grouping == GroupingPolicy::Sentence && !stream.sentence_ends.is_empty();

        let mut blocks = Vec::with_capacity(stream.len().div_ceil(capacity));
        let mut current: Vec<Word> = Vec::with_capacity(capacity);

        for (index, word) in stream.words.iter().enumerate() {
            current.push(word.clone());

            let full = current.len() == capacity;
            let at_sentence_end = sentence_breaks
                && stream.ends_sentence(index)
                && current.len() >= self.words_per_line;

            if full || at_sentence_end {
                blocks.push(self.layout_block(std::mem::take(&mut current)));
            }
        }

        if !current.is_empty() {
            blocks.push(self.layout_block(current));
        }

        let total_blocked: usize = blocks.iter().map(CueBlock::word_count).sum();
        if total_blocked != stream.len() {
            error!(
                "CRITICAL ERROR: Lost words during cue building! Original: {}, After grouping: {}",
                stream.len(),
                total_blocked
            );
        }

        debug!(
            "Built {} cue block(s) from {} words ({}x{} layout, {:?} grouping)",
            blocks.len(),
            stream.len(),
            self.words_per_line,
            self.lines_per_cue,
            self.grouping
        );

        blocks
    }

    /// Split one block's words into lines, filling each line before the next.
    fn layout_block(&self, words: Vec<Word>) -> CueBlock {
        let lines = words
            .chunks(self.words_per_line)
            .map(|chunk| Line { words: chunk.to_vec() })
            .collect();

        CueBlock { lines }
    }
}
