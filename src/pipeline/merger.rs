//! Stitches per-chunk transcripts into one continuous text.
//!
//! Consecutive chunks share an audio overlap, so the recognizer usually
//! hears the words around each boundary twice. The merger finds the longest
//! word sequence that is both a suffix of the text so far and a prefix of
//! the next chunk's text, and appends only what follows it.

/// Merges ordered per-chunk transcripts by deduplicating overlap words.
#[derive(Debug, Default)]
pub struct TranscriptMerger;

impl TranscriptMerger {
    /// Creates a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Merges transcripts in chunk order into one string.
    ///
    /// Empty transcripts contribute nothing and do not interrupt the
    /// overlap search between their neighbors. Matching is case-insensitive
    /// but appended text keeps its original casing.
    pub fn merge(&self, texts: &[String]) -> String {
        let mut merged = String::new();
        for text in texts {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            if merged.is_empty() {
                merged.push_str(text);
                continue;
            }

            let words: Vec<&str> = text.split_whitespace().collect();
            let overlap = longest_word_overlap(&merged, text);
            let appended = words[overlap..].join(" ");
            if !appended.is_empty() {
                merged.push(' ');
                merged.push_str(&appended);
            }
        }
        merged
    }
}

/// Length in words of the longest suffix of `merged` that is also a prefix
/// of `next`, compared case-insensitively. Returns 0 when nothing matches.
///
/// The scan runs from 1 word up to the shorter side's word count and keeps
/// the last success, so a short coincidental match can never shadow a
/// longer true overlap.
fn longest_word_overlap(merged: &str, next: &str) -> usize {
    let tail: Vec<String> = lowercase_words(merged);
    let head: Vec<String> = lowercase_words(next);
    let max_len = tail.len().min(head.len());

    let mut best = 0;
    for len in 1..=max_len {
        if tail[tail.len() - len..] == head[..len] {
            best = len;
        }
    }
    best
}

fn lowercase_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}
