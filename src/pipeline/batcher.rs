//! Splits text into word-bounded batches for the translator.
//!
//! The forward path groups the merged transcript into batches of at most
//! `max_words` words. The fallback path does the reverse: it spreads an
//! already-translated string back across the original chunk timeline,
//! giving each chunk a share of words proportional to its audio duration.

use crate::defaults;

/// Batches text by word count.
#[derive(Debug, Clone)]
pub struct TextBatcher {
    max_words: usize,
}

impl Default for TextBatcher {
    fn default() -> Self {
        Self::new(defaults::BATCH_MAX_WORDS)
    }
}

impl TextBatcher {
    /// Creates a batcher that emits at most `max_words` words per batch.
    pub fn new(max_words: usize) -> Self {
        Self { max_words }
    }

    /// Splits `text` into ordered batches of at most `max_words` words.
    ///
    /// Joining the batches with single spaces reproduces the word sequence
    /// of `text` exactly. Empty or whitespace-only text yields no batches.
    pub fn batch(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        words
            .chunks(self.max_words.max(1))
            .map(|group| group.join(" "))
            .collect()
    }

    /// Spreads `text` across one share per entry of `durations_ms`,
    /// proportionally to each duration.
    ///
    /// Share i gets `round(word_count * duration_i / total_duration)` words,
    /// at least one while words remain, never more than remain. Words are
    /// consumed in order and whatever is left after the proportional passes
    /// lands in the final share, so the shares joined with single spaces
    /// reproduce `text`'s word sequence exactly. Whitespace-only text yields
    /// one empty share per duration.
    pub fn redistribute(&self, text: &str, durations_ms: &[u64]) -> Vec<String> {
        if durations_ms.is_empty() {
            return Vec::new();
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let word_count = words.len();
        let total_ms: u64 = durations_ms.iter().sum();

        let mut shares = Vec::with_capacity(durations_ms.len());
        let mut consumed = 0usize;
        for (i, &duration) in durations_ms.iter().enumerate() {
            let remaining = word_count - consumed;
            let take = if i + 1 == durations_ms.len() {
                remaining
            } else {
                let proportional = if total_ms == 0 {
                    0
                } else {
                    (word_count as f64 * (duration as f64 / total_ms as f64)).round() as usize
                };
                proportional.clamp(usize::from(remaining > 0), remaining)
            };
            shares.push(words[consumed..consumed + take].join(" "));
            consumed += take;
        }
        shares
    }
}
