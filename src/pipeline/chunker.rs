//! Splits a recording into overlapping windows sized for the recognizer.
//!
//! Windows advance by `chunk_duration_ms - overlap_ms` so that consecutive
//! chunks share an overlap region the transcript merger can deduplicate.
//! Non-final windows additionally get their boundary pulled back to the last
//! silence in their final stretch, so a window does not end mid-word.

use crate::audio::{AudioClip, detect_silence};
use crate::defaults;
use crate::pipeline::types::AudioChunk;

/// Configuration for windowed chunking.
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Nominal window length in milliseconds.
    pub chunk_duration_ms: u64,
    /// Overlap carried into the next window, in milliseconds.
    pub overlap_ms: u64,
    /// Loudness at or below this many dBFS counts as silence.
    pub silence_threshold_db: f32,
    /// Minimum sustained silence to qualify as a boundary, in milliseconds.
    pub min_silence_ms: u64,
    /// How much of the window tail is searched for silence, in milliseconds.
    pub boundary_search_ms: u64,
    /// Minimum audio a trim must leave before the nominal end, in milliseconds.
    pub boundary_buffer_ms: u64,
    /// Granularity of the silence scan, in milliseconds.
    pub seek_step_ms: u64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_duration_ms: defaults::CHUNK_DURATION_MS,
            overlap_ms: defaults::OVERLAP_MS,
            silence_threshold_db: defaults::SILENCE_THRESHOLD_DB,
            min_silence_ms: defaults::MIN_SILENCE_MS,
            boundary_search_ms: defaults::BOUNDARY_SEARCH_MS,
            boundary_buffer_ms: defaults::BOUNDARY_BUFFER_MS,
            seek_step_ms: defaults::SILENCE_SEEK_STEP_MS,
        }
    }
}

/// Splits audio into overlapping, silence-aligned chunks.
#[derive(Debug)]
pub struct AudioChunker {
    config: ChunkerConfig,
}

impl AudioChunker {
    /// Creates a new chunker with the given configuration.
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Splits `audio` into ordered chunks.
    ///
    /// A recording no longer than one window yields exactly one chunk
    /// spanning the whole file. Empty audio yields no chunks. Window starts
    /// advance from the nominal window end, so silence trimming shrinks the
    /// overlap with the next chunk but never moves its start.
    pub fn chunk(&self, audio: &AudioClip) -> Vec<AudioChunk> {
        let total_ms = audio.duration_ms();
        if total_ms == 0 {
            return Vec::new();
        }

        // overlap >= duration is rejected by config validation; the max(1)
        // keeps this loop finite even for an unvalidated config.
        let step = self
            .config
            .chunk_duration_ms
            .saturating_sub(self.config.overlap_ms)
            .max(1);

        let mut chunks = Vec::new();
        let mut current = 0u64;
        loop {
            let nominal_end = (current + self.config.chunk_duration_ms).min(total_ms);
            let mut window = audio.slice_ms(current, nominal_end);
            if nominal_end < total_ms
                && let Some(trimmed_ms) = self.boundary_trim(&window)
            {
                window = audio.slice_ms(current, current + trimmed_ms);
            }

            let end_ms = current + window.duration_ms();
            chunks.push(AudioChunk::new(chunks.len(), current, end_ms, window));

            if nominal_end >= total_ms {
                break;
            }
            current += step;
        }
        chunks
    }

    /// Looks for a silence boundary in the window tail.
    ///
    /// Returns the trimmed window duration, or `None` when no silence
    /// qualifies. The chosen boundary is the start of the last silence range
    /// that leaves at least `boundary_buffer_ms` before the nominal end and
    /// does not trim the window down to nothing.
    fn boundary_trim(&self, window: &AudioClip) -> Option<u64> {
        let window_ms = window.duration_ms();
        let search_start = window_ms.saturating_sub(self.config.boundary_search_ms);
        let tail = window.slice_ms(search_start, window_ms);
        let tail_ms = tail.duration_ms();

        let ranges = detect_silence(
            &tail,
            self.config.min_silence_ms,
            self.config.silence_threshold_db,
            self.config.seek_step_ms,
        );
        for (silence_start, _) in ranges.into_iter().rev() {
            if silence_start + self.config.boundary_buffer_ms > tail_ms {
                continue;
            }
            let trimmed_ms = search_start + silence_start;
            if trimmed_ms == 0 {
                continue;
            }
            return Some(trimmed_ms);
        }
        None
    }
}
