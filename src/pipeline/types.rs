//! Data types shared across the dubbing pipeline stages.

use std::path::PathBuf;

use crate::audio::AudioClip;

/// A windowed slice of the input recording, ready for transcription.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Zero-based position of this chunk in the input.
    pub index: usize,
    /// Offset of the chunk start in the input recording, in milliseconds.
    pub start_ms: u64,
    /// Offset of the chunk end in the input recording, in milliseconds.
    ///
    /// Reflects any silence trimming, so `end_ms - start_ms` always equals
    /// the duration of `audio`.
    pub end_ms: u64,
    /// The chunk samples.
    pub audio: AudioClip,
}

impl AudioChunk {
    /// Creates a new chunk.
    pub fn new(index: usize, start_ms: u64, end_ms: u64, audio: AudioClip) -> Self {
        Self {
            index,
            start_ms,
            end_ms,
            audio,
        }
    }

    /// Duration of the chunk in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// A complete dubbing job: one input file, one language pair.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Path to the input WAV recording.
    pub input: PathBuf,
    /// Language spoken in the input.
    pub source_lang: String,
    /// Language to dub into.
    pub dest_lang: String,
}

impl PipelineRequest {
    /// Creates a new request.
    pub fn new(input: impl Into<PathBuf>, source_lang: &str, dest_lang: &str) -> Self {
        Self {
            input: input.into(),
            source_lang: source_lang.to_string(),
            dest_lang: dest_lang.to_string(),
        }
    }
}

/// Everything a finished run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Full transcript of the input after overlap merging.
    pub merged_transcript: String,
    /// Full translation, batches joined with single spaces.
    pub translated_text: String,
    /// The dubbed audio.
    pub audio: AudioClip,
}

/// Stage the pipeline is currently in, or finished with.
///
/// States advance strictly in declaration order. A run that fails stays
/// observable at [`PipelineState::Failed`]; the stage the error carries
/// tells you which transition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    /// Checking languages, parameters, and the input file.
    Validating,
    /// Splitting the input into overlapping windows.
    Chunking,
    /// Calling the speech recognizer on each chunk.
    Transcribing,
    /// Merging per-chunk transcripts across overlaps.
    Merging,
    /// Splitting the transcript into word-bounded batches.
    Batching,
    /// Calling the translator on each batch.
    Translating,
    /// Calling the synthesizer on each translated batch.
    Synthesizing,
    /// Crossfading synthesized segments into one track.
    Assembling,
    /// The run completed and produced output.
    Done,
    /// The run stopped with an error.
    Failed,
}

impl PipelineState {
    /// Whether the pipeline has stopped moving.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineState::Validating => "validating",
            PipelineState::Chunking => "chunking",
            PipelineState::Transcribing => "transcribing",
            PipelineState::Merging => "merging",
            PipelineState::Batching => "batching",
            PipelineState::Translating => "translating",
            PipelineState::Synthesizing => "synthesizing",
            PipelineState::Assembling => "assembling",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}
