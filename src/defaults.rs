//! Default configuration constants for redub.
//!
//! Shared between the config structs, the pipeline, and the HTTP clients so
//! every surface starts from the same baseline values.

/// Default chunk window duration in milliseconds.
///
/// 6 seconds keeps each upload comfortably under the upstream ASR limit
/// while giving the recognizer enough context for coherent sentences.
pub const CHUNK_DURATION_MS: u64 = 6000;

/// Default overlap between consecutive chunk windows in milliseconds.
///
/// Adjacent chunks share this much audio so that a word cut at one chunk's
/// end is recognized whole at the next chunk's start; the duplicate words
/// are removed later at the text level.
pub const OVERLAP_MS: u64 = 1000;

/// Silence threshold in dBFS for chunk boundary adjustment.
///
/// Audio quieter than this counts as silence. -40 dBFS sits well below
/// normal speech but above typical room tone on recorded material.
pub const SILENCE_THRESHOLD_DB: f32 = -40.0;

/// Minimum silence duration in milliseconds to qualify as a boundary.
///
/// Shorter dips (stop consonants, breaths mid-phrase) are ignored so
/// chunks are only cut at real pauses.
pub const MIN_SILENCE_MS: u64 = 100;

/// How much of a chunk's tail is scanned for a silence boundary, in milliseconds.
pub const BOUNDARY_SEARCH_MS: u64 = 1000;

/// Minimum audio that must remain between a chosen boundary and the
/// nominal window end, in milliseconds.
pub const BOUNDARY_BUFFER_MS: u64 = 100;

/// Step size for the silence scan in milliseconds.
///
/// 10ms gives word-level boundary precision without scanning every sample.
pub const SILENCE_SEEK_STEP_MS: u64 = 10;

/// Crossfade window between adjacent synthesized segments in milliseconds.
///
/// Long enough to hide the seam, short enough not to smear word onsets.
/// Segments shorter than this clamp the fade to their own length.
pub const CROSSFADE_MS: u64 = 100;

/// Maximum words per translation batch.
///
/// The translation service degrades on long inputs; 50 words per request
/// keeps latency and quality predictable.
pub const BATCH_MAX_WORDS: usize = 50;

/// Maximum concurrent in-flight collaborator requests per stage.
pub const MAX_CONCURRENT_REQUESTS: usize = 4;

/// Timeout for a single ASR request in seconds.
///
/// Transcription is the slowest collaborator; a 6s chunk can take tens of
/// seconds upstream under load.
pub const ASR_TIMEOUT_SECS: u64 = 60;

/// Timeout for a single translation request in seconds.
pub const MT_TIMEOUT_SECS: u64 = 30;

/// Timeout for a single synthesis request (and the follow-up audio
/// download) in seconds.
pub const TTS_TIMEOUT_SECS: u64 = 30;

/// Maximum audio duration the ASR service accepts, in milliseconds.
///
/// Chunks longer than this are truncated before upload. With default
/// chunking this never triggers; it guards custom --chunk-duration values.
pub const ASR_MAX_DURATION_MS: u64 = 20_000;

/// Upload size above which a warning is logged, in bytes.
///
/// The ASR service starts rejecting uploads around this size.
pub const ASR_WARN_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default voice gender requested from the TTS service.
pub const TTS_GENDER: &str = "female";
