//! Remote collaborator engines: ASR, MT, and TTS.
//!
//! Each capability is a trait so the pipeline can run against either the
//! real HTTP services or the in-crate mocks:
//!
//! ```text
//! chunk audio ──▶ SpeechRecognizer ──▶ text
//! merged text ──▶ Translator       ──▶ translated text
//! batch text  ──▶ SpeechSynthesizer ──▶ audio segment
//! ```
//!
//! The HTTP implementations hold one endpoint per supported language (or
//! language pair) plus a shared access token, mirroring how the upstream
//! services are deployed.

pub mod asr;
pub mod mock;
pub mod mt;
pub mod tts;

pub use asr::HttpRecognizer;
pub use mock::{MockRecognizer, MockSynthesizer, MockTranslator};
pub use mt::HttpTranslator;
pub use tts::HttpSynthesizer;

use async_trait::async_trait;

use crate::audio::AudioClip;
use crate::error::EngineError;

/// Speech-to-text collaborator.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe one chunk of audio in the given language.
    async fn transcribe(&self, audio: &AudioClip, language: &str)
    -> Result<String, EngineError>;

    /// Whether this recognizer handles the given language.
    fn supports(&self, language: &str) -> bool;

    /// Sorted list of languages this recognizer handles.
    fn available(&self) -> Vec<String>;
}

/// Text-to-text translation collaborator.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from `source` to `dest`.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        dest: &str,
    ) -> Result<String, EngineError>;

    /// Whether this translator handles the given language pair.
    fn supports_pair(&self, source: &str, dest: &str) -> bool;

    /// Sorted list of `"source,dest"` pairs this translator handles.
    fn available(&self) -> Vec<String>;
}

/// Text-to-speech collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize spoken audio for text in the given language.
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip, EngineError>;

    /// Whether this synthesizer handles the given language.
    fn supports(&self, language: &str) -> bool;

    /// Sorted list of languages this synthesizer handles.
    fn available(&self) -> Vec<String>;
}

/// Map a reqwest transport failure onto the engine error taxonomy.
///
/// Timeouts get their own variant because the caller's exit code
/// distinguishes them from other upstream failures.
pub(crate) fn map_transport_error(e: reqwest::Error, timeout_secs: u64) -> EngineError {
    if e.is_timeout() {
        EngineError::Timeout {
            seconds: timeout_secs,
        }
    } else {
        EngineError::Request(e.to_string())
    }
}

/// Sorted copy of a capability map's keys, for validation error messages.
pub(crate) fn sorted_keys(map: &std::collections::HashMap<String, String>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}
