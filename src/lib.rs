//! redub - Speech-to-speech translation for recorded audio
//!
//! Transcribes a WAV recording, translates the transcript, and synthesizes
//! the translation back into audio as one batch pipeline.

// Library code propagates errors; panics are reserved for startup paths.
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod engines;
pub mod error;
pub mod pipeline;

// Core traits (audio → text → text → audio)
pub use engines::{SpeechRecognizer, SpeechSynthesizer, Translator};

// Pipeline
pub use pipeline::orchestrator::{PipelineConfig, PipelineOrchestrator};
pub use pipeline::types::{PipelineOutput, PipelineRequest, PipelineState};

// Error handling
pub use error::{EngineError, RedubError, Result, Step};

// Config
pub use config::Config;

// Audio primitives
pub use audio::AudioClip;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
