//! Error types for redub.

use std::fmt;

use thiserror::Error;

/// Pipeline stage a collaborator failure is attributed to.
///
/// Only the stages that call out to a remote service appear here; failures
/// in local stages surface as input or invariant errors instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Transcribing,
    Translating,
    Synthesizing,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Transcribing => "Transcription",
            Step::Translating => "Translation",
            Step::Synthesizing => "Synthesis",
        };
        write!(f, "{name}")
    }
}

/// Errors produced by the remote ASR/MT/TTS clients.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Service responded with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),

    #[error("Downloaded audio could not be decoded: {0}")]
    AudioDecode(String),

    /// The service answered every request but produced nothing usable,
    /// e.g. a recognizer returning empty text for every chunk.
    #[error("{0}")]
    Empty(String),
}

#[derive(Error, Debug)]
pub enum RedubError {
    // Input validation errors
    #[error("Input file not found at {path}")]
    InputFileNotFound { path: String },

    #[error("Input audio is empty: {path}")]
    EmptyAudio { path: String },

    #[error("Failed to decode input audio: {message}")]
    AudioDecode { message: String },

    #[error("ASR not supported for source language '{language}'. Available: {available:?}")]
    UnsupportedSourceLanguage {
        language: String,
        available: Vec<String>,
    },

    // The field is source_lang, not source: thiserror reserves a field
    // named source for the error cause, and a String cannot be one.
    #[error("MT not supported for '{source_lang}' to '{dest}'. Available: {available:?}")]
    UnsupportedLanguagePair {
        source_lang: String,
        dest: String,
        available: Vec<String>,
    },

    #[error("TTS not supported for destination language '{language}'. Available: {available:?}")]
    UnsupportedTargetLanguage {
        language: String,
        available: Vec<String>,
    },

    #[error("Invalid value for {name}: {message}")]
    InvalidParameter { name: String, message: String },

    // Collaborator failures, tagged with the stage they aborted
    #[error("{step} failed: {source}")]
    Engine { step: Step, source: EngineError },

    // Internal errors
    #[error("Internal pipeline invariant violated: {message}")]
    Invariant { message: String },

    #[error("Failed to encode output audio: {message}")]
    AudioEncode { message: String },

    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RedubError {
    /// Process exit code for this error.
    ///
    /// 2 for rejected input (including unsupported languages), 4 for a
    /// collaborator timeout, 3 for any other collaborator failure, 1 for
    /// configuration, I/O, and internal errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            RedubError::InputFileNotFound { .. }
            | RedubError::EmptyAudio { .. }
            | RedubError::AudioDecode { .. }
            | RedubError::UnsupportedSourceLanguage { .. }
            | RedubError::UnsupportedLanguagePair { .. }
            | RedubError::UnsupportedTargetLanguage { .. }
            | RedubError::InvalidParameter { .. } => 2,
            RedubError::Engine {
                source: EngineError::Timeout { .. },
                ..
            } => 4,
            RedubError::Engine { .. } => 3,
            _ => 1,
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, RedubError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_input_file_not_found_display() {
        let error = RedubError::InputFileNotFound {
            path: "/audio/missing.wav".to_string(),
        };
        assert_eq!(error.to_string(), "Input file not found at /audio/missing.wav");
    }

    #[test]
    fn test_empty_audio_display() {
        let error = RedubError::EmptyAudio {
            path: "/audio/silent.wav".to_string(),
        };
        assert_eq!(error.to_string(), "Input audio is empty: /audio/silent.wav");
    }

    #[test]
    fn test_unsupported_source_language_display() {
        let error = RedubError::UnsupportedSourceLanguage {
            language: "klingon".to_string(),
            available: vec!["hindi".to_string(), "english".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "ASR not supported for source language 'klingon'. Available: [\"hindi\", \"english\"]"
        );
    }

    #[test]
    fn test_unsupported_language_pair_display() {
        let error = RedubError::UnsupportedLanguagePair {
            source_lang: "hindi".to_string(),
            dest: "klingon".to_string(),
            available: vec!["hindi,english".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "MT not supported for 'hindi' to 'klingon'. Available: [\"hindi,english\"]"
        );
    }

    #[test]
    fn test_unsupported_target_language_display() {
        let error = RedubError::UnsupportedTargetLanguage {
            language: "klingon".to_string(),
            available: vec!["english".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "TTS not supported for destination language 'klingon'. Available: [\"english\"]"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = RedubError::InvalidParameter {
            name: "overlap_ms".to_string(),
            message: "must be smaller than chunk_duration_ms".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for overlap_ms: must be smaller than chunk_duration_ms"
        );
    }

    #[test]
    fn test_engine_display_includes_step_and_cause() {
        let error = RedubError::Engine {
            step: Step::Transcribing,
            source: EngineError::Timeout { seconds: 60 },
        };
        assert_eq!(
            error.to_string(),
            "Transcription failed: Request timed out after 60s"
        );
    }

    #[test]
    fn test_invariant_display() {
        let error = RedubError::Invariant {
            message: "no chunks produced from non-empty audio".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Internal pipeline invariant violated: no chunks produced from non-empty audio"
        );
    }

    #[test]
    fn test_config_file_not_found_display() {
        let error = RedubError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = RedubError::ConfigInvalidValue {
            key: "pipeline.batch_max_words".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for pipeline.batch_max_words: must be positive"
        );
    }

    #[test]
    fn test_step_display_names() {
        assert_eq!(Step::Transcribing.to_string(), "Transcription");
        assert_eq!(Step::Translating.to_string(), "Translation");
        assert_eq!(Step::Synthesizing.to_string(), "Synthesis");
    }

    #[test]
    fn test_engine_error_displays() {
        assert_eq!(
            EngineError::Request("connection refused".to_string()).to_string(),
            "Request failed: connection refused"
        );
        assert_eq!(
            EngineError::Timeout { seconds: 30 }.to_string(),
            "Request timed out after 30s"
        );
        assert_eq!(
            EngineError::Api {
                status: 500,
                message: "internal error".to_string()
            }
            .to_string(),
            "Service responded with status 500: internal error"
        );
        assert_eq!(
            EngineError::MalformedResponse("missing data.output_text".to_string()).to_string(),
            "Unexpected response shape: missing data.output_text"
        );
        assert_eq!(
            EngineError::Empty("produced no text for any chunk".to_string()).to_string(),
            "produced no text for any chunk"
        );
    }

    #[test]
    fn test_exit_code_input_errors() {
        let error = RedubError::InputFileNotFound {
            path: "x.wav".to_string(),
        };
        assert_eq!(error.exit_code(), 2);

        let error = RedubError::UnsupportedSourceLanguage {
            language: "klingon".to_string(),
            available: vec![],
        };
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_collaborator_failure() {
        let error = RedubError::Engine {
            step: Step::Translating,
            source: EngineError::Api {
                status: 503,
                message: "unavailable".to_string(),
            },
        };
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_collaborator_timeout() {
        let error = RedubError::Engine {
            step: Step::Synthesizing,
            source: EngineError::Timeout { seconds: 30 },
        };
        assert_eq!(error.exit_code(), 4);
    }

    #[test]
    fn test_exit_code_internal_errors() {
        let error = RedubError::Invariant {
            message: "bad".to_string(),
        };
        assert_eq!(error.exit_code(), 1);

        let error = RedubError::AudioEncode {
            message: "disk full".to_string(),
        };
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: RedubError = io_error.into();
        assert!(error.to_string().contains("file not found"));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: RedubError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(RedubError::Invariant {
                message: "test error".to_string(),
            })
        }
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_engine_error_source_chain() {
        let error = RedubError::Engine {
            step: Step::Transcribing,
            source: EngineError::Request("reset by peer".to_string()),
        };

        let error_trait: &dyn std::error::Error = &error;
        let source = error_trait.source().expect("engine error should have a source");
        assert!(source.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_only_engine_errors_expose_a_source() {
        // Language fields must not double as an error cause; the engine
        // variant is the only one with an underlying error.
        let pair = RedubError::UnsupportedLanguagePair {
            source_lang: "hindi".to_string(),
            dest: "klingon".to_string(),
            available: vec![],
        };
        assert!(std::error::Error::source(&pair).is_none());

        let engine = RedubError::Engine {
            step: Step::Translating,
            source: EngineError::Request("reset".to_string()),
        };
        assert!(std::error::Error::source(&engine).is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<RedubError>();
        assert_sync::<RedubError>();
        assert_send::<EngineError>();
        assert_sync::<EngineError>();
    }

    #[test]
    fn test_error_debug_format() {
        let error = RedubError::ConfigFileNotFound {
            path: "/test/path".to_string(),
        };
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("ConfigFileNotFound"));
        assert!(debug_str.contains("/test/path"));
    }
}
