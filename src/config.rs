use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::pipeline::PipelineConfig;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub api: ApiConfig,
    pub languages: LanguageConfig,
}

/// Collaborator service access configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Token sent in the access-token header of every request.
    pub access_token: String,
    pub asr_timeout_secs: u64,
    pub mt_timeout_secs: u64,
    pub tts_timeout_secs: u64,
    /// Voice selection forwarded to the synthesizer.
    pub tts_gender: String,
}

/// Capability maps: which endpoint serves which language.
///
/// ASR and TTS are keyed by language name; MT is keyed by a
/// `"source,dest"` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LanguageConfig {
    pub asr: HashMap<String, String>,
    pub mt: HashMap<String, String>,
    pub tts: HashMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            asr_timeout_secs: defaults::ASR_TIMEOUT_SECS,
            mt_timeout_secs: defaults::MT_TIMEOUT_SECS,
            tts_timeout_secs: defaults::TTS_TIMEOUT_SECS,
            tts_gender: defaults::TTS_GENDER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only a missing file falls back to defaults; invalid TOML is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e.context(format!("failed to load config from {}", path.display())))
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - REDUB_TOKEN → api.access_token
    /// - REDUB_TTS_GENDER → api.tts_gender
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var("REDUB_TOKEN")
            && !token.is_empty()
        {
            self.api.access_token = token;
        }

        if let Ok(gender) = std::env::var("REDUB_TTS_GENDER")
            && !gender.is_empty()
        {
            self.api.tts_gender = gender;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/redub/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("redub")
            .join("config.toml")
    }
}
