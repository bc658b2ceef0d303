//! HTTP client for the remote speech synthesis service.

use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioClip, decode_wav};
use crate::defaults::{TTS_GENDER, TTS_TIMEOUT_SECS};
use crate::engines::{SpeechSynthesizer, map_transport_error, sorted_keys};
use crate::error::EngineError;

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    gender: &'a str,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    data: TtsData,
}

#[derive(Debug, Deserialize)]
struct TtsData {
    s3_url: String,
}

/// Synthesizer that posts text to a per-language HTTP endpoint.
///
/// Synthesis is a two-step exchange: the service answers with
/// `{"data": {"s3_url": ...}}`, and the audio itself is fetched from that
/// URL with a follow-up GET. Both steps share the configured timeout.
pub struct HttpSynthesizer {
    client: Client,
    endpoints: HashMap<String, String>,
    access_token: String,
    gender: String,
    timeout_secs: u64,
}

impl HttpSynthesizer {
    pub fn new(
        endpoints: HashMap<String, String>,
        access_token: impl Into<String>,
    ) -> Result<Self, EngineError> {
        Self::with_timeout(endpoints, access_token, TTS_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        endpoints: HashMap<String, String>,
        access_token: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EngineError::Request(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoints,
            access_token: access_token.into(),
            gender: TTS_GENDER.to_string(),
            timeout_secs,
        })
    }

    /// Request a specific voice gender instead of the default.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioClip, EngineError> {
        let endpoint = self.endpoints.get(language).ok_or_else(|| {
            EngineError::Request(format!("No TTS endpoint configured for '{language}'"))
        })?;

        let response = self
            .client
            .post(endpoint)
            .header("access-token", &self.access_token)
            .json(&TtsRequest {
                text,
                gender: &self.gender,
            })
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(EngineError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let parsed = response
            .json::<TtsResponse>()
            .await
            .map_err(|e| EngineError::MalformedResponse(format!("expected data.s3_url: {e}")))?;

        let audio_response = self
            .client
            .get(&parsed.data.s3_url)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.timeout_secs))?;

        let status = audio_response.status();
        if !status.is_success() {
            return Err(EngineError::Api {
                status: status.as_u16(),
                message: format!("audio download from {} failed", parsed.data.s3_url),
            });
        }

        let bytes = audio_response
            .bytes()
            .await
            .map_err(|e| map_transport_error(e, self.timeout_secs))?;

        decode_wav(Cursor::new(bytes.to_vec())).map_err(|e| EngineError::AudioDecode(e.to_string()))
    }

    fn supports(&self, language: &str) -> bool {
        self.endpoints.contains_key(language)
    }

    fn available(&self) -> Vec<String> {
        sorted_keys(&self.endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(
            "english".to_string(),
            "https://tts.example/v1/english".to_string(),
        );
        map
    }

    #[test]
    fn supports_configured_languages_only() {
        let synthesizer = HttpSynthesizer::new(endpoints(), "token").expect("client");

        assert!(synthesizer.supports("english"));
        assert!(!synthesizer.supports("hindi"));
    }

    #[test]
    fn request_serializes_with_gender() {
        let request = TtsRequest {
            text: "hello world",
            gender: "female",
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"text":"hello world","gender":"female"}"#);
    }

    #[test]
    fn response_shape_parses() {
        let body = r#"{"data": {"s3_url": "https://bucket.example/audio/42.wav"}}"#;
        let parsed: TtsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.s3_url, "https://bucket.example/audio/42.wav");
    }

    #[test]
    fn response_without_expected_field_is_rejected() {
        let body = r#"{"data": {"url": "wrong key"}}"#;
        assert!(serde_json::from_str::<TtsResponse>(body).is_err());
    }

    #[tokio::test]
    async fn unconfigured_language_fails_without_network() {
        let synthesizer = HttpSynthesizer::new(endpoints(), "token").expect("client");

        let err = synthesizer.synthesize("hello", "klingon").await.unwrap_err();
        match err {
            EngineError::Request(message) => assert!(message.contains("klingon")),
            other => panic!("Expected Request error, got {other:?}"),
        }
    }
}
