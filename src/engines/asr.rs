//! HTTP client for the remote speech recognition service.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::audio::{AudioClip, encode_wav};
use crate::defaults::{ASR_MAX_DURATION_MS, ASR_TIMEOUT_SECS, ASR_WARN_PAYLOAD_BYTES};
use crate::engines::{SpeechRecognizer, map_transport_error, sorted_keys};
use crate::error::EngineError;

#[derive(Debug, Deserialize)]
struct AsrResponse {
    data: AsrData,
}

#[derive(Debug, Deserialize)]
struct AsrData {
    recognized_text: String,
}

/// Recognizer that posts WAV chunks to a per-language HTTP endpoint.
///
/// The service takes a multipart upload with an `audio_file` part and an
/// `access-token` header, and answers `{"data": {"recognized_text": ...}}`.
pub struct HttpRecognizer {
    client: Client,
    endpoints: HashMap<String, String>,
    access_token: String,
    timeout_secs: u64,
}

impl HttpRecognizer {
    pub fn new(
        endpoints: HashMap<String, String>,
        access_token: impl Into<String>,
    ) -> Result<Self, EngineError> {
        Self::with_timeout(endpoints, access_token, ASR_TIMEOUT_SECS)
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
            timeout_secs,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for HttpRecognizer {
    async fn transcribe(
        &self,
        audio: &AudioClip,
        language: &str,
    ) -> Result<String, EngineError> {
        let endpoint = self.endpoints.get(language).ok_or_else(|| {
            EngineError::Request(format!("No ASR endpoint configured for '{language}'"))
        })?;

        // The service rejects audio beyond 20s; truncate rather than fail.
        let upload = if audio.duration_ms() > ASR_MAX_DURATION_MS {
            audio.slice_ms(0, ASR_MAX_DURATION_MS)
        } else {
            audio.clone()
        };

        let wav_bytes = encode_wav(&upload)
            .map_err(|e| EngineError::Request(format!("Failed to encode chunk: {e}")))?;
        if wav_bytes.len() > ASR_WARN_PAYLOAD_BYTES {
            eprintln!(
                "redub: warning: ASR upload is {:.1} MB, the service may reject it",
                wav_bytes.len() as f64 / (1024.0 * 1024.0)
            );
        }

        let part = Part::bytes(wav_bytes)
            .file_name("chunk.wav")
            .mime_str("audio/wav")
            .map_err(|e| EngineError::Request(format!("Failed to build upload part: {e}")))?;
        let form = Form::new().part("audio_file", part);

        let response = self
            .client
            .post(endpoint)
            .header("access-token", &self.access_token)
            .multipart(form)
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

        let parsed = response.json::<AsrResponse>().await.map_err(|e| {
            EngineError::MalformedResponse(format!("expected data.recognized_text: {e}"))
        })?;

        Ok(parsed.data.recognized_text)
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
            "hindi".to_string(),
            "https://asr.example/v1/hindi".to_string(),
        );
        map.insert(
            "english".to_string(),
            "https://asr.example/v1/english".to_string(),
        );
        map
    }

    #[test]
    fn supports_configured_languages_only() {
        let recognizer = HttpRecognizer::new(endpoints(), "token").expect("client");

        assert!(recognizer.supports("hindi"));
        assert!(recognizer.supports("english"));
        assert!(!recognizer.supports("klingon"));
    }

    #[test]
    fn available_is_sorted() {
        let recognizer = HttpRecognizer::new(endpoints(), "token").expect("client");
        assert_eq!(recognizer.available(), vec!["english", "hindi"]);
    }

    #[test]
    fn response_shape_parses() {
        let body = r#"{"data": {"recognized_text": "नमस्ते दुनिया"}}"#;
        let parsed: AsrResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.recognized_text, "नमस्ते दुनिया");
    }

    #[test]
    fn response_without_expected_field_is_rejected() {
        let body = r#"{"recognized_text": "flat shape"}"#;
        assert!(serde_json::from_str::<AsrResponse>(body).is_err());

        let body = r#"{"data": {"text": "wrong key"}}"#;
        assert!(serde_json::from_str::<AsrResponse>(body).is_err());
    }

    #[tokio::test]
    async fn unconfigured_language_fails_without_network() {
        let recognizer = HttpRecognizer::new(endpoints(), "token").expect("client");
        let audio = AudioClip::silence(100, 16000);

        let err = recognizer.transcribe(&audio, "klingon").await.unwrap_err();
        match err {
            EngineError::Request(message) => assert!(message.contains("klingon")),
            other => panic!("Expected Request error, got {other:?}"),
        }
    }
}
