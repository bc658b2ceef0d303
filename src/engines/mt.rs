//! HTTP client for the remote machine translation service.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::defaults::MT_TIMEOUT_SECS;
use crate::engines::{Translator, map_transport_error, sorted_keys};
use crate::error::EngineError;

#[derive(Debug, Serialize)]
struct MtRequest<'a> {
    input_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct MtResponse {
    data: MtData,
}

#[derive(Debug, Deserialize)]
struct MtData {
    output_text: String,
}

/// Translator that posts text to a per-language-pair HTTP endpoint.
///
/// Endpoints are keyed by `"source,dest"`. The service takes
/// `{"input_text": ...}` with an `access-token` header and answers
/// `{"data": {"output_text": ...}}`.
pub struct HttpTranslator {
    client: Client,
    endpoints: HashMap<String, String>,
    access_token: String,
    timeout_secs: u64,
}

impl HttpTranslator {
    pub fn new(
        endpoints: HashMap<String, String>,
        access_token: impl Into<String>,
    ) -> Result<Self, EngineError> {
        Self::with_timeout(endpoints, access_token, MT_TIMEOUT_SECS)
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

    /// Capability map key for a language pair.
    pub fn pair_key(source: &str, dest: &str) -> String {
        format!("{source},{dest}")
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        dest: &str,
    ) -> Result<String, EngineError> {
        let key = Self::pair_key(source, dest);
        let endpoint = self.endpoints.get(&key).ok_or_else(|| {
            EngineError::Request(format!("No MT endpoint configured for '{key}'"))
        })?;

        let response = self
            .client
            .post(endpoint)
            .header("access-token", &self.access_token)
            .json(&MtRequest { input_text: text })
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

        let parsed = response.json::<MtResponse>().await.map_err(|e| {
            EngineError::MalformedResponse(format!("expected data.output_text: {e}"))
        })?;

        Ok(parsed.data.output_text)
    }

    fn supports_pair(&self, source: &str, dest: &str) -> bool {
        self.endpoints.contains_key(&Self::pair_key(source, dest))
    }

    fn available(&self) -> Vec<String> {
        sorted_keys(&self.endpoints)
    }
}
