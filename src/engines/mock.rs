//! Mock collaborator engines for tests.
//!
//! Each mock is a builder: configure capabilities and scripted outcomes,
//! then hand it to the pipeline behind the matching trait object. Scripted
//! per-call responses line up with chunk/batch indices only when the
//! pipeline runs its requests sequentially (`max_concurrent_requests = 1`).

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::audio::AudioClip;
use crate::engines::{SpeechRecognizer, SpeechSynthesizer, Translator};
use crate::error::EngineError;

/// Mock speech recognizer with scriptable responses.
#[derive(Debug)]
pub struct MockRecognizer {
    languages: Vec<String>,
    responses: Vec<String>,
    timeout_at: Option<usize>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockRecognizer {
    pub fn new(languages: &[&str]) -> Self {
        Self {
            languages: languages.iter().map(|s| s.to_string()).collect(),
            responses: vec!["mock transcription".to_string()],
            timeout_at: None,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Return this text for every call.
    pub fn with_response(mut self, response: &str) -> Self {
        self.responses = vec![response.to_string()];
        self
    }

    /// Return these texts one per call, cycling past the end.
    pub fn with_responses(mut self, responses: &[&str]) -> Self {
        if !responses.is_empty() {
            self.responses = responses.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    /// Time out on the call with this zero-based index.
    pub fn with_timeout_at(mut self, call_index: usize) -> Self {
        self.timeout_at = Some(call_index);
        self
    }

    /// Fail every call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of transcribe calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn transcribe(
        &self,
        _audio: &AudioClip,
        _language: &str,
    ) -> Result<String, EngineError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(EngineError::Api {
                status: 500,
                message: "mock transcription failure".to_string(),
            });
        }
        if self.timeout_at == Some(call) {
            return Err(EngineError::Timeout { seconds: 60 });
        }
        Ok(self.responses[call % self.responses.len()].clone())
    }

    fn supports(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    fn available(&self) -> Vec<String> {
        let mut languages = self.languages.clone();
        languages.sort();
        languages
    }
}

/// Mock translator with scriptable responses, keyed by `"source,dest"` pairs.
#[derive(Debug)]
pub struct MockTranslator {
    pairs: Vec<String>,
    responses: Vec<String>,
    timeout_at: Option<usize>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(pairs: &[&str]) -> Self {
        Self {
            pairs: pairs.iter().map(|s| s.to_string()).collect(),
            responses: vec!["mock translation".to_string()],
            timeout_at: None,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Return this text for every call.
    pub fn with_response(mut self, response: &str) -> Self {
        self.responses = vec![response.to_string()];
        self
    }

    /// Return these texts one per call, cycling past the end.
    pub fn with_responses(mut self, responses: &[&str]) -> Self {
        if !responses.is_empty() {
            self.responses = responses.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    /// Time out on the call with this zero-based index.
    pub fn with_timeout_at(mut self, call_index: usize) -> Self {
        self.timeout_at = Some(call_index);
        self
    }

    /// Fail every call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of translate calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        _text: &str,
        _source: &str,
        _dest: &str,
    ) -> Result<String, EngineError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(EngineError::Api {
                status: 500,
                message: "mock translation failure".to_string(),
            });
        }
        if self.timeout_at == Some(call) {
            return Err(EngineError::Timeout { seconds: 30 });
        }
        Ok(self.responses[call % self.responses.len()].clone())
    }

    fn supports_pair(&self, source: &str, dest: &str) -> bool {
        let key = format!("{source},{dest}");
        self.pairs.iter().any(|p| p == &key)
    }

    fn available(&self) -> Vec<String> {
        let mut pairs = self.pairs.clone();
        pairs.sort();
        pairs
    }
}

/// Mock synthesizer producing fixed-duration tone segments.
#[derive(Debug)]
pub struct MockSynthesizer {
    languages: Vec<String>,
    segment_ms: u64,
    sample_rate: u32,
    timeout_at: Option<usize>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockSynthesizer {
    pub fn new(languages: &[&str]) -> Self {
        Self {
            languages: languages.iter().map(|s| s.to_string()).collect(),
            segment_ms: 500,
            sample_rate: 16000,
            timeout_at: None,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Duration of every produced segment.
    pub fn with_segment_ms(mut self, segment_ms: u64) -> Self {
        self.segment_ms = segment_ms;
        self
    }

    /// Sample rate of every produced segment.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Time out on the call with this zero-based index.
    pub fn with_timeout_at(mut self, call_index: usize) -> Self {
        self.timeout_at = Some(call_index);
        self
    }

    /// Fail every call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of synthesize calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str, _language: &str) -> Result<AudioClip, EngineError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(EngineError::Api {
                status: 500,
                message: "mock synthesis failure".to_string(),
            });
        }
        if self.timeout_at == Some(call) {
            return Err(EngineError::Timeout { seconds: 30 });
        }
        let len = (self.segment_ms * self.sample_rate as u64 / 1000) as usize;
        Ok(AudioClip::new(vec![1000i16; len], self.sample_rate))
    }

    fn supports(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    fn available(&self) -> Vec<String> {
        let mut languages = self.languages.clone();
        languages.sort();
        languages
    }
}
