//! Sequences the dubbing pipeline from input file to output track.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use serde::{Deserialize, Serialize};

use crate::audio;
use crate::defaults;
use crate::engines::{SpeechRecognizer, SpeechSynthesizer, Translator};
use crate::error::{EngineError, RedubError, Result, Step};
use crate::pipeline::assembler::SynthesisAssembler;
use crate::pipeline::batcher::TextBatcher;
use crate::pipeline::chunker::{AudioChunker, ChunkerConfig};
use crate::pipeline::merger::TranscriptMerger;
use crate::pipeline::types::{AudioChunk, PipelineOutput, PipelineRequest, PipelineState};

/// Immutable parameters for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Nominal chunk window length in milliseconds.
    pub chunk_duration_ms: u64,
    /// Overlap between consecutive chunk windows, in milliseconds.
    pub overlap_ms: u64,
    /// Maximum words per translation batch.
    pub batch_max_words: usize,
    /// Loudness at or below this many dBFS counts as silence.
    pub silence_threshold_db: f32,
    /// Minimum sustained silence for a chunk boundary, in milliseconds.
    pub min_silence_ms: u64,
    /// Window tail searched for a silence boundary, in milliseconds.
    pub boundary_search_ms: u64,
    /// Minimum audio a boundary trim leaves in place, in milliseconds.
    pub boundary_buffer_ms: u64,
    /// Granularity of the silence scan, in milliseconds.
    pub silence_seek_step_ms: u64,
    /// Crossfade applied between synthesized segments, in milliseconds.
    pub crossfade_ms: u64,
    /// Bound on concurrent collaborator calls within one stage.
    pub max_concurrent_requests: usize,
    /// Use the fallback path: translate first, then spread the translation
    /// back across chunk durations and synthesize per chunk share.
    pub proportional_synthesis: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_duration_ms: defaults::CHUNK_DURATION_MS,
            overlap_ms: defaults::OVERLAP_MS,
            batch_max_words: defaults::BATCH_MAX_WORDS,
            silence_threshold_db: defaults::SILENCE_THRESHOLD_DB,
            min_silence_ms: defaults::MIN_SILENCE_MS,
            boundary_search_ms: defaults::BOUNDARY_SEARCH_MS,
            boundary_buffer_ms: defaults::BOUNDARY_BUFFER_MS,
            silence_seek_step_ms: defaults::SILENCE_SEEK_STEP_MS,
            crossfade_ms: defaults::CROSSFADE_MS,
            max_concurrent_requests: defaults::MAX_CONCURRENT_REQUESTS,
            proportional_synthesis: false,
        }
    }
}

impl PipelineConfig {
    /// Checks parameter bounds. Violations are input errors.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_duration_ms == 0 {
            return Err(RedubError::InvalidParameter {
                name: "chunk_duration_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.overlap_ms >= self.chunk_duration_ms {
            return Err(RedubError::InvalidParameter {
                name: "overlap_ms".to_string(),
                message: format!(
                    "must be smaller than the chunk duration ({} ms)",
                    self.chunk_duration_ms
                ),
            });
        }
        if self.batch_max_words == 0 {
            return Err(RedubError::InvalidParameter {
                name: "batch_max_words".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.max_concurrent_requests == 0 {
            return Err(RedubError::InvalidParameter {
                name: "max_concurrent_requests".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    fn chunker_config(&self) -> ChunkerConfig {
        ChunkerConfig {
            chunk_duration_ms: self.chunk_duration_ms,
            overlap_ms: self.overlap_ms,
            silence_threshold_db: self.silence_threshold_db,
            min_silence_ms: self.min_silence_ms,
            boundary_search_ms: self.boundary_search_ms,
            boundary_buffer_ms: self.boundary_buffer_ms,
            seek_step_ms: self.silence_seek_step_ms,
        }
    }
}

/// Runs the dubbing pipeline against pluggable collaborator engines.
///
/// One orchestrator runs one job at a time; `state()` reports the stage it
/// is in. A failed run leaves the orchestrator in `Failed` with the error
/// naming the failing stage. Nothing accumulated before a failure is
/// exposed: the run either completes all stages or reports the first one
/// that broke.
pub struct PipelineOrchestrator {
    recognizer: Arc<dyn SpeechRecognizer>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: PipelineConfig,
    verbosity: u8,
    state: PipelineState,
}

impl PipelineOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            recognizer,
            translator,
            synthesizer,
            config,
            verbosity: 0,
            state: PipelineState::Validating,
        }
    }

    /// Set verbosity for stage diagnostics on stderr.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Stage the orchestrator is currently in.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs the whole pipeline for one request.
    pub async fn run(&mut self, request: &PipelineRequest) -> Result<PipelineOutput> {
        match self.execute(request).await {
            Ok(output) => {
                self.state = PipelineState::Done;
                Ok(output)
            }
            Err(error) => {
                self.state = PipelineState::Failed;
                Err(error)
            }
        }
    }

    async fn execute(&mut self, request: &PipelineRequest) -> Result<PipelineOutput> {
        self.state = PipelineState::Validating;
        self.config.validate()?;
        self.validate_request(request)?;

        self.state = PipelineState::Chunking;
        let audio = audio::read_wav_file(&request.input)?;
        if audio.is_empty() {
            return Err(RedubError::EmptyAudio {
                path: request.input.display().to_string(),
            });
        }
        let chunks = AudioChunker::new(self.config.chunker_config()).chunk(&audio);
        if chunks.is_empty() {
            return Err(RedubError::Invariant {
                message: "chunking non-empty audio produced no chunks".to_string(),
            });
        }
        if self.verbosity >= 1 {
            eprintln!(
                "  [chunking: {} chunks from {}ms]",
                chunks.len(),
                audio.duration_ms()
            );
        }
        if self.verbosity >= 2 {
            for chunk in &chunks {
                eprintln!(
                    "  [chunk {}: {}..{}ms]",
                    chunk.index, chunk.start_ms, chunk.end_ms
                );
            }
        }

        self.state = PipelineState::Transcribing;
        let transcripts = self
            .transcribe_chunks(&chunks, &request.source_lang)
            .await?;
        if transcripts.iter().all(|t| t.trim().is_empty()) {
            return Err(RedubError::Engine {
                step: Step::Transcribing,
                source: EngineError::Empty("produced no text for any chunk".to_string()),
            });
        }

        self.state = PipelineState::Merging;
        let merged_transcript = TranscriptMerger::new().merge(&transcripts);
        if self.verbosity >= 1 {
            eprintln!(
                "  [merged transcript: {} words]",
                merged_transcript.split_whitespace().count()
            );
        }

        self.state = PipelineState::Batching;
        let batches = TextBatcher::new(self.config.batch_max_words).batch(&merged_transcript);

        self.state = PipelineState::Translating;
        let translated = self
            .translate_batches(&batches, &request.source_lang, &request.dest_lang)
            .await?;
        if translated.iter().all(|t| t.trim().is_empty()) {
            return Err(RedubError::Engine {
                step: Step::Translating,
                source: EngineError::Empty("produced no text for any batch".to_string()),
            });
        }
        let translated_text = joined(&translated);

        self.state = PipelineState::Synthesizing;
        let synthesis_input = if self.config.proportional_synthesis {
            let durations: Vec<u64> = chunks.iter().map(AudioChunk::duration_ms).collect();
            TextBatcher::new(self.config.batch_max_words).redistribute(&translated_text, &durations)
        } else {
            translated
        };
        let assembler = SynthesisAssembler::new(
            Arc::clone(&self.synthesizer),
            self.config.crossfade_ms,
            self.config.max_concurrent_requests,
        );
        let segments = assembler
            .synthesize(&synthesis_input, &request.dest_lang)
            .await?;
        if segments.is_empty() {
            return Err(RedubError::Invariant {
                message: "no audio segments were synthesized".to_string(),
            });
        }
        if self.verbosity >= 1 {
            eprintln!("  [synthesized {} segments]", segments.len());
        }

        self.state = PipelineState::Assembling;
        let output_audio = assembler.concatenate(&segments)?;
        if self.verbosity >= 1 {
            eprintln!("  [assembled {}ms]", output_audio.duration_ms());
        }

        Ok(PipelineOutput {
            merged_transcript,
            translated_text,
            audio: output_audio,
        })
    }

    /// Rejects a request the collaborators cannot serve.
    ///
    /// Runs before the audio file is opened, so an unsupported language
    /// never costs a decode.
    fn validate_request(&self, request: &PipelineRequest) -> Result<()> {
        if !request.input.exists() {
            return Err(RedubError::InputFileNotFound {
                path: request.input.display().to_string(),
            });
        }
        if !self.recognizer.supports(&request.source_lang) {
            return Err(RedubError::UnsupportedSourceLanguage {
                language: request.source_lang.clone(),
                available: self.recognizer.available(),
            });
        }
        if !self
            .translator
            .supports_pair(&request.source_lang, &request.dest_lang)
        {
            return Err(RedubError::UnsupportedLanguagePair {
                source_lang: request.source_lang.clone(),
                dest: request.dest_lang.clone(),
                available: self.translator.available(),
            });
        }
        if !self.synthesizer.supports(&request.dest_lang) {
            return Err(RedubError::UnsupportedTargetLanguage {
                language: request.dest_lang.clone(),
                available: self.synthesizer.available(),
            });
        }
        Ok(())
    }

    /// Transcribes every chunk, bounded-concurrently, in chunk order.
    async fn transcribe_chunks(
        &self,
        chunks: &[AudioChunk],
        language: &str,
    ) -> Result<Vec<String>> {
        let mut results: Vec<(usize, std::result::Result<String, EngineError>)> =
            stream::iter(chunks.iter())
                .map(|chunk| async move {
                    (
                        chunk.index,
                        self.recognizer.transcribe(&chunk.audio, language).await,
                    )
                })
                .buffer_unordered(self.config.max_concurrent_requests.max(1))
                .collect()
                .await;
        results.sort_by_key(|(index, _)| *index);

        let mut transcripts = Vec::with_capacity(results.len());
        for (_, result) in results {
            transcripts.push(result.map_err(|source| RedubError::Engine {
                step: Step::Transcribing,
                source,
            })?);
        }
        Ok(transcripts)
    }

    /// Translates every batch, bounded-concurrently, in batch order.
    async fn translate_batches(
        &self,
        batches: &[String],
        source: &str,
        dest: &str,
    ) -> Result<Vec<String>> {
        let mut results: Vec<(usize, std::result::Result<String, EngineError>)> =
            stream::iter(batches.iter().enumerate())
                .map(|(index, batch)| async move {
                    (index, self.translator.translate(batch, source, dest).await)
                })
                .buffer_unordered(self.config.max_concurrent_requests.max(1))
                .collect()
                .await;
        results.sort_by_key(|(index, _)| *index);

        let mut translated = Vec::with_capacity(results.len());
        for (_, result) in results {
            translated.push(result.map_err(|source| RedubError::Engine {
                step: Step::Translating,
                source,
            })?);
        }
        Ok(translated)
    }
}

/// Joins non-empty pieces with single spaces.
fn joined(pieces: &[String]) -> String {
    pieces
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
