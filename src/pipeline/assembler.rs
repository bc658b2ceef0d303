//! Drives speech synthesis per batch and joins the results.
//!
//! Batches are synthesized concurrently up to a configured bound, restored
//! to batch order, and crossfaded into a single continuous track.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;

use crate::audio::{AudioClip, crossfade_concat};
use crate::engines::SpeechSynthesizer;
use crate::error::{EngineError, RedubError, Result, Step};

/// Synthesizes translated batches and assembles the output track.
pub struct SynthesisAssembler {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    crossfade_ms: u64,
    max_concurrent: usize,
}

impl SynthesisAssembler {
    /// Creates a new assembler.
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        crossfade_ms: u64,
        max_concurrent: usize,
    ) -> Self {
        Self {
            synthesizer,
            crossfade_ms,
            max_concurrent,
        }
    }

    /// Synthesizes one audio segment per non-empty batch, in batch order.
    ///
    /// Empty or whitespace-only batches are skipped without disturbing the
    /// order of the rest. Calls run concurrently up to the configured bound;
    /// if several fail, the failure with the lowest batch index wins.
    pub async fn synthesize(&self, batches: &[String], language: &str) -> Result<Vec<AudioClip>> {
        let work: Vec<(usize, &str)> = batches
            .iter()
            .enumerate()
            .map(|(index, batch)| (index, batch.trim()))
            .filter(|(_, batch)| !batch.is_empty())
            .collect();

        let mut results: Vec<(usize, std::result::Result<AudioClip, EngineError>)> =
            stream::iter(work)
                .map(|(index, text)| async move {
                    (index, self.synthesizer.synthesize(text, language).await)
                })
                .buffer_unordered(self.max_concurrent.max(1))
                .collect()
                .await;
        results.sort_by_key(|(index, _)| *index);

        let mut segments = Vec::with_capacity(results.len());
        for (_, result) in results {
            segments.push(result.map_err(|source| RedubError::Engine {
                step: Step::Synthesizing,
                source,
            })?);
        }
        Ok(segments)
    }

    /// Crossfades ordered segments into one track.
    pub fn concatenate(&self, segments: &[AudioClip]) -> Result<AudioClip> {
        crossfade_concat(segments, self.crossfade_ms)
    }

    /// Synthesizes all batches and concatenates the segments.
    ///
    /// Producing zero segments (every batch empty) is reported as an error,
    /// never as an empty output track.
    pub async fn assemble(&self, batches: &[String], language: &str) -> Result<AudioClip> {
        let segments = self.synthesize(batches, language).await?;
        if segments.is_empty() {
            return Err(RedubError::Invariant {
                message: "no audio segments were synthesized".to_string(),
            });
        }
        self.concatenate(&segments)
    }
}
