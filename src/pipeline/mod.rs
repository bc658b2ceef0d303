//! The dubbing pipeline: audio in one language, speech out in another.
//!
//! Stages run strictly forward, each consuming the previous stage's output:
//!
//! ```text
//! input WAV -> chunker -> ASR -> merger -> batcher -> MT -> assembler -> output WAV
//!              (windows)  (text    (one      (word     (text   (TTS + crossfade)
//!                          per      string)   batches)  per
//!                          chunk)                       batch)
//! ```
//!
//! The orchestrator drives the stages and owns the collaborator engines;
//! everything between the engines is pure local computation.

pub mod assembler;
pub mod batcher;
pub mod chunker;
pub mod merger;
pub mod orchestrator;
pub mod types;

pub use assembler::SynthesisAssembler;
pub use batcher::TextBatcher;
pub use chunker::{AudioChunker, ChunkerConfig};
pub use merger::TranscriptMerger;
pub use orchestrator::{PipelineConfig, PipelineOrchestrator};
pub use types::{AudioChunk, PipelineOutput, PipelineRequest, PipelineState};
