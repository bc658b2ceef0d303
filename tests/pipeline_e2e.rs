// tests/pipeline_e2e.rs
//! End-to-end pipeline tests against the mock engines.
//!
//! This file tests:
//! 1. Full dubbing run: chunk, transcribe, merge, batch, translate, synthesize
//! 2. Overlap merging across scripted per-chunk transcripts
//! 3. Validation failures before any collaborator is called
//! 4. Timeout propagation with the documented exit code
//! 5. The proportional synthesis fallback
//! 6. Output WAV round trip through the public audio API

use std::path::Path;
use std::sync::Arc;

use redub::audio::{self, AudioClip};
use redub::engines::{MockRecognizer, MockSynthesizer, MockTranslator};
use redub::error::{EngineError, RedubError, Step};
use redub::pipeline::{PipelineConfig, PipelineOrchestrator, PipelineRequest, PipelineState};
use tempfile::tempdir;

const RATE: u32 = 16000;

/// Write a WAV fixture of sustained tone, loud enough that no window of it
/// reads as silence.
fn write_tone(path: &Path, ms: u64) {
    let samples = vec![10_000i16; (ms * u64::from(RATE) / 1000) as usize];
    audio::write_wav_file(path, &AudioClip::new(samples, RATE)).expect("write fixture");
}

/// Default pipeline config with collaborator calls serialized, so scripted
/// mock responses line up with chunk indices.
fn serial_config() -> PipelineConfig {
    PipelineConfig {
        max_concurrent_requests: 1,
        ..PipelineConfig::default()
    }
}

#[tokio::test]
async fn full_run_merges_chunks_and_writes_output() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("talk.wav");
    let output = dir.path().join("talk_hi.wav");
    // 14 s at the default 6 s window / 1 s overlap: three chunks.
    write_tone(&input, 14_000);

    let recognizer = Arc::new(MockRecognizer::new(&["english"]).with_responses(&[
        "the quick brown fox",
        "brown fox jumps over",
        "jumps over the lazy dog",
    ]));
    let translator =
        Arc::new(MockTranslator::new(&["english,hindi"]).with_response("तेज लोमड़ी कूदती है"));
    let synthesizer = Arc::new(MockSynthesizer::new(&["hindi"]).with_segment_ms(700));

    let mut orchestrator = PipelineOrchestrator::new(
        recognizer.clone(),
        translator.clone(),
        synthesizer.clone(),
        serial_config(),
    );
    let request = PipelineRequest::new(&input, "english", "hindi");

    let result = orchestrator.run(&request).await.expect("pipeline run");

    assert_eq!(orchestrator.state(), PipelineState::Done);
    assert_eq!(recognizer.call_count(), 3);
    assert_eq!(
        result.merged_transcript,
        "the quick brown fox jumps over the lazy dog"
    );
    // Nine merged words fit one 50-word batch: a single MT and TTS call.
    assert_eq!(translator.call_count(), 1);
    assert_eq!(synthesizer.call_count(), 1);
    assert_eq!(result.translated_text, "तेज लोमड़ी कूदती है");
    assert_eq!(result.audio.duration_ms(), 700);

    // The final artifact survives the same write/read path the CLI uses.
    audio::write_wav_file(&output, &result.audio).expect("write output");
    let reread = audio::read_wav_file(&output).expect("reread output");
    assert_eq!(reread.duration_ms(), 700);
    assert_eq!(reread.sample_rate, result.audio.sample_rate);
}

#[tokio::test]
async fn unknown_source_language_fails_before_any_call() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("talk.wav");
    write_tone(&input, 2_000);

    let recognizer = Arc::new(MockRecognizer::new(&["hindi"]));
    let translator = Arc::new(MockTranslator::new(&["hindi,english"]));
    let synthesizer = Arc::new(MockSynthesizer::new(&["english"]));

    let mut orchestrator = PipelineOrchestrator::new(
        recognizer.clone(),
        translator.clone(),
        synthesizer.clone(),
        serial_config(),
    );
    let request = PipelineRequest::new(&input, "klingon", "english");

    let err = orchestrator.run(&request).await.expect_err("must fail");

    assert_eq!(orchestrator.state(), PipelineState::Failed);
    assert_eq!(err.exit_code(), 2);
    assert!(matches!(
        err,
        RedubError::UnsupportedSourceLanguage { .. }
    ));
    assert_eq!(recognizer.call_count(), 0);
    assert_eq!(translator.call_count(), 0);
    assert_eq!(synthesizer.call_count(), 0);
}

#[tokio::test]
async fn transcription_timeout_maps_to_timeout_exit_code() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("talk.wav");
    write_tone(&input, 14_000);

    // Second of three chunks times out; the run fails as a whole.
    let recognizer = Arc::new(
        MockRecognizer::new(&["english"])
            .with_responses(&["first", "second", "third"])
            .with_timeout_at(1),
    );
    let translator = Arc::new(MockTranslator::new(&["english,hindi"]));
    let synthesizer = Arc::new(MockSynthesizer::new(&["hindi"]));

    let mut orchestrator = PipelineOrchestrator::new(
        recognizer,
        translator.clone(),
        synthesizer.clone(),
        serial_config(),
    );
    let request = PipelineRequest::new(&input, "english", "hindi");

    let err = orchestrator.run(&request).await.expect_err("must fail");

    assert_eq!(orchestrator.state(), PipelineState::Failed);
    assert_eq!(err.exit_code(), 4);
    match err {
        RedubError::Engine { step, source } => {
            assert_eq!(step, Step::Transcribing);
            assert!(matches!(source, EngineError::Timeout { seconds: 60 }));
        }
        other => panic!("expected engine error, got {other:?}"),
    }
    // No stage past transcription ran.
    assert_eq!(translator.call_count(), 0);
    assert_eq!(synthesizer.call_count(), 0);
}

#[tokio::test]
async fn small_batches_split_translation_and_synthesis() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("talk.wav");
    write_tone(&input, 2_000);

    let recognizer = Arc::new(MockRecognizer::new(&["english"]).with_response("one two three four"));
    let translator = Arc::new(
        MockTranslator::new(&["english,hindi"]).with_responses(&["एक दो", "तीन चार"]),
    );
    let synthesizer = Arc::new(MockSynthesizer::new(&["hindi"]));

    let config = PipelineConfig {
        batch_max_words: 2,
        ..serial_config()
    };
    let mut orchestrator = PipelineOrchestrator::new(
        recognizer,
        translator.clone(),
        synthesizer.clone(),
        config,
    );
    let request = PipelineRequest::new(&input, "english", "hindi");

    let result = orchestrator.run(&request).await.expect("pipeline run");

    assert_eq!(translator.call_count(), 2);
    assert_eq!(result.translated_text, "एक दो तीन चार");
    // Two 500 ms segments joined over a 100 ms crossfade.
    assert_eq!(synthesizer.call_count(), 2);
    assert_eq!(result.audio.duration_ms(), 900);
}

#[tokio::test]
async fn proportional_synthesis_spreads_translation_across_chunks() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("talk.wav");
    write_tone(&input, 14_000);

    let recognizer = Arc::new(MockRecognizer::new(&["english"]).with_responses(&[
        "chunk one text",
        "chunk two text",
        "chunk three text",
    ]));
    let translator =
        Arc::new(MockTranslator::new(&["english,hindi"]).with_response("एक दो तीन चार पांच छह"));
    let synthesizer = Arc::new(MockSynthesizer::new(&["hindi"]));

    let config = PipelineConfig {
        proportional_synthesis: true,
        ..serial_config()
    };
    let mut orchestrator = PipelineOrchestrator::new(
        recognizer,
        translator,
        synthesizer.clone(),
        config,
    );
    let request = PipelineRequest::new(&input, "english", "hindi");

    let result = orchestrator.run(&request).await.expect("pipeline run");

    // Six translated words over chunk durations 6000/6000/4000 ms: one
    // synthesis call per chunk share instead of per word batch.
    assert_eq!(synthesizer.call_count(), 3);
    // Three 500 ms segments joined over two 100 ms crossfades.
    assert_eq!(result.audio.duration_ms(), 1_300);
    assert_eq!(orchestrator.state(), PipelineState::Done);
}
