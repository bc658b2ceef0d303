use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;

use redub::audio;
use redub::cli::{Cli, Commands};
use redub::config::Config;
use redub::engines::{HttpRecognizer, HttpSynthesizer, HttpTranslator};
use redub::error::RedubError;
use redub::pipeline::{PipelineOrchestrator, PipelineRequest};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "redub:".red(), e);
        std::process::exit(exit_code(&e));
    }
}

/// Map an error chain onto the documented process exit codes.
///
/// Pipeline errors carry their own code (2 input, 3 collaborator,
/// 4 timeout); anything else, config loading included, exits 1.
fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<RedubError>()
        .map(RedubError::exit_code)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Languages) => {
            let config = load_config(cli.config.as_deref())?;
            print_languages(&config);
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "redub", &mut std::io::stdout());
            Ok(())
        }
        None => run_dub(cli).await,
    }
}

/// Run the dubbing pipeline for one recording.
async fn run_dub(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    let input = require(cli.input, "--input")?;
    let source = require(cli.source, "--source")?;
    let dest = require(cli.dest, "--dest")?;
    let output = require(cli.output, "--output")?;

    let engines_configured = !config.languages.asr.is_empty()
        || !config.languages.mt.is_empty()
        || !config.languages.tts.is_empty();
    if engines_configured && config.api.access_token.is_empty() {
        bail!("no access token configured; set api.access_token in the config file or export REDUB_TOKEN");
    }

    let mut pipeline_config = config.pipeline.clone();
    if let Some(ms) = cli.chunk_duration {
        pipeline_config.chunk_duration_ms = ms;
    }
    if let Some(ms) = cli.overlap {
        pipeline_config.overlap_ms = ms;
    }
    if let Some(words) = cli.batch_words {
        pipeline_config.batch_max_words = words;
    }
    if cli.proportional_synthesis {
        pipeline_config.proportional_synthesis = true;
    }

    let recognizer = Arc::new(
        HttpRecognizer::with_timeout(
            config.languages.asr.clone(),
            &config.api.access_token,
            config.api.asr_timeout_secs,
        )
        .context("failed to initialize the ASR client")?,
    );
    let translator = Arc::new(
        HttpTranslator::with_timeout(
            config.languages.mt.clone(),
            &config.api.access_token,
            config.api.mt_timeout_secs,
        )
        .context("failed to initialize the MT client")?,
    );
    let synthesizer = Arc::new(
        HttpSynthesizer::with_timeout(
            config.languages.tts.clone(),
            &config.api.access_token,
            config.api.tts_timeout_secs,
        )
        .context("failed to initialize the TTS client")?
        .with_gender(&config.api.tts_gender),
    );

    if !cli.quiet {
        eprintln!("Dubbing {} ({} -> {})...", input.display(), source, dest);
    }

    let mut orchestrator =
        PipelineOrchestrator::new(recognizer, translator, synthesizer, pipeline_config)
            .with_verbosity(cli.verbose);
    let request = PipelineRequest::new(&input, &source, &dest);
    let result = orchestrator.run(&request).await?;

    audio::write_wav_file(&output, &result.audio)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if !cli.quiet {
        println!("{} {}", "transcript:".bold(), result.merged_transcript);
        println!("{} {}", "translation:".bold(), result.translated_text);
        eprintln!(
            "{} {} ({} ms)",
            "Wrote".green(),
            output.display(),
            result.audio.duration_ms()
        );
    }

    Ok(())
}

/// Reject a missing flag with the same error shape the pipeline uses,
/// so misuse exits with the input-error code.
fn require<T>(value: Option<T>, flag: &str) -> Result<T> {
    match value {
        Some(v) => Ok(v),
        None => Err(RedubError::InvalidParameter {
            name: flag.to_string(),
            message: "missing (required to run the pipeline)".to_string(),
        }
        .into()),
    }
}

fn print_languages(config: &Config) {
    print_capability("ASR (source languages)", &config.languages.asr);
    print_capability("MT (source,dest pairs)", &config.languages.mt);
    print_capability("TTS (destination languages)", &config.languages.tts);
}

fn print_capability(label: &str, map: &HashMap<String, String>) {
    println!("{}:", label);
    if map.is_empty() {
        println!("  (none configured)");
        return;
    }
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    for key in keys {
        println!("  {} {}", "●".green(), key);
    }
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/redub/config.toml)
///
/// Environment variable overrides apply on top of either.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };

    Ok(config.with_env_overrides())
}
