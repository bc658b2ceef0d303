//! Command-line interface for redub
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Speech-to-speech dubbing for WAV recordings
#[derive(Parser, Debug)]
#[command(
    name = "redub",
    version,
    about = "Speech-to-speech dubbing for WAV recordings"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: stage progress, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Input WAV recording
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Language spoken in the input (e.g. hindi)
    #[arg(long, short = 's', value_name = "LANG")]
    pub source: Option<String>,

    /// Language to dub into (e.g. english)
    #[arg(long, short = 'd', value_name = "LANG")]
    pub dest: Option<String>,

    /// Where to write the dubbed WAV
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Chunk window duration. Examples: 6, 6s, 6500ms
    #[arg(long, short = 'c', value_name = "DURATION", value_parser = parse_duration_ms)]
    pub chunk_duration: Option<u64>,

    /// Overlap between consecutive chunks. Examples: 1, 1s, 500ms
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_ms)]
    pub overlap: Option<u64>,

    /// Maximum words per translation batch
    #[arg(long, value_name = "WORDS")]
    pub batch_words: Option<usize>,

    /// Spread the translation across chunk durations instead of
    /// synthesizing per batch
    #[arg(long)]
    pub proportional_synthesis: bool,
}

/// Parse a duration string into milliseconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`6s`, `500ms`), and compound (`1m30s`).
fn parse_duration_ms(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs * 1000);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_millis() as u64)
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configured languages and language pairs
    Languages,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_no_arguments() {
        let cli = Cli::try_parse_from(["redub"]).unwrap();

        assert!(cli.command.is_none());
        assert!(cli.input.is_none());
        assert!(cli.source.is_none());
        assert!(cli.dest.is_none());
        assert!(cli.output.is_none());
        assert!(cli.chunk_duration.is_none());
        assert!(cli.overlap.is_none());
        assert!(cli.batch_words.is_none());
        assert!(!cli.proportional_synthesis);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_full_run() {
        let cli = Cli::try_parse_from([
            "redub",
            "--input",
            "speech.wav",
            "--source",
            "hindi",
            "--dest",
            "english",
            "--output",
            "dubbed.wav",
            "--chunk-duration",
            "8s",
            "--overlap",
            "500ms",
            "--batch-words",
            "30",
            "--proportional-synthesis",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("speech.wav")));
        assert_eq!(cli.source.as_deref(), Some("hindi"));
        assert_eq!(cli.dest.as_deref(), Some("english"));
        assert_eq!(cli.output, Some(PathBuf::from("dubbed.wav")));
        assert_eq!(cli.chunk_duration, Some(8000));
        assert_eq!(cli.overlap, Some(500));
        assert_eq!(cli.batch_words, Some(30));
        assert!(cli.proportional_synthesis);
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from([
            "redub", "-i", "in.wav", "-s", "hindi", "-d", "english", "-o", "out.wav", "-c", "6",
        ])
        .unwrap();

        assert_eq!(cli.input, Some(PathBuf::from("in.wav")));
        assert_eq!(cli.chunk_duration, Some(6000));
    }

    #[test]
    fn test_parse_verbose_single() {
        let cli = Cli::try_parse_from(["redub", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_verbose_double() {
        let cli = Cli::try_parse_from(["redub", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_verbose_repeated_flags() {
        let cli = Cli::try_parse_from(["redub", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_quiet_short_flag() {
        let cli = Cli::try_parse_from(["redub", "-q"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::try_parse_from(["redub", "--config", "/path/to/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_parse_languages_subcommand() {
        let cli = Cli::try_parse_from(["redub", "languages"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Languages)));
    }

    #[test]
    fn test_parse_completions_subcommand() {
        let cli = Cli::try_parse_from(["redub", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn test_global_options_after_command() {
        let cli =
            Cli::try_parse_from(["redub", "languages", "--config", "/tmp/config.toml"]).unwrap();

        assert!(matches!(cli.command, Some(Commands::Languages)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
    }

    #[test]
    fn test_invalid_command_returns_error() {
        let result = Cli::try_parse_from(["redub", "invalid"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["redub", "--help"]);

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["redub", "--version"]);

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_duration_parser_accepts_common_forms() {
        assert_eq!(parse_duration_ms("6"), Ok(6000));
        assert_eq!(parse_duration_ms("6s"), Ok(6000));
        assert_eq!(parse_duration_ms("500ms"), Ok(500));
        assert_eq!(parse_duration_ms("1m30s"), Ok(90_000));
        assert_eq!(parse_duration_ms(" 2s "), Ok(2000));
    }

    #[test]
    fn test_duration_parser_rejects_garbage() {
        assert!(parse_duration_ms("soon").is_err());
        assert!(parse_duration_ms("").is_err());
    }

    #[test]
    fn test_invalid_duration_flag_is_a_parse_error() {
        let result = Cli::try_parse_from(["redub", "--chunk-duration", "whenever"]);
        assert!(result.is_err());
    }
}
