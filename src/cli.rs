//! Command-line interface for voxbridge
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voice-to-voice translation pipeline
#[derive(Parser, Debug)]
#[command(name = "voxbridge", version, about = "Voice-to-voice translation pipeline")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// WAV file to translate (reads stdin when omitted)
    #[arg(value_name = "WAV")]
    pub input: Option<PathBuf>,

    /// Where to write the synthesized audio (extension is set by the engine)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Source language code or name (default from config, ordinarily es)
    #[arg(short, long, value_name = "LANG")]
    pub source: Option<String>,

    /// Target language code or name (default from config, ordinarily en)
    #[arg(short, long, value_name = "LANG")]
    pub target: Option<String>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: info, -vv: debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported languages
    Languages,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_translate_args() {
        let cli = Cli::parse_from(["voxbridge", "clip.wav", "-s", "es", "-t", "en", "-o", "out"]);
        assert_eq!(cli.input.unwrap().to_str(), Some("clip.wav"));
        assert_eq!(cli.source.as_deref(), Some("es"));
        assert_eq!(cli.target.as_deref(), Some("en"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_languages_subcommand() {
        let cli = Cli::parse_from(["voxbridge", "languages"]);
        assert!(matches!(cli.command, Some(Commands::Languages)));
    }
}
