//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Pipestat CLI - Running statistics over streams of records
///
/// Watch a stream of JSON records, pass them through unchanged and keep
/// running sum, average, minimum and maximum for selected numeric fields.
#[derive(Parser, Debug)]
#[command(
    name = "pipestat",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "PIPESTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pass records through while tracking statistics on numeric fields
    Watch(WatchArgs),

    /// Render numbers as byte magnitudes (e.g. 1536 -> 1.5 KB)
    FormatBytes(FormatBytesArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the watch command
#[derive(Parser, Debug, Clone)]
pub struct WatchArgs {
    /// Input files; reads stdin when none are given or for `-`
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Field to track (repeatable, or comma separated)
    #[arg(short, long = "field", value_name = "NAME", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Emit only the final statistics instead of passing records through
    #[arg(short, long)]
    pub stats: bool,

    /// Render statistics as byte magnitudes
    #[arg(short, long)]
    pub bytes: bool,

    /// Do not show live progress snapshots
    #[arg(long)]
    pub no_progress: bool,

    /// How input records are framed
    #[arg(long, value_enum, default_value = "jsonl")]
    pub input_format: InputFormat,

    /// Warn about and drop malformed input instead of failing
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Arguments for the format-bytes command
#[derive(Parser, Debug)]
pub struct FormatBytesArgs {
    /// Values to format
    #[arg(value_name = "VALUE", required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration values
    Show(ConfigShowArgs),

    /// Write a default project configuration file
    Init(ConfigInitArgs),

    /// List the configuration search path and the active file
    Path,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file
    #[arg(long, default_value = ".pipestat.toml")]
    pub path: PathBuf,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Framing of input records
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// One JSON value per line
    Jsonl,
    /// A single JSON array of records
    Json,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl OutputFormat {
    /// Parse the `output.format` config value
    pub fn from_config(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "json-pretty" | "json_pretty" => Some(Self::JsonPretty),
            "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: None,
            no_color: false,
            command: Commands::FormatBytes(FormatBytesArgs { values: vec![1.0] }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli { quiet: true, ..cli };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_watch_fields_split_on_commas() {
        let cli = Cli::parse_from([
            "pipestat", "watch", "-f", "Length,Blocks", "--field", "Mode", "--stats", "in.jsonl",
        ]);
        let Commands::Watch(args) = cli.command else {
            panic!("expected watch command");
        };
        assert_eq!(args.fields, vec!["Length", "Blocks", "Mode"]);
        assert!(args.stats);
        assert!(!args.bytes);
        assert_eq!(args.inputs, vec![PathBuf::from("in.jsonl")]);
        assert_eq!(args.input_format, InputFormat::Jsonl);
    }

    #[test]
    fn test_format_bytes_accepts_negative_values() {
        let cli = Cli::parse_from(["pipestat", "format-bytes", "1536", "-2048"]);
        let Commands::FormatBytes(args) = cli.command else {
            panic!("expected format-bytes command");
        };
        assert_eq!(args.values, vec![1536.0, -2048.0]);
    }

    #[test]
    fn test_output_format_from_config() {
        assert_eq!(OutputFormat::from_config("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_config("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_config("xml"), None);
    }
}
