//! Pipestat CLI - Running statistics over streams of records
//!
//! This is the main entry point for the Pipestat CLI application, providing
//! commands for watching record streams, formatting byte magnitudes and
//! managing configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Load configuration before logging so the file can set the log level
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e),
    };

    // Initialize logging
    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    match run(cli, config).await {
        Ok(()) => process::exit(0),
        Err(e) if e.is_broken_pipe() => process::exit(0),
        Err(e) => exit_with_error(&e),
    }
}

fn exit_with_error(e: &error::Error) -> ! {
    eprintln!(
        "{}",
        error::format_error(e, control::SHOULD_COLORIZE.should_colorize())
    );

    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    process::exit(e.exit_code());
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli
        .output
        .or_else(|| OutputFormat::from_config(&config.output.format))
        .unwrap_or(OutputFormat::Human);
    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    // Create output writer
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Watch(args) => handlers::handle_watch(args, &config, &mut output).await,
        Commands::FormatBytes(args) => handlers::handle_format_bytes(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => {
            handlers::handle_completions(args, &mut std::io::stdout().lock())
        }
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    // Create logging configuration from CLI args, the config file and environment
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_file(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["pipestat", "watch", "-f", "Length"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["pipestat", "-vv", "watch", "-f", "Length"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["pipestat", "--quiet", "format-bytes", "10"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(cli.quiet);
    }
}
