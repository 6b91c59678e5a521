//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::Path;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Path => handle_config_path(output),
    }
}

/// Render the effective configuration
fn handle_config_show(
    args: ConfigShowArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let content = render_config(config, args.format)?;
    output.writeln(content.trim_end())?;
    output.flush()
}

fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    let content = match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(content)
}

/// Write a default configuration file
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    init_config_file(&args.path, args.force, output)
}

fn init_config_file(path: &Path, force: bool, output: &mut OutputWriter) -> Result<()> {
    if path.exists() && !force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(path)?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Edit it to set default fields and output settings.")
}

/// List the search path, marking the file that is in effect
fn handle_config_path(output: &mut OutputWriter) -> Result<()> {
    let active = Config::find_config_file();

    for path in Config::default_config_paths() {
        let marker = if active.as_ref() == Some(&path) {
            "*"
        } else {
            " "
        };
        output.writeln(&format!("{} {}", marker, path.display()))?;
    }

    if active.is_none() {
        output.info("No configuration file found; using defaults")?;
    }
    output.flush()
}
