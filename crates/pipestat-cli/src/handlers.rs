//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod config;
mod format_bytes;
pub mod input;
mod watch;

pub use completions::handle_completions;
pub use config::handle_config;
pub use format_bytes::handle_format_bytes;
pub use watch::handle_watch;
