//! Subcommand implementations.

pub mod repl;
pub mod run;

use javatype_frontend::OutputFormat;
use termcolor::ColorChoice;

/// Settings resolved from the config file and command-line flags
#[derive(Debug, Clone)]
pub struct Settings {
    /// Prompt shown before each line
    pub prompt: String,
    /// Keep REPL history across sessions
    pub history: bool,
    /// Terminal colour
    pub color: ColorChoice,
    /// Report line format
    pub format: OutputFormat,
}
