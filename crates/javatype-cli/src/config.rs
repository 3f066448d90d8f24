//! `javatype.toml` configuration.
//!
//! Looked up at the path given with `--config`, or `javatype.toml` in the
//! working directory. Every key is optional:
//!
//! ```toml
//! [repl]
//! prompt = "> "
//! history = true
//!
//! [output]
//! color = "auto"
//! format = "pretty"
//! ```

use anyhow::Context;
use clap::ValueEnum;
use javatype_frontend::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "javatype.toml";

/// When to colour terminal output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Colour when writing to a terminal
    #[default]
    Auto,
    /// Always colour
    Always,
    /// Never colour
    Never,
}

/// `[repl]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    pub prompt: String,
    pub history: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            history: true,
        }
    }
}

/// `[output]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub color: ColorSetting,
    pub format: OutputFormat,
}

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub repl: ReplConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(CONFIG_FILE);
                if !path.exists() {
                    log::debug!("no {} found, using defaults", CONFIG_FILE);
                    return Ok(Self::default());
                }
                path
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
[repl]
prompt = "jt> "

[output]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.repl.prompt, "jt> ");
        assert!(config.repl.history);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.color, ColorSetting::Auto);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::parse("[repl]\nprompt = \"> \"\ncolour = true\n").is_err());
        assert!(Config::parse("[output]\nformat = \"yaml\"\n").is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());

        let path = dir.path().join("javatype.toml");
        std::fs::write(&path, "[output]\ncolor = \"never\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output.color, ColorSetting::Never);
    }
}
