//! javatype command-line tool
//!
//! An interactive shell and script runner for modelling Java-style nominal
//! types, overloads and virtual dispatch.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use javatype_frontend::OutputFormat;
use std::path::PathBuf;

use commands::Settings;
use config::{ColorSetting, Config};

#[derive(Parser)]
#[command(name = "javatype")]
#[command(about = "Explore nominal subtyping, overloading and virtual dispatch", long_about = None)]
#[command(version)]
struct Cli {
    /// When to colour output
    #[arg(long, global = true, value_enum)]
    color: Option<ColorSetting>,

    /// Report format
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Configuration file (default: ./javatype.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (the default)
    Repl,

    /// Run a script file
    Run {
        /// Script to execute
        file: PathBuf,
        /// Stop at the first failing line and exit non-zero
        #[arg(long)]
        bail: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("JAVATYPE_LOG", "warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings {
        prompt: config.repl.prompt,
        history: config.repl.history,
        color: output::resolve_color_choice(cli.color.unwrap_or(config.output.color)),
        format: cli.format.unwrap_or(config.output.format),
    };
    log::debug!("settings: {:?}", settings);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => commands::repl::execute(&settings),
        Commands::Run { file, bail } => {
            let summary = commands::run::execute(&file, bail, &settings)?;
            if bail && summary.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
