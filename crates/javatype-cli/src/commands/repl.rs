//! `javatype repl`: interactive session.
//!
//! Line editing and history come from rustyline; every line is handed to the
//! interpreter and its report or diagnostic is printed straight away.

use javatype_frontend::{Interpreter, Outcome};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

use super::Settings;
use crate::output::StyledOutput;

/// Location of the history file under the home directory.
pub fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".javatype").join("history"))
}

pub fn execute(settings: &Settings) -> anyhow::Result<()> {
    let mut interp = Interpreter::new(settings.format);
    let mut out = StyledOutput::new(settings.color, settings.format);
    let mut editor = DefaultEditor::new()?;

    let history = if settings.history { history_path() } else { None };
    if let Some(ref path) = history {
        let _ = editor.load_history(path);
    }

    out.banner();

    loop {
        match editor.readline(&settings.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }

                match interp.execute_line(&line) {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Output(lines)) => out.report(&lines),
                    Err(err) => {
                        log::debug!("statement failed: {:?}", err);
                        out.error(&err, "<stdin>", &line, 0);
                    }
                }
                out.flush();
            }
            Err(ReadlineError::Interrupted) => {
                println!("(To exit, press Ctrl+D or type q)");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                out.stderr_error(&format!("error: {}\n", e));
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.save_history(path);
    }

    Ok(())
}
