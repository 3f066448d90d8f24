//! `javatype run`: execute a script file line by line.

use anyhow::Context;
use javatype_frontend::{Interpreter, Outcome};
use std::path::Path;

use super::Settings;
use crate::output::StyledOutput;

/// What happened while running a script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines executed, comments and blanks included
    pub executed: usize,
    /// Lines that failed
    pub failed: usize,
    /// The script stopped at a `q` line
    pub quit: bool,
}

/// Run the script at `path`. With `bail`, stop at the first failing line.
pub fn execute(path: &Path, bail: bool, settings: &Settings) -> anyhow::Result<RunSummary> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read script {}", path.display()))?;
    let origin = path.display().to_string();

    let mut interp = Interpreter::new(settings.format);
    let mut out = StyledOutput::new(settings.color, settings.format);
    let summary = run_source(&mut interp, &mut out, &origin, &source, bail, &settings.prompt);
    out.flush();

    log::debug!(
        "{}: {} line(s), {} failed",
        origin,
        summary.executed,
        summary.failed
    );
    Ok(summary)
}

fn run_source(
    interp: &mut Interpreter,
    out: &mut StyledOutput,
    origin: &str,
    source: &str,
    bail: bool,
    prompt: &str,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut offset = 0;

    for raw in source.split_inclusive('\n') {
        let line = raw.trim_end_matches(&['\n', '\r'][..]);
        let start = offset;
        offset += raw.len();
        summary.executed += 1;

        if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
            out.echo(prompt, line);
        }

        match interp.execute_line(line) {
            Ok(Outcome::Quit) => {
                summary.quit = true;
                break;
            }
            Ok(Outcome::Output(lines)) => out.report(&lines),
            Err(err) => {
                summary.failed += 1;
                out.error(&err, origin, source, start);
                if bail {
                    break;
                }
            }
        }
    }
    summary
}
