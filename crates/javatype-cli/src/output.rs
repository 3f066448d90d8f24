//! Coloured terminal output for the shell and the script runner.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use std::io::Write;

use javatype_frontend::{Diagnostic, FrontendError, OutputFormat};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::config::ColorSetting;

/// Resolve `ColorChoice` from the colour setting and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > config file > auto-detect TTY.
pub fn resolve_color_choice(setting: ColorSetting) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match setting {
        ColorSetting::Always => ColorChoice::Always,
        ColorSetting::Never => ColorChoice::Never,
        ColorSetting::Auto => ColorChoice::Auto,
    }
}

/// Styled output writer for terminal.
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
    format: OutputFormat,
}

impl StyledOutput {
    /// Create a new styled output with the given color choice.
    pub fn new(choice: ColorChoice, format: OutputFormat) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
            format,
        }
    }

    /// Write text followed by newline with a specific color and style.
    pub fn writeln_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = writeln!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// Startup banner, omitted in JSON mode.
    pub fn banner(&mut self) {
        if self.format == OutputFormat::Json {
            return;
        }
        self.writeln_styled(
            &format!("javatype v{}", env!("CARGO_PKG_VERSION")),
            Some(Color::Yellow),
            true,
        );
        self.writeln_styled("? for help, q to quit", None, false);
        let _ = writeln!(self.stdout);
    }

    /// Echo a script line after the prompt, omitted in JSON mode.
    pub fn echo(&mut self, prompt: &str, line: &str) {
        if self.format == OutputFormat::Json {
            return;
        }
        let mut spec = ColorSpec::new();
        spec.set_dimmed(true);
        let _ = self.stdout.set_color(&spec);
        let _ = writeln!(self.stdout, "{}{}", prompt, line);
        let _ = self.stdout.reset();
    }

    /// Print the report lines of one statement.
    pub fn report(&mut self, lines: &[String]) {
        for line in lines {
            if line.starts_with("info:") {
                self.writeln_styled(line, Some(Color::Cyan), false);
            } else {
                self.writeln_styled(line, None, false);
            }
        }
    }

    /// Print a failed statement's diagnostic to stderr.
    ///
    /// `offset` is where the failing line starts within `source`.
    pub fn error(&mut self, err: &FrontendError, origin: &str, source: &str, offset: usize) {
        let diagnostic = Diagnostic::from_error(err).shifted(offset);
        match self.format {
            OutputFormat::Json => match diagnostic.to_json(origin, source) {
                Ok(json) => {
                    let _ = writeln!(self.stderr, "{}", json);
                }
                Err(e) => self.stderr_error(&format!("error: {}\n", e)),
            },
            OutputFormat::Pretty => {
                if let Err(e) = diagnostic.emit(&mut self.stderr, origin, source) {
                    self.stderr_error(&format!("error: {} ({})\n", err, e));
                }
            }
        }
    }

    /// Write error message to stderr.
    pub fn stderr_error(&mut self, text: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "{}", text);
        let _ = self.stderr.reset();
    }

    /// Flush both streams.
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
    }
}
