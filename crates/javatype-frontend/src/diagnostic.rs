//! Diagnostic rendering for frontend errors
//!
//! Errors are reported against the single line that produced them, with a
//! caret label under the offending span.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFile};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, WriteColor};
use serde::{Deserialize, Serialize};

use crate::error::FrontendError;

/// A diagnostic message for one input line
pub struct Diagnostic {
    inner: CsDiagnostic<()>,
    code: &'static str,
}

impl Diagnostic {
    /// Build the diagnostic for `error`.
    pub fn from_error(error: &FrontendError) -> Self {
        let code = error.code();
        let inner = CsDiagnostic::error()
            .with_message(error.to_string())
            .with_code(code)
            .with_labels(vec![Label::primary((), error.span())
                .with_message(label_message(error))]);

        let inner = match help(error) {
            Some(help) => inner.with_notes(vec![format!("help: {}", help)]),
            None => inner,
        };
        Diagnostic { inner, code }
    }

    /// Error code (e.g. "E3005").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Move the labels by `offset` bytes, for a line that starts at
    /// `offset` within a larger source.
    pub fn shifted(mut self, offset: usize) -> Self {
        for label in &mut self.inner.labels {
            label.range = label.range.start + offset..label.range.end + offset;
        }
        self
    }

    /// Write the diagnostic against `source`, read from `origin`.
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        origin: &str,
        source: &str,
    ) -> Result<(), codespan_reporting::files::Error> {
        let file = SimpleFile::new(origin, source);
        let config = term::Config::default();
        term::emit(writer, &config, &file, &self.inner)
    }

    /// Render without colour.
    pub fn render(&self, origin: &str, source: &str) -> String {
        let mut buffer = Buffer::no_color();
        if let Err(err) = self.emit(&mut buffer, origin, source) {
            return format!("error[{}]: {} ({})", self.code, self.inner.message, err);
        }
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    /// Convert to JSON representation.
    pub fn to_json(&self, origin: &str, source: &str) -> Result<String, serde_json::Error> {
        serde_json::to_string(&JsonDiagnostic::from_diagnostic(self, origin, source))
    }
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code
    pub code: String,
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// Where the line came from
    pub origin: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: String,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a diagnostic to its JSON representation.
    pub fn from_diagnostic(diag: &Diagnostic, origin: &str, source: &str) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let file = SimpleFile::new(origin, source);
        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;
                Some(JsonLabel {
                    origin: origin.to_string(),
                    line: start.line_number,
                    start_column: start.column_number,
                    end_column: end.column_number,
                    message: label.message.clone(),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.to_string(),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

fn label_message(error: &FrontendError) -> String {
    use javatype_core::TypeSystemError::*;

    match error {
        FrontendError::UnexpectedCharacter { .. } => "not allowed here".to_string(),
        FrontendError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
        FrontendError::EmptyTypeDeclaration { .. } => "no types follow".to_string(),
        FrontendError::RepeatedType { .. } => "repeated here".to_string(),
        FrontendError::VoidValue { .. } => "has no value".to_string(),
        FrontendError::UnknownCommand { .. } => "unknown command".to_string(),
        FrontendError::TypeSystem { source, .. } => match source {
            DuplicateType { .. } | DuplicateObject { .. } => "already defined".to_string(),
            UnknownParent { .. } | UndefinedType { .. } => "type not found".to_string(),
            UndefinedObject { .. } => "object not found".to_string(),
            UninitializedObject { .. } => "no actual type yet".to_string(),
            InvalidName { .. } => "invalid name".to_string(),
            DuplicateSignature { .. } => "signature already declared".to_string(),
            InvalidOverrideReturnType { expected, .. } => {
                format!("return type must be a subtype of {}", expected)
            }
            NotASubtype { sub, sup } => format!("{} is not a subtype of {}", sub, sup),
            NoMatchingSignature { .. } => "no applicable overload".to_string(),
            AmbiguousSignature { .. } => "ambiguous call".to_string(),
            NoRuntimeOverride { .. } => "no run-time target".to_string(),
        },
    }
}

fn help(error: &FrontendError) -> Option<String> {
    use javatype_core::TypeSystemError::*;

    match error {
        FrontendError::UnknownCommand { .. } => Some("type ? for the list of commands".to_string()),
        FrontendError::TypeSystem { source, .. } => match source {
            AmbiguousSignature { candidates, .. } => Some(format!(
                "candidates are {}; cast an argument to pick one",
                candidates
            )),
            UninitializedObject { name } => Some(format!("assign a value first: {} = T()", name)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;
    use javatype_core::TypeSystemError;

    fn undefined_bird() -> FrontendError {
        FrontendError::at(
            TypeSystemError::UndefinedType {
                name: "Bird".to_string(),
            },
            Span::new(10, 14),
        )
    }

    #[test]
    fn test_render_points_at_span() {
        let line = "Dog::meet(Bird)";
        let rendered = Diagnostic::from_error(&undefined_bird()).render("<stdin>", line);

        assert!(rendered.contains("error[E3005]: undefined type Bird"));
        assert!(rendered.contains("<stdin>:1:11"));
        assert!(rendered.contains("^^^^ type not found"));
    }

    #[test]
    fn test_help_note() {
        let err = FrontendError::UnknownCommand {
            command: "?x".to_string(),
            span: Span::new(0, 2),
        };
        let rendered = Diagnostic::from_error(&err).render("<stdin>", "?x");
        assert!(rendered.contains("help: type ? for the list of commands"));
    }

    #[test]
    fn test_shifted_into_script() {
        let script = "types Dog < Animal\nDog::meet(Bird)\n";
        let rendered = Diagnostic::from_error(&undefined_bird())
            .shifted(19)
            .render("zoo.jt", script);
        assert!(rendered.contains("zoo.jt:2:11"));
    }

    #[test]
    fn test_json_diagnostic() {
        let json = Diagnostic::from_error(&undefined_bird())
            .to_json("script.jt", "Dog::meet(Bird)")
            .unwrap();
        let parsed: JsonDiagnostic = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.code, "E3005");
        assert_eq!(parsed.severity, "error");
        assert_eq!(parsed.labels.len(), 1);
        assert_eq!(parsed.labels[0].line, 1);
        assert_eq!(parsed.labels[0].start_column, 11);
        assert_eq!(parsed.labels[0].end_column, 15);
        assert_eq!(parsed.labels[0].style, "primary");
    }
}
