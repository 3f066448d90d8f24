//! Line interpreter over a [`Session`]
//!
//! Each input line is either a comment, an interactive command (`?`, `?t`,
//! `?o`, `?v`, `?s A B`, `q`) or a statement. Executing a line yields the
//! report lines it produced; a failed line leaves the session as it was.

use std::fmt;
use std::str::FromStr;

use javatype_core::types::OBJECT_NAME;
use javatype_core::{
    CallResolution, MethodEntry, ObjectEntry, Session, Signature, TypeEntry, TypeId,
    TypeSystemError,
};
use serde::{Deserialize, Serialize};

use crate::ast::{Call, Name, Rhs, Statement};
use crate::error::{FrontendError, Result};
use crate::parser::parse_statement;
use crate::token::Span;

const HELP: &[&str] = &[
    "?                          print this help message",
    "?t                         dump types",
    "?o                         dump objects",
    "?v                         dump all methods",
    "?s A B                     check whether A <: B",
    "q                          quit",
    "",
    "types A < B < C, D         declare type chains",
    "T::m(P1, P2) [return R]    declare a method",
    "T x [= rhs]                declare an object",
    "x = rhs                    set the actual type of an object",
    "x.m(y, (T)z)               resolve a call",
    "",
    "rhs is one of: obj, (T)obj, T(), x.m(...)",
];

/// How report lines are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Result of executing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Lines to print, possibly none
    Output(Vec<String>),
    /// The user asked to quit
    Quit,
}

impl Outcome {
    /// Output lines, empty for [`Outcome::Quit`].
    pub fn lines(&self) -> &[String] {
        match self {
            Outcome::Output(lines) => lines,
            Outcome::Quit => &[],
        }
    }
}

/// One printable fact
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Report {
    Type(TypeEntry),
    Object(ObjectEntry),
    Method(MethodEntry),
    Call(CallResolution),
    Subtype { sub: String, sup: String, holds: bool },
    Info { message: String },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Type(entry) => write!(f, "{}", entry),
            Report::Object(entry) => write!(f, "{}", entry),
            Report::Method(entry) => write!(f, "{}", entry),
            Report::Call(call) => write!(f, "{}", call),
            Report::Subtype { sub, sup, holds } => {
                if *holds {
                    write!(f, "{} <: {}", sub, sup)
                } else {
                    write!(f, "{} </: {}", sub, sup)
                }
            }
            Report::Info { message } => write!(f, "info: {}", message),
        }
    }
}

/// Executes lines against one session
#[derive(Debug, Default)]
pub struct Interpreter {
    session: Session,
    format: OutputFormat,
}

impl Interpreter {
    /// Create an interpreter with a fresh session.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            session: Session::new(),
            format,
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Change the output format.
    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Execute one line of input.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Outcome::Output(Vec::new()));
        }
        if trimmed == "q" {
            return Ok(Outcome::Quit);
        }
        if trimmed.starts_with('?') {
            return self.command(line).map(Outcome::Output);
        }

        let statement = parse_statement(line)?;
        self.execute(&statement).map(Outcome::Output)
    }

    /// Execute a parsed statement.
    pub fn execute(&mut self, statement: &Statement) -> Result<Vec<String>> {
        let mut out = Vec::new();
        match statement {
            Statement::Types { chains } => self.declare_types(chains, &mut out)?,
            Statement::Method {
                declaring,
                name,
                params,
                return_type,
            } => self.declare_method(declaring, name, params, return_type.as_ref(), &mut out)?,
            Statement::Object { ty, name, value } => {
                self.declare_object(ty, name, value.as_ref(), &mut out)?
            }
            Statement::Assign { target, value } => self.assign(target, value, &mut out)?,
            Statement::Call(call) => {
                let resolution = self.call(call)?;
                self.report(&mut out, Report::Call(resolution), true);
            }
        }
        Ok(out)
    }

    // ── Commands ────────────────────────────────────────────────────────

    fn command(&self, line: &str) -> Result<Vec<String>> {
        let words = words(line);
        let Some(&(command, span)) = words.first() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        match command {
            "?" => out.extend(HELP.iter().map(|line| line.to_string())),
            "?t" => {
                for entry in self.session.types() {
                    self.report(&mut out, Report::Type(entry), false);
                }
            }
            "?o" => {
                for entry in self.session.objects() {
                    self.report(&mut out, Report::Object(entry), false);
                }
            }
            "?v" => {
                for entry in self.session.methods() {
                    self.report(&mut out, Report::Method(entry), false);
                }
            }
            "?s" => {
                let [_, (sub, sub_span), (sup, sup_span)] = words[..] else {
                    let end = words.last().map(|(_, span)| *span).unwrap_or(span);
                    return Err(FrontendError::UnexpectedToken {
                        expected: "two type names".to_string(),
                        found: format!("{} argument(s)", words.len() - 1),
                        span: span.merge(&end),
                    });
                };
                let sub_id = self.type_id(sub, sub_span)?;
                let sup_id = self.type_id(sup, sup_span)?;
                let holds = self.session.graph().is_subtype(sub_id, sup_id);
                self.report(
                    &mut out,
                    Report::Subtype {
                        sub: sub.to_string(),
                        sup: sup.to_string(),
                        holds,
                    },
                    false,
                );
            }
            other => {
                return Err(FrontendError::UnknownCommand {
                    command: other.to_string(),
                    span,
                })
            }
        }
        Ok(out)
    }

    // ── Declarations ────────────────────────────────────────────────────

    /// Declare every type of every chain, or none of them.
    ///
    /// A type may appear in several chains as long as every chain gives it
    /// the same parent. The last type of a chain names no parent, so it may
    /// already exist anywhere in the hierarchy.
    fn declare_types(&mut self, chains: &[Vec<Name>], out: &mut Vec<String>) -> Result<()> {
        let graph = self.session.graph();
        let mut planned: Vec<(&Name, &str)> = Vec::new();
        let mut reports = Vec::new();

        for chain in chains {
            for (i, name) in chain.iter().enumerate() {
                if chain[..i].iter().any(|earlier| earlier.text == name.text) {
                    return Err(FrontendError::RepeatedType {
                        name: name.text.clone(),
                        span: name.span,
                    });
                }

                let next = chain.get(i + 1);
                let parent = next.map_or(OBJECT_NAME, |next| next.text.as_str());
                let conflict = || {
                    FrontendError::at(
                        TypeSystemError::DuplicateType {
                            name: name.text.clone(),
                        },
                        name.span,
                    )
                };

                if let Some(&(_, planned_parent)) =
                    planned.iter().find(|(other, _)| other.text == name.text)
                {
                    if next.is_some() && planned_parent != parent {
                        return Err(conflict());
                    }
                    continue;
                }

                match graph.lookup(&name.text) {
                    // The last type of a chain keeps whatever parent it already has
                    Some(existing)
                        if next.is_none() || graph.lookup(parent) == graph.parent(existing) =>
                    {
                        reports.push(Report::Info {
                            message: format!("type {} already exists", name.text),
                        });
                    }
                    Some(_) => return Err(conflict()),
                    None => {
                        planned.push((name, parent));
                        reports.push(Report::Type(TypeEntry {
                            name: name.text.clone(),
                            parent: Some(parent.to_string()),
                        }));
                    }
                }
            }
        }

        // Define parents before their children
        let declared = planned.len();
        let mut pending = planned;
        while let Some(index) = pending
            .iter()
            .position(|(_, parent)| self.session.graph().lookup(parent).is_some())
        {
            let (name, parent) = pending.remove(index);
            self.session
                .define_type(&name.text, parent)
                .map_err(|err| FrontendError::at(err, name.span))?;
        }
        if let Some((name, parent)) = pending.first() {
            return Err(FrontendError::at(
                TypeSystemError::UnknownParent {
                    name: name.text.clone(),
                    parent: parent.to_string(),
                },
                name.span,
            ));
        }
        log::debug!("types statement declared {} new type(s)", declared);

        for report in reports {
            let bullet = !matches!(report, Report::Info { .. });
            self.report(out, report, bullet);
        }
        Ok(())
    }

    fn declare_method(
        &mut self,
        declaring: &Name,
        name: &Name,
        params: &[Name],
        return_type: Option<&Name>,
        out: &mut Vec<String>,
    ) -> Result<()> {
        self.type_id(&declaring.text, declaring.span)?;
        for param in params {
            self.type_id(&param.text, param.span)?;
        }
        if let Some(ret) = return_type {
            self.type_id(&ret.text, ret.span)?;
        }

        let params: Vec<&str> = params.iter().map(|param| param.text.as_str()).collect();
        let entry = self
            .session
            .define_method(
                &declaring.text,
                &name.text,
                &params,
                return_type.map(|ret| ret.text.as_str()),
            )
            .map_err(|err| FrontendError::at(err, name.span))?;
        self.report(out, Report::Method(entry), true);
        Ok(())
    }

    fn declare_object(
        &mut self,
        ty: &Name,
        name: &Name,
        value: Option<&Rhs>,
        out: &mut Vec<String>,
    ) -> Result<()> {
        let declared = self.type_id(&ty.text, ty.span)?;
        if self.session.object(&name.text).is_ok() {
            return Err(FrontendError::at(
                TypeSystemError::DuplicateObject {
                    name: name.text.clone(),
                },
                name.span,
            ));
        }

        let (actual, span) = match value {
            Some(rhs) => (Some(self.evaluate(rhs, out)?), rhs.span()),
            None => (None, name.span),
        };
        let entry = self
            .session
            .bind_object(&name.text, declared, actual)
            .map_err(|err| FrontendError::at(err, span))?;
        self.report(out, Report::Object(entry), true);
        Ok(())
    }

    fn assign(&mut self, target: &Name, value: &Rhs, out: &mut Vec<String>) -> Result<()> {
        self.session
            .object(&target.text)
            .map_err(|err| FrontendError::at(err, target.span))?;

        let actual = self.evaluate(value, out)?;
        let entry = self
            .session
            .assign_object(&target.text, actual)
            .map_err(|err| FrontendError::at(err, value.span()))?;
        self.report(out, Report::Object(entry), true);
        Ok(())
    }

    // ── Expressions ─────────────────────────────────────────────────────

    /// Actual type produced by a right-hand side.
    fn evaluate(&self, rhs: &Rhs, out: &mut Vec<String>) -> Result<TypeId> {
        match rhs {
            Rhs::Object(name) => self.object_value(name),
            Rhs::Cast { ty, object } => {
                let actual = self.object_value(object)?;
                let cast = self.type_id(&ty.text, ty.span)?;
                let graph = self.session.graph();
                if !graph.is_subtype(actual, cast) {
                    return Err(FrontendError::at(
                        TypeSystemError::NotASubtype {
                            sub: graph.name(actual).to_string(),
                            sup: ty.text.clone(),
                        },
                        rhs.span(),
                    ));
                }
                Ok(cast)
            }
            Rhs::New(ty) => self.type_id(&ty.text, ty.span),
            Rhs::Call(call) => {
                let resolution = self.call(call)?;
                let result = match &resolution.return_type {
                    Some(ret) => self.type_id(ret, call.span)?,
                    None => {
                        return Err(FrontendError::VoidValue {
                            name: format!(
                                "{}::{}({})",
                                resolution.dynamic_type,
                                resolution.method,
                                resolution.signature.join(",")
                            ),
                            span: call.span,
                        })
                    }
                };
                self.report(out, Report::Call(resolution), true);
                Ok(result)
            }
        }
    }

    fn call(&self, call: &Call) -> Result<CallResolution> {
        self.object_value(&call.caller)?;

        let arguments = call
            .args
            .iter()
            .map(|arg| {
                self.session
                    .argument_type(&arg.to_argument())
                    .map_err(|err| FrontendError::at(err, arg.span()))
            })
            .collect::<Result<Signature>>()?;

        self.session
            .resolve_call_with(&call.caller.text, &call.method.text, &arguments)
            .map_err(|err| FrontendError::at(err, call.method.span))
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn type_id(&self, name: &str, span: Span) -> Result<TypeId> {
        self.session
            .type_id(name)
            .map_err(|err| FrontendError::at(err, span))
    }

    fn object_value(&self, name: &Name) -> Result<TypeId> {
        self.session
            .object_value(&name.text)
            .map_err(|err| FrontendError::at(err, name.span))
    }

    fn report(&self, out: &mut Vec<String>, report: Report, bullet: bool) {
        let line = match self.format {
            OutputFormat::Pretty if bullet => format!("- {}", report),
            OutputFormat::Pretty => report.to_string(),
            OutputFormat::Json => match serde_json::to_string(&report) {
                Ok(json) => json,
                Err(err) => {
                    log::warn!("failed to serialize report: {}", err);
                    report.to_string()
                }
            },
        };
        out.push(line);
    }
}

/// Whitespace-separated words of `line` with their spans.
fn words(line: &str) -> Vec<(&str, Span)> {
    let mut words = Vec::new();
    let mut start = None;
    for (i, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                words.push((&line[s..i], Span::new(s, i)));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push((&line[s..], Span::new(s, line.len())));
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(interp: &mut Interpreter, line: &str) -> Vec<String> {
        match interp.execute_line(line) {
            Ok(outcome) => outcome.lines().to_vec(),
            Err(err) => panic!("{}: {}", line, err),
        }
    }

    fn interpreter() -> Interpreter {
        let mut interp = Interpreter::new(OutputFormat::Pretty);
        run(&mut interp, "types Dog < Animal, Cat < Animal");
        interp
    }

    #[test]
    fn test_types_chain_reports() {
        let mut interp = Interpreter::new(OutputFormat::Pretty);
        assert_eq!(
            run(&mut interp, "types Dog < Animal, Cat < Animal"),
            vec!["- Dog <: Animal", "- Animal <: Object", "- Cat <: Animal"]
        );
        assert!(interp.session().is_subtype("Cat", "Object").unwrap());

        assert_eq!(
            run(&mut interp, "types Puppy < Dog < Animal"),
            vec!["- Puppy <: Dog", "info: type Dog already exists", "info: type Animal already exists"]
        );
    }

    #[test]
    fn test_subclass_of_existing_type() {
        let mut interp = Interpreter::new(OutputFormat::Pretty);
        run(&mut interp, "types Dog < Animal");

        assert_eq!(
            run(&mut interp, "types Puppy < Dog"),
            vec!["- Puppy <: Dog", "info: type Dog already exists"]
        );
        assert!(interp.session().is_subtype("Puppy", "Animal").unwrap());
        assert!(interp.session().is_subtype("Dog", "Animal").unwrap());

        assert_eq!(run(&mut interp, "types Dog"), vec!["info: type Dog already exists"]);
    }

    #[test]
    fn test_conflicting_chains_rejected() {
        let mut interp = Interpreter::new(OutputFormat::Pretty);
        let err = interp.execute_line("types Dog < Animal, Animal < Pet").unwrap_err();
        assert!(matches!(
            err,
            FrontendError::TypeSystem {
                source: TypeSystemError::DuplicateType { .. },
                ..
            }
        ));
        assert!(interp.session().type_id("Dog").is_err());
    }

    #[test]
    fn test_types_chain_is_atomic() {
        let mut interp = interpreter();
        let before = interp.session().types().len();

        // Dog already extends Animal, not Cat
        let err = interp.execute_line("types Bird, Dog < Cat").unwrap_err();
        assert!(matches!(
            err,
            FrontendError::TypeSystem {
                source: TypeSystemError::DuplicateType { .. },
                span,
            } if span == Span::new(12, 15)
        ));
        assert_eq!(interp.session().types().len(), before);

        let err = interp.execute_line("types X < Y < X").unwrap_err();
        assert!(matches!(err, FrontendError::RepeatedType { ref name, .. } if name == "X"));
        assert_eq!(interp.session().types().len(), before);
    }

    #[test]
    fn test_existing_type_with_new_parent_rejected() {
        let mut interp = interpreter();
        assert!(interp.execute_line("types Dog < Wolf").is_err());
        assert!(interp.session().type_id("Wolf").is_err());
    }

    #[test]
    fn test_object_declaration_and_assignment() {
        let mut interp = interpreter();
        assert_eq!(run(&mut interp, "Animal a"), vec!["- a : Animal (rtt=nil)"]);
        assert_eq!(run(&mut interp, "a = Dog()"), vec!["- a : Animal (rtt=Dog)"]);
        assert_eq!(run(&mut interp, "Animal b = a"), vec!["- b : Animal (rtt=Dog)"]);
        assert_eq!(run(&mut interp, "Dog d = (Dog)a"), vec!["- d : Dog (rtt=Dog)"]);
    }

    #[test]
    fn test_uninitialised_rhs_rejected() {
        let mut interp = interpreter();
        run(&mut interp, "Animal a");
        let err = interp.execute_line("Animal b = a").unwrap_err();
        assert!(matches!(
            err,
            FrontendError::TypeSystem {
                source: TypeSystemError::UninitializedObject { .. },
                ..
            }
        ));
        assert!(interp.session().object("b").is_err());
    }

    #[test]
    fn test_rhs_must_fit_declared_type() {
        let mut interp = interpreter();
        run(&mut interp, "Animal a = Cat()");
        let err = interp.execute_line("Dog d = a").unwrap_err();
        assert!(matches!(
            err,
            FrontendError::TypeSystem {
                source: TypeSystemError::NotASubtype { .. },
                span,
            } if span == Span::new(8, 9)
        ));
    }

    #[test]
    fn test_cast_checks_actual_type() {
        let mut interp = interpreter();
        run(&mut interp, "Animal a = Cat()");
        assert!(interp.execute_line("Animal b = (Dog)a").is_err());
        assert_eq!(run(&mut interp, "Object o = (Animal)a"), vec!["- o : Object (rtt=Animal)"]);

        // The cast type becomes the actual type, so dispatch starts there
        run(&mut interp, "Animal::speak()");
        run(&mut interp, "Cat::speak()");
        run(&mut interp, "Animal b = (Animal)a");
        assert_eq!(
            run(&mut interp, "b.speak()"),
            vec!["- b.speak() -> Animal::speak() (ctt) -> Animal::speak() (rtt)"]
        );
    }

    #[test]
    fn test_call_and_call_rhs() {
        let mut interp = interpreter();
        run(&mut interp, "Animal::mate() return Animal");
        run(&mut interp, "Dog::mate() return Dog");
        run(&mut interp, "Animal a = Dog()");

        assert_eq!(
            run(&mut interp, "a.mate()"),
            vec!["- a.mate() -> Animal::mate() (ctt) -> Dog::mate() (rtt)"]
        );
        assert_eq!(
            run(&mut interp, "Animal b = a.mate()"),
            vec![
                "- a.mate() -> Animal::mate() (ctt) -> Dog::mate() (rtt)",
                "- b : Animal (rtt=Dog)"
            ]
        );
    }

    #[test]
    fn test_void_call_has_no_value() {
        let mut interp = interpreter();
        run(&mut interp, "Animal::speak()");
        run(&mut interp, "Animal a = Dog()");
        let err = interp.execute_line("Animal b = a.speak()").unwrap_err();
        assert_eq!(
            err,
            FrontendError::VoidValue {
                name: "Animal::speak()".to_string(),
                span: Span::new(11, 20),
            }
        );
    }

    #[test]
    fn test_method_declaration_report() {
        let mut interp = interpreter();
        assert_eq!(
            run(&mut interp, "Dog::meet(Animal, int) return Dog"),
            vec!["- Dog::meet(Animal,int) -> Dog"]
        );
        let err = interp.execute_line("Dog::meet(Animal, int)").unwrap_err();
        assert_eq!(err.code(), "E3008");
    }

    #[test]
    fn test_unknown_type_span() {
        let mut interp = interpreter();
        let err = interp.execute_line("Dog::meet(Bird)").unwrap_err();
        assert_eq!(err.span(), Span::new(10, 14));
    }

    #[test]
    fn test_commands() {
        let mut interp = interpreter();
        run(&mut interp, "Animal a = Dog()");

        assert!(run(&mut interp, "?").len() > 5);
        assert!(run(&mut interp, "?t").contains(&"Dog <: Animal".to_string()));
        assert_eq!(run(&mut interp, "?o"), vec!["a : Animal (rtt=Dog)"]);
        assert!(run(&mut interp, "?v").is_empty());
        assert_eq!(run(&mut interp, "?s Dog Animal"), vec!["Dog <: Animal"]);
        assert_eq!(run(&mut interp, "?s Animal Dog"), vec!["Animal </: Dog"]);
        assert_eq!(interp.execute_line("q").unwrap(), Outcome::Quit);
    }

    #[test]
    fn test_bad_commands() {
        let mut interp = interpreter();
        assert!(matches!(
            interp.execute_line("?x"),
            Err(FrontendError::UnknownCommand { .. })
        ));
        assert!(interp.execute_line("?s Dog").is_err());
        assert!(interp.execute_line("?s Dog Bird").is_err());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let mut interp = interpreter();
        assert!(run(&mut interp, "# types Bird").is_empty());
        assert!(run(&mut interp, "   ").is_empty());
        assert!(interp.session().type_id("Bird").is_err());
    }

    #[test]
    fn test_json_output() {
        let mut interp = Interpreter::new(OutputFormat::Json);
        let lines = run(&mut interp, "types Animal");
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["kind"], "type");
        assert_eq!(value["name"], "Animal");
        assert_eq!(value["parent"], "Object");

        run(&mut interp, "Animal a = Animal()");
        run(&mut interp, "Animal::speak()");
        let lines = run(&mut interp, "a.speak()");
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["kind"], "call");
        assert_eq!(value["dynamic_type"], "Animal");
        assert!(value["return_type"].is_null());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_words() {
        assert_eq!(
            words(" ?s  A B"),
            vec![
                ("?s", Span::new(1, 3)),
                ("A", Span::new(5, 6)),
                ("B", Span::new(7, 8)),
            ]
        );
    }
}
