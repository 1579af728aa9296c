//! Diagnostic reporting.
//!
//! Resolution functions never log. The composition layer (the binder, the
//! reader and tree construction) turns problems into [`Diagnostic`] records
//! and hands them to a [`DiagnosticSink`]. [`LogSink`] prints a human-readable
//! line to stderr and emits a structured `tracing` event; a `Vec<Diagnostic>`
//! collects records for inspection.

use std::fmt;

use tracing::{error, warn};

use crate::error::FlagfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted event name, e.g. `flagfig.tree.value_coerced`.
    pub event: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl Diagnostic {
    pub fn warning(event: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            event,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn error(event: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            event,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Attach a structured field. Setting a key twice keeps the last value.
    pub fn field(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }

    /// Look up a structured field by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Prints each diagnostic to stderr and mirrors it as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        eprintln!("{diagnostic}");
        let fields = format_fields(&diagnostic.fields);
        match diagnostic.severity {
            Severity::Warning => warn!(
                event = diagnostic.event,
                fields = %fields,
                message = %diagnostic.message
            ),
            Severity::Error => error!(
                event = diagnostic.event,
                fields = %fields,
                message = %diagnostic.message
            ),
        }
    }
}

fn format_fields(fields: &[(&'static str, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}={v:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the diagnostic for a flag-processing error.
pub fn error_diagnostic(event: &'static str, err: &FlagfigError) -> Diagnostic {
    let diagnostic = Diagnostic::error(event, err.to_string());
    match err {
        FlagfigError::InvalidConfig { set, .. } => diagnostic.field("flag_set", set),
        FlagfigError::DefaultTypeMismatch {
            flag,
            expected,
            actual,
        } => diagnostic
            .field("flag", flag)
            .field("expected", expected)
            .field("actual", actual)
            .field("internal", true),
        FlagfigError::UnspecifiedKind { flag } => {
            diagnostic.field("flag", flag).field("internal", true)
        }
        FlagfigError::FlagNotDeclared { flag } | FlagfigError::FlagLookup { flag, .. } => {
            diagnostic.field("flag", flag)
        }
        FlagfigError::FlagTypeMismatch {
            flag,
            expected,
            actual,
            value,
        } => diagnostic
            .field("flag", flag)
            .field("expected", expected)
            .field("actual", actual)
            .field("value", value),
        _ => diagnostic,
    }
}

/// Report every error to `sink`, one diagnostic each. Never stops early.
pub fn report_errors(sink: &mut dyn DiagnosticSink, event: &'static str, errors: &[FlagfigError]) {
    for err in errors {
        sink.emit(error_diagnostic(event, err));
    }
}
