//! Messages reported back to the host build.
//!
//! A fatal diagnostic fails the build once processing ends, but never stops
//! the processor from handling the remaining declarations.

use std::fmt;

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Fatal,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Qualified name of the declaration the message is about.
    pub declaration: String,
    pub message: String,
}

impl Diagnostic {
    pub fn fatal(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            declaration: declaration.into(),
            message: message.into(),
        }
    }

    pub fn warning(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            declaration: declaration.into(),
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Host channel for diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for &mut D {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Collects diagnostics in the order they were reported.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fatal(&self) -> bool {
        self.reported.iter().any(Diagnostic::is_fatal)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter().filter(|d| d.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter().filter(|d| !d.is_fatal())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.reported
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.reported.push(diagnostic);
    }
}
