//! Warning sink handed to each stage.
//!
//! Recoverable conditions (a table without dated rows, a series whose units
//! disagree, ...) do not stop a run. They are recorded here so the caller can
//! report or assert on them, and mirrored to `tracing` as they happen.

use std::fmt;

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A source file has no `Valeurs` list.
    MissingValues,
    /// A table has no record with a recognized date field.
    UndatedTable,
    /// Two records of a table share the same start date; the later one wins.
    DuplicateRowDate,
    /// Records disagree on the relative order of value paths.
    PathOrderCycle,
    /// A series mixes units; its values are kept raw.
    InconsistentFormat,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingValues => "missing-values",
            DiagnosticKind::UndatedTable => "undated-table",
            DiagnosticKind::DuplicateRowDate => "duplicate-row-date",
            DiagnosticKind::PathOrderCycle => "path-order-cycle",
            DiagnosticKind::InconsistentFormat => "inconsistent-format",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Dotted path of the table or parameter the diagnostic is about.
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(
        &mut self,
        kind: DiagnosticKind,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            path: path.into(),
            message: message.into(),
        };
        warn!(kind = %diagnostic.kind, path = %diagnostic.path, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }
}
