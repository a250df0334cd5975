//! Diagnostic types, collection and output formatting

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::autofix::Fix;

/// Represents a diagnostic message from linting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Identifier of the rule that generated this diagnostic
    pub rule_id: String,
    /// Key of the message in the rule's catalog
    pub message_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Rendered, human-readable message
    pub message: String,
    /// Location in the source file
    pub location: Location,
    /// Proposed edit, at most one per diagnostic
    pub fix: Option<Fix>,
    /// What happened to the proposed edit
    pub fix_status: FixStatus,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// File path, empty when linting an in-memory string
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional end position for ranges
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span in bytes
    pub length: usize,
}

/// Outcome of a diagnostic's fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixStatus {
    /// No fix was proposed
    #[default]
    None,
    /// A fix was proposed but fixing is disabled
    Available,
    /// The fix was spliced into the output
    Applied,
    /// The fix overlapped an accepted fix and was dropped for this pass
    SkippedConflict,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        message_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            message_id: message_id.into(),
            severity,
            message: message.into(),
            location,
            fix: None,
            fix_status: FixStatus::None,
        }
    }

    /// Attach an optional fix; a present fix is marked available
    pub fn with_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix_status = if fix.is_some() {
            FixStatus::Available
        } else {
            FixStatus::None
        };
        self.fix = fix;
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.location.file = file.into();
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Whether the reported problem is still present in the output
    pub fn is_unfixed(&self) -> bool {
        self.fix_status != FixStatus::Applied
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            line: 0,
            column: 0,
            end_line: None,
            end_column: None,
            offset: 0,
            length: 0,
        }
    }
}

impl Location {
    /// Create a new location
    pub fn new(file: PathBuf, line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: None,
            end_column: None,
            offset,
            length,
        }
    }

    /// Create a location with end position
    pub fn with_end(
        file: PathBuf,
        line: usize,
        column: usize,
        end_line: usize,
        end_column: usize,
        offset: usize,
        length: usize,
    ) -> Self {
        Self {
            file,
            line,
            column,
            end_line: Some(end_line),
            end_column: Some(end_column),
            offset,
            length,
        }
    }

    /// Byte range covered by this location
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.length
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.as_os_str().is_empty() {
            write!(f, "<input>:{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
        }
    }
}

impl FixStatus {
    /// Label printed by the human formatter; empty for no fix
    pub fn label(&self) -> &'static str {
        match self {
            FixStatus::None => "",
            FixStatus::Available => "fixable",
            FixStatus::Applied => "fixed",
            FixStatus::SkippedConflict => "fix skipped (conflict)",
        }
    }
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trait for collecting and managing diagnostics
pub trait DiagnosticCollector {
    /// Collect a diagnostic
    fn collect(&mut self, diagnostic: Diagnostic);

    /// Collect multiple diagnostics
    fn collect_all(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.collect(diagnostic);
        }
    }

    /// Get all collected diagnostics, in collection order
    fn diagnostics(&self) -> &[Diagnostic];

    /// Group diagnostics by rule ID
    fn group_by_rule(&self) -> HashMap<String, Vec<&Diagnostic>>;

    /// Get count of diagnostics by severity
    fn count_by_severity(&self) -> HashMap<Severity, usize>;

    /// Check if there are any errors
    fn has_errors(&self) -> bool;

    /// Get total count of diagnostics
    fn total_count(&self) -> usize;
}

/// Append-only collector used for one file pass
#[derive(Debug, Clone, Default)]
pub struct DefaultDiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DefaultDiagnosticCollector {
    /// Create a new diagnostic collector
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics_mut(&mut self) -> &mut [Diagnostic] {
        &mut self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Sort diagnostics by location (file, then line, then column).
    ///
    /// The sort is stable so reports at the same position keep rule order.
    pub fn sort_by_location(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then_with(|| a.location.line.cmp(&b.location.line))
                .then_with(|| a.location.column.cmp(&b.location.column))
        });
    }
}

impl DiagnosticCollector for DefaultDiagnosticCollector {
    fn collect(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn group_by_rule(&self) -> HashMap<String, Vec<&Diagnostic>> {
        let mut groups = HashMap::new();
        for diagnostic in &self.diagnostics {
            groups
                .entry(diagnostic.rule_id.clone())
                .or_insert_with(Vec::new)
                .push(diagnostic);
        }
        groups
    }

    fn count_by_severity(&self) -> HashMap<Severity, usize> {
        let mut counts = HashMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.severity).or_insert(0) += 1;
        }
        counts
    }

    fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn total_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per diagnostic
    #[default]
    Human,
    /// Pretty-printed JSON array
    Json,
}

/// Formatter for diagnostic output
#[derive(Debug, Clone, Default)]
pub struct DiagnosticFormatter {
    pub format: OutputFormat,
}

impl DiagnosticFormatter {
    /// Create a new formatter
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a single diagnostic as `file:line:col severity message rule [status]`
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut line = format!(
            "{} {} {} {}",
            diagnostic.location, diagnostic.severity, diagnostic.message, diagnostic.rule_id
        );
        let status = diagnostic.fix_status.label();
        if !status.is_empty() {
            line.push_str(&format!(" [{status}]"));
        }
        line
    }

    /// Format multiple diagnostics in the configured format
    pub fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> crate::Result<String> {
        match self.format {
            OutputFormat::Human => {
                let mut output = String::new();
                for diagnostic in diagnostics {
                    output.push_str(&self.format_diagnostic(diagnostic));
                    output.push('\n');
                }
                Ok(output)
            }
            OutputFormat::Json => serde_json::to_string_pretty(diagnostics).map_err(|e| {
                crate::LintelError::internal_error(format!("Failed to serialize diagnostics: {e}"))
            }),
        }
    }

    /// Format a one-line summary such as `2 errors, 1 warning (1 fixed)`
    pub fn format_summary(&self, diagnostics: &[Diagnostic]) -> String {
        if diagnostics.is_empty() {
            return "No issues found".to_string();
        }

        let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
        let plural = |n: usize, word: &str| format!("{n} {word}{}", if n == 1 { "" } else { "s" });

        let mut parts = Vec::new();
        for (severity, word) in [
            (Severity::Error, "error"),
            (Severity::Warning, "warning"),
            (Severity::Info, "info message"),
            (Severity::Hint, "hint"),
        ] {
            let n = count(severity);
            if n > 0 {
                parts.push(plural(n, word));
            }
        }

        let fixed = diagnostics
            .iter()
            .filter(|d| d.fix_status == FixStatus::Applied)
            .count();
        let mut summary = parts.join(", ");
        if fixed > 0 {
            summary.push_str(&format!(" ({fixed} fixed)"));
        }
        summary
    }
}
