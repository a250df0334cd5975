//! Per-handler rule context and reporting

use std::ops::Range;

use indexmap::IndexMap;
use lintel_syntax::{SourceCode, SyntaxNode, SyntaxToken, node_range, token_range};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::autofix::{Fix, Fixer};
use crate::diagnostics::{
    DefaultDiagnosticCollector, Diagnostic, DiagnosticCollector, Location, Severity,
};
use crate::rules::RuleMeta;
use crate::{LintelError, Result};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([^{}\s]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Substitute `{{ name }}` placeholders; unknown names are left as written
pub fn render_message(template: &str, data: &IndexMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            data.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// A violation about to be collected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub range: Range<usize>,
    pub message_id: String,
    pub data: IndexMap<String, String>,
    pub fixes: Vec<Fix>,
}

impl Report {
    pub fn at_range(range: Range<usize>, message_id: impl Into<String>) -> Self {
        Self {
            range,
            message_id: message_id.into(),
            data: IndexMap::new(),
            fixes: Vec::new(),
        }
    }

    pub fn at_node(node: &SyntaxNode, message_id: impl Into<String>) -> Self {
        Self::at_range(node_range(node), message_id)
    }

    pub fn at_token(token: &SyntaxToken, message_id: impl Into<String>) -> Self {
        Self::at_range(token_range(token), message_id)
    }

    /// Value for a `{{ key }}` placeholder
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attach a fix; `None` reports the problem without an edit
    pub fn with_fix(mut self, fix: impl Into<Option<Fix>>) -> Self {
        if let Some(fix) = fix.into() {
            self.fixes.push(fix);
        }
        self
    }

    /// Attach several fixes, merged into one edit when collected
    pub fn with_fixes(mut self, fixes: impl IntoIterator<Item = Fix>) -> Self {
        self.fixes.extend(fixes);
        self
    }
}

/// Context handed to rule handlers
pub struct RuleContext<'a> {
    meta: &'a RuleMeta,
    severity: Severity,
    options: &'a [Value],
    settings: &'a Value,
    source: &'a SourceCode,
    collector: &'a mut DefaultDiagnosticCollector,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        meta: &'a RuleMeta,
        severity: Severity,
        options: &'a [Value],
        settings: &'a Value,
        source: &'a SourceCode,
        collector: &'a mut DefaultDiagnosticCollector,
    ) -> Self {
        Self {
            meta,
            severity,
            options,
            settings,
            source,
            collector,
        }
    }

    pub fn rule_id(&self) -> &str {
        &self.meta.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn options(&self) -> &'a [Value] {
        self.options
    }

    pub fn option(&self, index: usize) -> Option<&'a Value> {
        self.options.get(index)
    }

    pub fn settings(&self) -> &'a Value {
        self.settings
    }

    pub fn source_code(&self) -> &'a SourceCode {
        self.source
    }

    pub fn fixer(&self) -> Fixer {
        Fixer
    }

    /// Collect a diagnostic.
    ///
    /// Fails with [`LintelError::UnknownMessageId`] when the message id is
    /// not in the rule's catalog, and with [`LintelError::AutofixError`]
    /// when a fix comes from a rule not marked fixable or a fix is
    /// malformed. Returning the error from the handler aborts the file.
    pub fn report(&mut self, report: Report) -> Result<()> {
        let meta = self.meta;
        let rule_id = meta.id.as_str();
        let template = meta
            .messages
            .get(&report.message_id)
            .ok_or_else(|| LintelError::unknown_message_id(rule_id, &report.message_id))?;

        let text = self.source.text();
        if report.range.start > report.range.end || report.range.end > text.len() {
            return Err(LintelError::rule_error(
                rule_id,
                format!(
                    "report range {}..{} is outside the source",
                    report.range.start, report.range.end
                ),
            ));
        }

        if !report.fixes.is_empty() && !meta.is_fixable() {
            return Err(LintelError::autofix_error(
                rule_id,
                "fixes can only be reported by rules with a fixable meta",
            ));
        }
        for fix in &report.fixes {
            fix.validate(text)
                .map_err(|message| LintelError::autofix_error(rule_id, message))?;
        }
        let fix = Fix::merge(report.fixes, text)
            .map_err(|message| LintelError::autofix_error(rule_id, message))?;

        let start = self.source.line_col(report.range.start);
        let end = self.source.line_col(report.range.end);
        let location = Location::with_end(
            Default::default(),
            start.line,
            start.column,
            end.line,
            end.column,
            report.range.start,
            report.range.len(),
        );

        let diagnostic = Diagnostic::new(
            rule_id,
            report.message_id,
            self.severity,
            render_message(template, &report.data),
            location,
        )
        .with_fix(fix);

        self.collector.collect(diagnostic);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::FixStatus;
    use crate::rules::Fixable;
    use lintel_syntax::parse;

    fn data(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_message() {
        assert_eq!(
            render_message("'{{ name }}' is redeclared", &data(&[("name", "React")])),
            "'React' is redeclared"
        );
        assert_eq!(
            render_message("{{name}} and {{ other }}", &data(&[("name", "h")])),
            "h and {{ other }}"
        );
    }

    struct Harness {
        meta: RuleMeta,
        source: SourceCode,
        settings: Value,
        collector: DefaultDiagnosticCollector,
    }

    impl Harness {
        fn new(text: &str, meta: RuleMeta) -> Self {
            Self {
                meta,
                source: SourceCode::new(text, parse(text).syntax()),
                settings: Value::Null,
                collector: DefaultDiagnosticCollector::new(),
            }
        }

        fn report(&mut self, report: Report) -> Result<()> {
            let mut ctx = RuleContext::new(
                &self.meta,
                Severity::Warning,
                &[],
                &self.settings,
                &self.source,
                &mut self.collector,
            );
            ctx.report(report)
        }
    }

    fn meta() -> RuleMeta {
        RuleMeta::new("js/test", "test")
            .with_fixable(Fixable::Code)
            .with_message("leading", "A leading decimal point can be confused with a dot.")
            .with_message("named", "Found {{ name }}.")
    }

    #[test]
    fn test_report_builds_located_diagnostic() {
        let mut harness = Harness::new("var x;\nx = .5;", meta());
        harness
            .report(Report::at_range(11..13, "leading").with_fix(Fix::insert(11, "0")))
            .unwrap();

        let diagnostic = &harness.collector.diagnostics()[0];
        assert_eq!(diagnostic.message_id, "leading");
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!((diagnostic.location.line, diagnostic.location.column), (2, 5));
        assert_eq!(diagnostic.location.end_column, Some(7));
        assert_eq!(diagnostic.location.range(), 11..13);
        assert_eq!(diagnostic.fix, Some(Fix::insert(11, "0")));
        assert_eq!(diagnostic.fix_status, FixStatus::Available);
    }

    #[test]
    fn test_report_renders_data() {
        let mut harness = Harness::new("a", meta());
        harness
            .report(Report::at_range(0..1, "named").with_data("name", "a"))
            .unwrap();
        assert_eq!(harness.collector.diagnostics()[0].message, "Found a.");
    }

    #[test]
    fn test_unknown_message_id_is_an_error() {
        let mut harness = Harness::new("a", meta());
        let err = harness.report(Report::at_range(0..1, "nope")).unwrap_err();
        assert!(matches!(err, LintelError::UnknownMessageId { ref message_id, .. } if message_id == "nope"));
        assert_eq!(harness.collector.total_count(), 0);
    }

    #[test]
    fn test_fix_from_unfixable_rule_is_an_error() {
        let meta = RuleMeta::new("js/test", "test").with_message("m", "m");
        let mut harness = Harness::new("a", meta);
        let err = harness
            .report(Report::at_range(0..1, "m").with_fix(Fix::insert(0, "x")))
            .unwrap_err();
        assert!(matches!(err, LintelError::AutofixError { .. }));
    }

    #[test]
    fn test_declined_fix_reports_without_edit() {
        let mut harness = Harness::new("a", meta());
        harness
            .report(Report::at_range(0..1, "leading").with_fix(None::<Fix>))
            .unwrap();
        let diagnostic = &harness.collector.diagnostics()[0];
        assert_eq!(diagnostic.fix, None);
        assert_eq!(diagnostic.fix_status, FixStatus::None);
    }

    #[test]
    fn test_out_of_bounds_fix_is_rejected() {
        let mut harness = Harness::new("a", meta());
        let err = harness
            .report(Report::at_range(0..1, "leading").with_fix(Fix::new(0..5, "")))
            .unwrap_err();
        assert!(matches!(err, LintelError::AutofixError { .. }));
    }

    #[test]
    fn test_multiple_fixes_are_merged() {
        let mut harness = Harness::new("tag `x`", meta());
        harness
            .report(
                Report::at_range(0..7, "leading")
                    .with_fixes([Fix::new(3..4, ""), Fix::insert(7, ";")]),
            )
            .unwrap();
        assert_eq!(
            harness.collector.diagnostics()[0].fix,
            Some(Fix::new(3..7, "`x`;"))
        );
    }
}
