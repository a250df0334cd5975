//! Run-level surface: lint one source text, optionally fixing it
//!
//! [`Linter::verify`] runs a single dispatch pass. [`Linter::verify_and_fix`]
//! repeats parse, dispatch and fix application until a pass accepts no fix,
//! the patched text stops parsing, a rule crashes, or `max_passes` is hit.

use lintel_syntax::{LineIndex, Parse, ParseError, SourceCode};
use serde_json::Value;
use tracing::{debug, debug_span, warn};

use crate::autofix::{FixApplier, generate_unified_diff};
use crate::config::LintelConfiguration;
use crate::diagnostics::{Diagnostic, FixStatus, Location, Severity};
use crate::dispatcher::{Dispatcher, SkippedRule};
use crate::registry::ConfiguredRule;
use crate::LintelError;

/// Default upper bound on fix passes per file
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Rule id and message id of the diagnostic reported for unparsable text
pub const PARSE_ERROR_ID: &str = "parse-error";

/// Parses source text into a tree the rules can walk
pub trait SourceParser: Send + Sync {
    fn parse(&self, text: &str) -> Parse;
}

/// The bundled ECMAScript subset parser
#[derive(Debug, Clone, Copy, Default)]
pub struct EcmaParser;

impl SourceParser for EcmaParser {
    fn parse(&self, text: &str) -> Parse {
        lintel_syntax::parse(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinterOptions {
    pub max_passes: usize,
    /// Shared settings handed to every rule
    pub settings: Value,
}

impl Default for LinterOptions {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            settings: Value::Null,
        }
    }
}

impl LinterOptions {
    pub fn from_config(config: &LintelConfiguration) -> Self {
        Self {
            max_passes: config
                .linter()
                .max_passes
                .unwrap_or(DEFAULT_MAX_PASSES)
                .max(1),
            settings: config.settings(),
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }
}

/// Result of linting one source text
#[derive(Debug)]
pub struct LintOutcome {
    pub input: String,
    /// Final text; equal to `input` unless fixes were applied
    pub output: String,
    /// Diagnostics of the last completed pass, each with its fix status
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics whose fixes were applied by earlier passes
    pub fixed: Vec<Diagnostic>,
    /// Number of dispatch passes that ran
    pub passes: usize,
    /// Total fixes spliced into the output across all passes
    pub applied_fixes: usize,
    pub skipped_rules: Vec<SkippedRule>,
    /// A rule crash that aborted the run
    pub error: Option<LintelError>,
}

impl LintOutcome {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            output: input.to_string(),
            diagnostics: Vec::new(),
            fixed: Vec::new(),
            passes: 0,
            applied_fixes: 0,
            skipped_rules: Vec::new(),
            error: None,
        }
    }

    pub fn changed(&self) -> bool {
        self.input != self.output
    }

    /// Unified diff of input against output, empty when unchanged
    pub fn diff(&self, label: &str) -> String {
        generate_unified_diff(&self.input, &self.output, label)
    }

    /// Fixed problems from earlier passes followed by the last pass's report
    pub fn all_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.fixed.iter().chain(&self.diagnostics)
    }

    /// Whether an error-severity problem is left in the output
    pub fn has_unfixed_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error && d.is_unfixed())
    }

    /// Whether the text failed to parse at some point
    pub fn has_parse_error(&self) -> bool {
        self.diagnostics.iter().any(|d| d.rule_id == PARSE_ERROR_ID)
    }
}

/// Lints source text with a parser and a set of configured rules
#[derive(Debug, Clone)]
pub struct Linter<P = EcmaParser> {
    parser: P,
    options: LinterOptions,
}

impl Linter<EcmaParser> {
    pub fn new(options: LinterOptions) -> Self {
        Self {
            parser: EcmaParser,
            options,
        }
    }
}

impl Default for Linter<EcmaParser> {
    fn default() -> Self {
        Self::new(LinterOptions::default())
    }
}

impl<P: SourceParser> Linter<P> {
    pub fn with_parser(parser: P, options: LinterOptions) -> Self {
        Self { parser, options }
    }

    pub fn options(&self) -> &LinterOptions {
        &self.options
    }

    /// Lint without fixing: one pass, fixes reported as available
    pub fn verify(&self, source: &str, rules: &[ConfiguredRule]) -> LintOutcome {
        let span = debug_span!("lint_file", fix = false);
        let _enter = span.enter();

        let mut outcome = LintOutcome::new(source);
        let parse = self.parser.parse(source);
        if let Some(error) = parse.errors().first() {
            warn!("Not linting unparsable source: {}", error);
            outcome.diagnostics.push(parse_error_diagnostic(source, error));
            return outcome;
        }

        let code = SourceCode::new(source, parse.syntax());
        let dispatch = Dispatcher::new(rules, &self.options.settings).run(&code);
        outcome.passes = 1;
        outcome.diagnostics = dispatch.diagnostics;
        outcome.skipped_rules = dispatch.skipped;
        outcome.error = dispatch.error;
        outcome
    }

    /// Lint and fix until the text is stable.
    ///
    /// `diagnostics` holds the report of the last completed pass, so every
    /// problem left in the output is listed. Problems fixed along the way
    /// move to `fixed` once a later pass supersedes their pass.
    pub fn verify_and_fix(&self, source: &str, rules: &[ConfiguredRule]) -> LintOutcome {
        let span = debug_span!("lint_file", fix = true);
        let _enter = span.enter();

        let applier = FixApplier::new();
        let mut outcome = LintOutcome::new(source);
        let mut text = source.to_string();

        while outcome.passes < self.options.max_passes {
            let pass = outcome.passes + 1;
            let pass_span = debug_span!("lint_pass", pass);
            let _pass = pass_span.enter();

            let parse = self.parser.parse(&text);
            if let Some(error) = parse.errors().first() {
                warn!(pass, "Stopping on unparsable source: {}", error);
                outcome.diagnostics.push(parse_error_diagnostic(&text, error));
                break;
            }

            let code = SourceCode::new(text.as_str(), parse.syntax());
            let dispatch = Dispatcher::new(rules, &self.options.settings).run(&code);
            outcome.passes = pass;
            outcome.skipped_rules = dispatch.skipped;
            let superseded = std::mem::replace(&mut outcome.diagnostics, dispatch.diagnostics);
            outcome.fixed.extend(
                superseded
                    .into_iter()
                    .filter(|d| d.fix_status == FixStatus::Applied),
            );

            if let Some(error) = dispatch.error {
                outcome.error = Some(error);
                break;
            }

            let applied = applier.apply(&text, &mut outcome.diagnostics);
            debug!(
                pass,
                diagnostics = outcome.diagnostics.len(),
                applied = applied.applied(),
                skipped = applied.skipped,
                "Finished pass"
            );

            if applied.applied() == 0 {
                break;
            }
            outcome.applied_fixes += applied.applied();
            text = applied.output;
        }

        outcome.output = text;
        outcome
    }
}

fn parse_error_diagnostic(text: &str, error: &ParseError) -> Diagnostic {
    let index = LineIndex::new(text);
    let start = index.line_col(text, error.range.start);
    let end = index.line_col(text, error.range.end);
    Diagnostic::new(
        PARSE_ERROR_ID,
        PARSE_ERROR_ID,
        Severity::Error,
        error.message.clone(),
        Location::with_end(
            Default::default(),
            start.line,
            start.column,
            end.line,
            end.column,
            error.range.start,
            error.range.len(),
        ),
    )
}
