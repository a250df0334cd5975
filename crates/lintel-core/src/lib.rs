//! Lintel Core
//!
//! Rule dispatch and autofix engine. This crate provides the rule contract,
//! the registry, the single-pass dispatcher, diagnostic collection, the fix
//! applier and the multi-pass [`Linter`], plus configuration loading and a
//! parallel executor for many files.

pub mod autofix;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod linter;
pub mod options;
pub mod registry;
pub mod result;
pub mod rules;

// Re-export commonly used types
pub use autofix::{AppliedFixes, Fix, FixApplier, FixTarget, Fixer, generate_unified_diff};
pub use config::{
    ConfigLoader, LintelConfiguration, LinterConfiguration, RuleLevel, RuleSetting, RuleSeverity,
};
pub use context::{Report, RuleContext, render_message};
pub use diagnostics::{
    DefaultDiagnosticCollector, Diagnostic, DiagnosticCollector, DiagnosticFormatter, FixStatus,
    Location, OutputFormat, Severity,
};
pub use dispatcher::{DispatchResult, Dispatcher, SkippedRule};
pub use error::{ErrorKind, LintelError};
pub use executor::{
    DefaultExecutor, ExecutionContext, ExecutionSummary, FileExecutionResult, ProgressCallback,
    ProgressInfo, SourceFile,
};
pub use linter::{
    DEFAULT_MAX_PASSES, EcmaParser, LintOutcome, Linter, LinterOptions, PARSE_ERROR_ID,
    SourceParser,
};
pub use options::{OptionError, OptionSchema, validate_options};
pub use registry::{ConfiguredRule, RuleRegistry};
pub use result::{Result, ResultExt};
pub use rules::{
    CreateContext, Fixable, Handler, Phase, Rule, RuleCategory, RuleMeta, RuleSkip, RuleVisitor,
};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lintel=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
