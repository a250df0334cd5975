//! Parallel execution over many files
//!
//! Files are independent: each one runs through its own [`Linter`] passes on
//! the global rayon pool, sharing only the read-only configured rules.
//! Results come back in input order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc, Once,
    atomic::{AtomicUsize, Ordering},
};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{Level, debug, error, info, span, warn};

use crate::diagnostics::{Diagnostic, Severity};
use crate::linter::{EcmaParser, LintOutcome, Linter, SourceParser};
use crate::registry::ConfiguredRule;
use crate::LintelError;

/// Initialize the global Rayon thread pool once
static THREAD_POOL_INIT: Once = Once::new();

fn init_global_thread_pool(threads: usize) {
    THREAD_POOL_INIT.call_once(|| {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("lintel-worker-{index}"))
            .build_global()
        {
            warn!(
                "Could not configure global thread pool (may already be initialized): {}",
                e
            );
        }
        info!(
            "Configured global rayon thread pool with {} threads",
            threads
        );
    });
}

/// Progress reporting callback type
pub type ProgressCallback = Arc<dyn Fn(ProgressInfo) + Send + Sync>;

/// Information about execution progress
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    pub total_files: usize,
    pub completed_files: usize,
    /// File just finished, `None` for the final report
    pub current_file: Option<PathBuf>,
    pub elapsed: Duration,
}

impl ProgressInfo {
    /// Completion ratio between 0.0 and 1.0
    pub fn completion_percentage(&self) -> f64 {
        if self.total_files == 0 {
            1.0
        } else {
            self.completed_files as f64 / self.total_files as f64
        }
    }
}

/// An in-memory file to lint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Result of linting a single file
#[derive(Debug)]
pub struct FileExecutionResult {
    pub file_path: PathBuf,
    /// Fixed problems, then those left in the output, with their location
    /// file set to `file_path`
    pub diagnostics: Vec<Diagnostic>,
    /// Fixed text, present only when fixing changed the file
    pub fixed_output: Option<String>,
    pub passes: usize,
    pub applied_fixes: usize,
    pub execution_time: Duration,
    /// Read failure or rule crash
    pub error: Option<LintelError>,
}

impl FileExecutionResult {
    fn from_outcome(file_path: &Path, outcome: LintOutcome, execution_time: Duration) -> Self {
        let fixed_output = outcome.changed().then(|| outcome.output.clone());
        Self {
            file_path: file_path.to_path_buf(),
            diagnostics: outcome
                .fixed
                .into_iter()
                .chain(outcome.diagnostics)
                .map(|d| d.with_file(file_path))
                .collect(),
            fixed_output,
            passes: outcome.passes,
            applied_fixes: outcome.applied_fixes,
            execution_time,
            error: outcome.error,
        }
    }

    fn failed(file_path: &Path, error: LintelError, execution_time: Duration) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            diagnostics: Vec::new(),
            fixed_output: None,
            passes: 0,
            applied_fixes: 0,
            execution_time,
            error: Some(error),
        }
    }

    pub fn has_unfixed_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error && d.is_unfixed())
    }
}

/// Totals across a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub files: usize,
    pub failed_files: usize,
    pub diagnostics: usize,
    /// Error-severity diagnostics still present in the output
    pub unfixed_errors: usize,
    pub applied_fixes: usize,
}

impl ExecutionSummary {
    pub fn from_results(results: &[FileExecutionResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.files += 1;
            if result.error.is_some() {
                summary.failed_files += 1;
            }
            summary.diagnostics += result.diagnostics.len();
            summary.unfixed_errors += result
                .diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Error && d.is_unfixed())
                .count();
            summary.applied_fixes += result.applied_fixes;
            summary
        })
    }

    /// Process exit code: 1 when an error remains or a file failed
    pub fn exit_code(&self) -> i32 {
        if self.unfixed_errors > 0 || self.failed_files > 0 {
            1
        } else {
            0
        }
    }
}

/// Executor options
#[derive(Clone, Default)]
pub struct ExecutionContext {
    /// Apply fixes (multi-pass) instead of a single verify pass
    pub fix: bool,
    pub thread_pool_size: Option<usize>,
    pub progress_callback: Option<ProgressCallback>,
}

impl ExecutionContext {
    pub fn new(fix: bool) -> Self {
        Self {
            fix,
            ..Self::default()
        }
    }

    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("fix", &self.fix)
            .field("thread_pool_size", &self.thread_pool_size)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

/// Parallel executor over files sharing one set of configured rules
pub struct DefaultExecutor<P = EcmaParser> {
    context: ExecutionContext,
    linter: Linter<P>,
    rules: Vec<ConfiguredRule>,
}

impl<P: SourceParser> DefaultExecutor<P> {
    pub fn new(context: ExecutionContext, linter: Linter<P>, rules: Vec<ConfiguredRule>) -> Self {
        let thread_count = context.thread_pool_size.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });
        info!("Initializing executor with {} threads", thread_count);
        init_global_thread_pool(thread_count);

        Self {
            context,
            linter,
            rules,
        }
    }

    pub fn rules(&self) -> &[ConfiguredRule] {
        &self.rules
    }

    /// Lint in-memory sources in parallel, results in input order
    pub fn execute_sources(&self, files: &[SourceFile]) -> Vec<FileExecutionResult> {
        self.execute_indexed(
            files,
            |file| {
                let start = Instant::now();
                let outcome = self.lint_text(&file.text);
                FileExecutionResult::from_outcome(&file.path, outcome, start.elapsed())
            },
            |file| file.path.as_path(),
        )
    }

    /// Read and lint files in parallel, results in input order
    pub fn execute_parallel(&self, files: &[PathBuf]) -> Vec<FileExecutionResult> {
        self.execute_indexed(files, |path| self.process_file(path), |path| path.as_path())
    }

    /// Read and lint one file
    pub fn execute_single(&self, file: &Path) -> FileExecutionResult {
        info!("Executing single file: {}", file.display());
        self.process_file(file)
    }

    fn lint_text(&self, text: &str) -> LintOutcome {
        if self.context.fix {
            self.linter.verify_and_fix(text, &self.rules)
        } else {
            self.linter.verify(text, &self.rules)
        }
    }

    fn process_file(&self, file_path: &Path) -> FileExecutionResult {
        let start_time = Instant::now();
        let span = span!(Level::DEBUG, "process_file", file = %file_path.display());
        let _enter = span.enter();

        let content = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(io_error) => {
                let error = LintelError::io_error(file_path, io_error);
                error!("Failed to read file {}: {}", file_path.display(), error);
                return FileExecutionResult::failed(file_path, error, start_time.elapsed());
            }
        };

        let outcome = self.lint_text(&content);
        let execution_time = start_time.elapsed();
        debug!(
            "Completed processing file {} in {:?}",
            file_path.display(),
            execution_time
        );
        FileExecutionResult::from_outcome(file_path, outcome, execution_time)
    }

    fn execute_indexed<T, F, N>(&self, items: &[T], run: F, name: N) -> Vec<FileExecutionResult>
    where
        T: Sync,
        F: Fn(&T) -> FileExecutionResult + Sync,
        N: Fn(&T) -> &Path + Sync,
    {
        let total_files = items.len();
        let start_time = Instant::now();
        let completed_count = AtomicUsize::new(0);

        let mut indexed_results: Vec<(usize, FileExecutionResult)> = items
            .par_iter()
            .enumerate()
            .map(|(index, item)| {
                let result = run(item);
                let completed = completed_count.fetch_add(1, Ordering::Relaxed) + 1;
                self.report_progress(ProgressInfo {
                    total_files,
                    completed_files: completed,
                    current_file: Some(name(item).to_path_buf()),
                    elapsed: start_time.elapsed(),
                });
                (index, result)
            })
            .collect();

        // Sort by original index to maintain deterministic ordering
        indexed_results.sort_by_key(|(index, _)| *index);

        let total_time = start_time.elapsed();
        info!(
            "Completed parallel execution of {} files in {:?}",
            total_files, total_time
        );
        self.report_progress(ProgressInfo {
            total_files,
            completed_files: total_files,
            current_file: None,
            elapsed: total_time,
        });

        indexed_results
            .into_iter()
            .map(|(_, result)| result)
            .collect()
    }

    fn report_progress(&self, info: ProgressInfo) {
        if let Some(ref callback) = self.context.progress_callback {
            callback(info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofix::Fix;
    use crate::context::Report;
    use crate::linter::LinterOptions;
    use crate::registry::RuleRegistry;
    use crate::rules::{CreateContext, Fixable, Rule, RuleMeta, RuleSkip, RuleVisitor};
    use lintel_syntax::{SyntaxKind, node_range};
    use std::sync::Mutex;

    /// Reports `null` literals and rewrites them to `undefined`
    struct NoNull(RuleMeta);

    impl Rule for NoNull {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }

        fn create(&self, _ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip> {
            Ok(RuleVisitor::new().on(SyntaxKind::Literal, |node, ctx| {
                if node.text() == "null" {
                    let fix = Fix::new(node_range(node), "undefined");
                    ctx.report(Report::at_node(node, "null").with_fix(fix))?;
                }
                Ok(())
            }))
        }
    }

    fn executor(fix: bool) -> DefaultExecutor {
        let mut registry = RuleRegistry::new();
        registry
            .register(NoNull(
                RuleMeta::new("js/no-null", "test")
                    .with_fixable(Fixable::Code)
                    .with_message("null", "Use undefined."),
            ))
            .unwrap();
        let rules = vec![
            registry
                .instantiate("js/no-null", Severity::Error, vec![])
                .unwrap(),
        ];
        DefaultExecutor::new(
            ExecutionContext::new(fix).with_thread_pool_size(2),
            Linter::new(LinterOptions::default()),
            rules,
        )
    }

    #[test]
    fn test_results_keep_input_order() {
        let files: Vec<_> = (0..16)
            .map(|i| {
                let text = if i % 2 == 0 { "a = null;" } else { "a = 1;" };
                SourceFile::new(format!("f{i}.js"), text)
            })
            .collect();

        let results = executor(false).execute_sources(&files);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.file_path, PathBuf::from(format!("f{i}.js")));
            assert_eq!(result.diagnostics.len(), usize::from(i % 2 == 0));
        }

        let summary = ExecutionSummary::from_results(&results);
        assert_eq!(summary.files, 16);
        assert_eq!(summary.unfixed_errors, 8);
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(
            results[0].diagnostics[0].location.file,
            PathBuf::from("f0.js")
        );
    }

    #[test]
    fn test_fixing_clears_exit_code() {
        let files = [SourceFile::new("a.js", "x = null;")];
        let results = executor(true).execute_sources(&files);
        assert_eq!(results[0].fixed_output.as_deref(), Some("x = undefined;"));
        let summary = ExecutionSummary::from_results(&results);
        assert_eq!(summary.applied_fixes, 1);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_missing_file_fails_only_that_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.js");
        fs::write(&good, "y = 2;").unwrap();
        let files = vec![dir.path().join("missing.js"), good];

        let results = executor(false).execute_parallel(&files);
        assert!(matches!(results[0].error, Some(LintelError::IoError { .. })));
        assert!(results[1].error.is_none());
        assert_eq!(ExecutionSummary::from_results(&results).exit_code(), 1);
    }

    /// Panics on the literal `1`
    struct PanicsOnOne(RuleMeta);

    impl Rule for PanicsOnOne {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }

        fn create(&self, _ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip> {
            Ok(RuleVisitor::new().on(SyntaxKind::Literal, |node, _| {
                if node.text() == "1" {
                    panic!("cannot handle {}", node.text());
                }
                Ok(())
            }))
        }
    }

    #[test]
    fn test_panicking_rule_fails_only_that_file() {
        let mut registry = RuleRegistry::new();
        registry
            .register(PanicsOnOne(RuleMeta::new("js/panics", "test").with_message("m", "m")))
            .unwrap();
        let rules = vec![registry.instantiate("js/panics", Severity::Error, vec![]).unwrap()];
        let executor = DefaultExecutor::new(
            ExecutionContext::new(true).with_thread_pool_size(2),
            Linter::new(LinterOptions::default()),
            rules,
        );

        let files = [SourceFile::new("bad.js", "1;"), SourceFile::new("good.js", "2;")];
        let results = executor.execute_sources(&files);

        assert_eq!(results.len(), 2);
        let error = results[0].error.as_ref().unwrap();
        assert!(matches!(error, LintelError::RuleCrash { rule_id, .. } if rule_id == "js/panics"));
        assert_eq!(error.to_string(), "Rule 'js/panics' crashed: panicked: cannot handle 1");
        assert!(results[1].error.is_none());

        let summary = ExecutionSummary::from_results(&results);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_progress_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut executor = executor(false);
        executor.context = executor
            .context
            .clone()
            .with_progress_callback(Arc::new(move |info: ProgressInfo| {
                sink.lock().unwrap().push(info.completed_files);
            }));

        let files = [SourceFile::new("a.js", "1;"), SourceFile::new("b.js", "2;")];
        executor.execute_sources(&files);

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, [1, 2, 2]);
    }
}
