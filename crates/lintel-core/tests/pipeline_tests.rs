//! Config file to fixed output, through the registry and the executor

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use lintel_core::{
    ConfigLoader, CreateContext, DefaultExecutor, ExecutionContext, ExecutionSummary, Fixable,
    LintelError, Linter, LinterOptions, ProgressInfo, Report, Rule, RuleMeta, RuleRegistry,
    RuleSkip, RuleVisitor, Severity,
};
use lintel_syntax::SyntaxKind;
use tempfile::TempDir;

struct PadLeadingDot(RuleMeta);

impl Rule for PadLeadingDot {
    fn meta(&self) -> &RuleMeta {
        &self.0
    }

    fn create(&self, _ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip> {
        Ok(RuleVisitor::new().on(SyntaxKind::Literal, |node, ctx| {
            if node.text().to_string().starts_with('.') {
                let fix = ctx.fixer().insert_text_before(node, "0");
                ctx.report(Report::at_node(node, "leading").with_fix(fix))?;
            }
            Ok(())
        }))
    }
}

/// Reports identifiers named after `settings.banned`
struct BannedName(RuleMeta);

impl Rule for BannedName {
    fn meta(&self) -> &RuleMeta {
        &self.0
    }

    fn create(&self, ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip> {
        let Some(banned) = ctx.setting(&["banned"]).and_then(|v| v.as_str()) else {
            return Err(RuleSkip::new("no banned name configured"));
        };
        let banned = banned.to_string();
        Ok(RuleVisitor::new().on(SyntaxKind::Identifier, move |node, ctx| {
            if node.text() == banned.as_str() {
                ctx.report(Report::at_node(node, "banned").with_data("name", banned.as_str()))?;
            }
            Ok(())
        }))
    }
}

fn registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry
        .register(PadLeadingDot(
            RuleMeta::new("test/pad-leading-dot", "Pads .5 to 0.5")
                .with_fixable(Fixable::Code)
                .with_message("leading", "A leading decimal point can be confused with a dot."),
        ))
        .unwrap();
    registry
        .register(BannedName(
            RuleMeta::new("test/banned-name", "Reports a configured identifier")
                .with_message("banned", "'{{ name }}' is not allowed."),
        ))
        .unwrap();
    registry
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn configured_run_fixes_files_and_sets_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "lintel.jsonc",
        r#"{
            // project config
            "root": true,
            "linter": { "fix": true, "maxPasses": 5 },
            "rules": {
                "test/pad-leading-dot": "warn",
                "test/banned-name": 2,
            },
            "settings": { "banned": "foo" },
        }"#,
    );
    let clean = write(temp_dir.path(), "clean.js", "var x = 1;");
    let fixable = write(temp_dir.path(), "fixable.js", "var x = .5;");
    let banned = write(temp_dir.path(), "banned.js", "var foo = .25;");
    let missing = temp_dir.path().join("missing.js");

    let config = ConfigLoader::load(None, temp_dir.path()).unwrap();
    let (rules, errors) = registry().configure(&config);
    assert!(errors.is_empty());
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].severity, Severity::Warning);
    assert_eq!(rules[1].severity, Severity::Error);

    let progress = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&progress);
    let context = ExecutionContext::new(config.linter().fix.unwrap_or(false))
        .with_thread_pool_size(2)
        .with_progress_callback(Arc::new(move |info: ProgressInfo| {
            seen.lock().unwrap().push(info.completed_files);
        }));
    let executor = DefaultExecutor::new(
        context,
        Linter::new(LinterOptions::from_config(&config)),
        rules,
    );

    let files = vec![clean.clone(), fixable.clone(), banned.clone(), missing.clone()];
    let results = executor.execute_parallel(&files);

    let paths: Vec<_> = results.iter().map(|r| r.file_path.clone()).collect();
    assert_eq!(paths, files);

    assert!(results[0].diagnostics.is_empty());
    assert_eq!(results[0].fixed_output, None);

    assert_eq!(results[1].fixed_output.as_deref(), Some("var x = 0.5;"));
    assert_eq!(results[1].diagnostics[0].location.file, fixable);

    assert_eq!(results[2].fixed_output.as_deref(), Some("var foo = 0.25;"));
    let messages: Vec<_> = results[2]
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        messages,
        [
            "A leading decimal point can be confused with a dot.",
            "'foo' is not allowed."
        ]
    );

    assert!(matches!(results[3].error, Some(LintelError::IoError { .. })));

    let summary = ExecutionSummary::from_results(&results);
    assert_eq!(summary.files, 4);
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.applied_fixes, 2);
    assert_eq!(summary.unfixed_errors, 1);
    assert_eq!(summary.exit_code(), 1);

    let progress = progress.lock().unwrap();
    assert_eq!(progress.len(), 5);
    assert_eq!(progress.last(), Some(&4));
}

#[test]
fn missing_setting_skips_the_rule() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "lintel.json",
        r#"{ "root": true, "rules": { "test/banned-name": "error" } }"#,
    );

    let config = ConfigLoader::load(None, temp_dir.path()).unwrap();
    let (rules, _) = registry().configure(&config);
    let outcome = Linter::new(LinterOptions::from_config(&config)).verify("var foo;", &rules);

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.skipped_rules.len(), 1);
    assert_eq!(outcome.skipped_rules[0].rule_id, "test/banned-name");
}

#[test]
fn unknown_and_invalid_entries_are_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write(
        temp_dir.path(),
        "lintel.toml",
        r#"
root = true

[rules]
"test/pad-leading-dot" = "error"
"test/banned-name" = 7
"test/nope" = "warn"
"#,
    );

    let config = ConfigLoader::load(Some(&config_path), temp_dir.path()).unwrap();
    let (rules, errors) = registry().configure(&config);

    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].id(), "test/pad-leading-dot");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| matches!(e, LintelError::UnknownRule { rule_id } if rule_id == "test/nope")));
    assert!(errors.iter().any(
        |e| matches!(e, LintelError::InvalidOptions { rule_id, .. } if rule_id == "test/banned-name")
    ));
}
