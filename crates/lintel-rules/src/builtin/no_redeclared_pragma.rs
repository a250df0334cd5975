//! Disallow variables that shadow the JSX pragma
//!
//! `var React = ...` or, with `@jsx h`, `let h = ...` rebinds the name JSX
//! compiles against. Files whose pragma is not a valid identifier are
//! skipped.

use lintel_core::{CreateContext, Report, Rule, RuleCategory, RuleMeta, RuleSkip, RuleVisitor};
use lintel_syntax::SyntaxKind;

use crate::pragma::pragma_from_source;

/// Rule ID for pragma redeclaration
pub const NO_REDECLARED_PRAGMA: &str = "jsx/no-redeclared-pragma";

pub struct NoRedeclaredPragma {
    meta: RuleMeta,
}

impl NoRedeclaredPragma {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new(
                NO_REDECLARED_PRAGMA,
                "Disallow variable declarations that shadow the JSX pragma",
            )
            .with_category(RuleCategory::Correctness)
            .with_message("redeclared", "'{{ name }}' is the JSX pragma and must not be redeclared."),
        }
    }
}

impl Default for NoRedeclaredPragma {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoRedeclaredPragma {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip> {
        let pragma = pragma_from_source(ctx.source, ctx.settings)
            .map_err(|e| RuleSkip::new(e.to_string()))?;

        Ok(RuleVisitor::new().on(SyntaxKind::VariableDeclarator, move |node, ctx| {
            let Some(binding) = node
                .children()
                .find(|child| child.kind() == SyntaxKind::Identifier)
            else {
                return Ok(());
            };
            if ctx.source_code().node_text(&binding) == pragma {
                ctx.report(Report::at_node(&binding, "redeclared").with_data("name", pragma.as_str()))?;
            }
            Ok(())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_core::{LintOutcome, Linter, LinterOptions, RuleRegistry, Severity};
    use serde_json::{Value, json};

    fn verify(source: &str, settings: Value) -> LintOutcome {
        let mut registry = RuleRegistry::new();
        registry.register(NoRedeclaredPragma::new()).unwrap();
        let rules = vec![
            registry
                .instantiate(NO_REDECLARED_PRAGMA, Severity::Error, vec![])
                .unwrap(),
        ];
        Linter::new(LinterOptions::default().with_settings(settings)).verify(source, &rules)
    }

    #[test]
    fn test_default_pragma() {
        let outcome = verify("var React = require('react'), b = React;", Value::Null);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            outcome.diagnostics[0].message,
            "'React' is the JSX pragma and must not be redeclared."
        );
        assert_eq!(outcome.diagnostics[0].location.column, 5);
    }

    #[test]
    fn test_pragma_from_settings_and_comment() {
        let settings = json!({"react": {"pragma": "h"}});
        assert_eq!(verify("const h = 1; var React;", settings.clone()).diagnostics.len(), 1);
        assert!(verify("/* @jsx Foo */ const h = 1;", settings).diagnostics.is_empty());
        assert_eq!(verify("/* @jsx Foo.bar */ let Foo;", Value::Null).diagnostics.len(), 1);
    }

    #[test]
    fn test_other_names_are_fine() {
        assert!(verify("var react = 1; React = 2;", Value::Null).diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_pragma_skips_the_file() {
        let outcome = verify("/* @jsx 1nope */ var React;", Value::Null);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.skipped_rules.len(), 1);
        assert_eq!(
            outcome.skipped_rules[0].reason,
            "React pragma 1nope is not a valid identifier"
        );
    }
}
