//! Require or disallow spacing between template tags and their literals
//!
//! With `"never"` (the default) `tag `x`` is reported and the gap collapsed
//! to whatever block comments it holds. A line comment in the gap cannot be
//! collapsed, so the problem is reported without a fix. With `"always"`
//! `tag`x`` gets a single space after the tag.

use lintel_core::{
    CreateContext, Fixable, OptionSchema, Report, Rule, RuleCategory, RuleMeta, RuleSkip,
    RuleVisitor,
};
use lintel_syntax::{SyntaxKind, node_range, token_range};

/// Rule ID for template tag spacing
pub const TEMPLATE_TAG_SPACING: &str = "js/template-tag-spacing";

pub struct TemplateTagSpacing {
    meta: RuleMeta,
}

impl TemplateTagSpacing {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new(
                TEMPLATE_TAG_SPACING,
                "Require or disallow spacing between template tags and their literals",
            )
            .with_category(RuleCategory::Style)
            .with_fixable(Fixable::Whitespace)
            .with_schema(vec![OptionSchema::one_of(["always", "never"])])
            .with_message(
                "unexpected",
                "Unexpected space between template tag and template literal.",
            )
            .with_message(
                "missing",
                "Missing space between template tag and template literal.",
            )
            .with_docs_url("https://eslint.style/rules/js/template-tag-spacing"),
        }
    }
}

impl Default for TemplateTagSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for TemplateTagSpacing {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip> {
        let never = ctx.option(0).and_then(|v| v.as_str()) != Some("always");

        Ok(RuleVisitor::new().on(SyntaxKind::TaggedTemplateExpression, move |node, ctx| {
            let source = ctx.source_code();
            let Some(quasi) = node
                .last_child()
                .filter(|child| child.kind() == SyntaxKind::TemplateLiteral)
            else {
                return Ok(());
            };
            let (Some(tag_token), Some(literal_token)) =
                (source.token_before(&quasi), source.first_token(&quasi))
            else {
                return Ok(());
            };

            let gap = token_range(&tag_token).end..token_range(&literal_token).start;
            let has_whitespace = source.is_space_between(&tag_token, &literal_token);

            if never && has_whitespace {
                let comments = source.comments_before(&quasi);
                let fix = if comments.iter().any(|c| c.kind() == SyntaxKind::LineComment) {
                    None
                } else {
                    let kept: String = comments.iter().map(|c| c.text()).collect();
                    Some(ctx.fixer().replace_text_range(gap.clone(), kept))
                };
                ctx.report(Report::at_range(gap, "unexpected").with_fix(fix))?;
            } else if !never && !has_whitespace {
                let fix = ctx.fixer().insert_text_after(&tag_token, " ");
                let range = node_range(node).start..gap.end;
                ctx.report(Report::at_range(range, "missing").with_fix(fix))?;
            }
            Ok(())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_core::{FixStatus, LintOutcome, Linter, RuleRegistry, Severity};
    use serde_json::{Value, json};

    fn fix(source: &str, options: Vec<Value>) -> LintOutcome {
        let mut registry = RuleRegistry::new();
        registry.register(TemplateTagSpacing::new()).unwrap();
        let rules = vec![
            registry
                .instantiate(TEMPLATE_TAG_SPACING, Severity::Warning, options)
                .unwrap(),
        ];
        Linter::<lintel_core::EcmaParser>::default().verify_and_fix(source, &rules)
    }

    #[test]
    fn test_valid() {
        let never = [
            "tag`name`",
            "tag`hello ${name}`",
            "new tag`name`",
            "foo.bar`name`",
            "foo()`name`",
            "`a` + `b`",
        ];
        for source in never {
            assert!(fix(source, vec![]).diagnostics.is_empty(), "{source}");
            assert!(fix(source, vec![json!("never")]).diagnostics.is_empty(), "{source}");
        }

        for source in ["tag `name`", "foo.bar `name`", "tag /*c*/ `name`"] {
            assert!(fix(source, vec![json!("always")]).diagnostics.is_empty(), "{source}");
        }
    }

    #[test]
    fn test_never() {
        let cases = [
            ("tag `name`", "tag`name`"),
            ("tag\n`name`", "tag`name`"),
            ("foo.bar `name`", "foo.bar`name`"),
            ("foo() `name`", "foo()`name`"),
            ("tag /* here's a comment */`name`", "tag/* here's a comment */`name`"),
            ("tag /*a*/ /*b*/ `name`", "tag/*a*//*b*/`name`"),
        ];
        for (source, output) in cases {
            let outcome = fix(source, vec![]);
            assert_eq!(outcome.output, output, "{source}");
            assert!(outcome.diagnostics.is_empty(), "{source}");
            assert_eq!(outcome.fixed.len(), 1);
            assert_eq!(outcome.fixed[0].message_id, "unexpected");
        }
    }

    #[test]
    fn test_line_comment_blocks_the_fix() {
        let source = "tag // here's a comment\n`bar`";
        let outcome = fix(source, vec![]);

        assert_eq!(outcome.output, source);
        assert_eq!(outcome.passes, 1);
        assert_eq!(outcome.diagnostics.len(), 1);
        let diagnostic = &outcome.diagnostics[0];
        assert_eq!(diagnostic.message_id, "unexpected");
        assert_eq!(diagnostic.fix_status, FixStatus::None);
        assert_eq!((diagnostic.location.line, diagnostic.location.column), (1, 4));
        assert_eq!(diagnostic.location.end_line, Some(2));
    }

    #[test]
    fn test_always() {
        let cases = [
            ("tag`name`", "tag `name`"),
            ("foo.bar`name`", "foo.bar `name`"),
            ("tag/*c*/`name`", "tag /*c*/`name`"),
        ];
        for (source, output) in cases {
            let outcome = fix(source, vec![json!("always")]);
            assert_eq!(outcome.output, output, "{source}");
            assert_eq!(outcome.fixed[0].message_id, "missing");
            assert_eq!(outcome.fixed[0].location.column, 1);
        }
    }

    #[test]
    fn test_invalid_option_is_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register(TemplateTagSpacing::new()).unwrap();
        let error = registry
            .instantiate(TEMPLATE_TAG_SPACING, Severity::Warning, vec![json!("sometimes")])
            .unwrap_err();
        assert!(matches!(error, lintel_core::LintelError::InvalidOptions { .. }));
    }
}
