//! Disallow leading or trailing decimal points in numeric literals
//!
//! `.5` reads like a member access and `2.` like an unfinished one. Both get
//! a zero added: `0.5`, `2.0`. When the token in front of a leading-dot
//! literal touches it and ends in an identifier character (`typeof.2`), the
//! fix inserts ` 0` so the two tokens stay apart.

use lintel_core::{
    CreateContext, Fixable, Report, Rule, RuleCategory, RuleMeta, RuleSkip, RuleVisitor,
};
use lintel_syntax::{SyntaxKind, is_id_continue, token_range};

/// Rule ID for floating decimal points
pub const NO_FLOATING_DECIMAL: &str = "js/no-floating-decimal";

pub struct NoFloatingDecimal {
    meta: RuleMeta,
}

impl NoFloatingDecimal {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta::new(
                NO_FLOATING_DECIMAL,
                "Disallow leading or trailing decimal points in numeric literals",
            )
            .with_category(RuleCategory::Style)
            .with_fixable(Fixable::Code)
            .with_message("leading", "A leading decimal point can be confused with a dot.")
            .with_message("trailing", "A trailing decimal point can be confused with a dot.")
            .with_docs_url("https://eslint.style/rules/js/no-floating-decimal"),
        }
    }
}

impl Default for NoFloatingDecimal {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoFloatingDecimal {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip> {
        Ok(RuleVisitor::new().on(SyntaxKind::Literal, |node, ctx| {
            let source = ctx.source_code();
            let Some(token) = source.first_token(node) else {
                return Ok(());
            };
            if token.kind() != SyntaxKind::Number {
                return Ok(());
            }

            let raw = token.text();
            let range = token_range(&token);
            if raw.starts_with('.') {
                let touches_word = source.token_before_token(&token).is_some_and(|before| {
                    token_range(&before).end == range.start
                        && before.text().chars().last().is_some_and(is_id_continue)
                });
                let text = if touches_word { " 0" } else { "0" };
                let fix = ctx.fixer().insert_text_before(&token, text);
                ctx.report(Report::at_node(node, "leading").with_fix(fix))?;
            } else if raw.ends_with('.') {
                let fix = ctx.fixer().insert_text_after(&token, "0");
                ctx.report(Report::at_node(node, "trailing").with_fix(fix))?;
            }
            Ok(())
        }))
    }
}
