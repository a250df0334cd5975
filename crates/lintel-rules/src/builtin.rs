//! Built-in rules for ECMAScript linting

use std::sync::Arc;

use lintel_core::{Rule, RuleCategory, RuleRegistry};

pub mod no_floating_decimal;
pub mod no_redeclared_pragma;
pub mod template_tag_spacing;

pub use no_floating_decimal::{NO_FLOATING_DECIMAL, NoFloatingDecimal};
pub use no_redeclared_pragma::{NO_REDECLARED_PRAGMA, NoRedeclaredPragma};
pub use template_tag_spacing::{TEMPLATE_TAG_SPACING, TemplateTagSpacing};

/// Collection of built-in lintel rules
pub struct BuiltinRules;

impl BuiltinRules {
    /// Get all built-in rules, in registration order
    pub fn all_rules() -> Vec<Arc<dyn Rule>> {
        vec![
            Arc::new(NoFloatingDecimal::new()),
            Arc::new(TemplateTagSpacing::new()),
            Arc::new(NoRedeclaredPragma::new()),
        ]
    }

    /// Built-in rules of one category
    pub fn by_category(category: RuleCategory) -> Vec<Arc<dyn Rule>> {
        Self::all_rules()
            .into_iter()
            .filter(|rule| rule.meta().category == category)
            .collect()
    }

    /// Register every built-in rule
    pub fn register_all(registry: &mut RuleRegistry) -> lintel_core::Result<()> {
        for rule in Self::all_rules() {
            registry.register_arc(rule)?;
        }
        Ok(())
    }
}
