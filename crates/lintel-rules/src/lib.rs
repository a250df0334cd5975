//! Lintel Rules
//!
//! Built-in rules for lintel and the helpers they share.
//! This crate provides the default rule set and registers it with a
//! [`lintel_core::RuleRegistry`].

pub mod builtin;
pub mod pragma;

// Re-export commonly used types
pub use builtin::{
    BuiltinRules, NO_FLOATING_DECIMAL, NO_REDECLARED_PRAGMA, NoFloatingDecimal,
    NoRedeclaredPragma, TEMPLATE_TAG_SPACING, TemplateTagSpacing,
};
pub use pragma::{DEFAULT_PRAGMA, PragmaError, pragma_from_source};

use lintel_core::RuleRegistry;

/// Create a registry holding every built-in rule
pub fn init_builtin_rules() -> lintel_core::Result<RuleRegistry> {
    let mut registry = RuleRegistry::new();
    BuiltinRules::register_all(&mut registry)?;
    tracing::debug!("Initialized built-in rules registry with {} rules", registry.len());
    Ok(registry)
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
