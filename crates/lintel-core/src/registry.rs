//! Rule registry and configured rule instances

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::LintelConfiguration;
use crate::diagnostics::Severity;
use crate::options::validate_options;
use crate::rules::Rule;
use crate::{LintelError, Result};

/// A rule enabled with a severity and validated options
#[derive(Clone)]
pub struct ConfiguredRule {
    pub rule: Arc<dyn Rule>,
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl ConfiguredRule {
    pub fn id(&self) -> &str {
        self.rule.id()
    }
}

impl fmt::Debug for ConfiguredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredRule")
            .field("id", &self.id())
            .field("severity", &self.severity)
            .field("options", &self.options)
            .finish()
    }
}

/// Registry of known rules, keyed by id in registration order
#[derive(Default, Clone)]
pub struct RuleRegistry {
    rules: IndexMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, validating its descriptor
    pub fn register(&mut self, rule: impl Rule + 'static) -> Result<()> {
        self.register_arc(Arc::new(rule))
    }

    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) -> Result<()> {
        let meta = rule.meta();
        meta.validate()?;
        if self.rules.contains_key(&meta.id) {
            return Err(LintelError::duplicate_rule(&meta.id));
        }
        debug!("Registered rule '{}'", meta.id);
        self.rules.insert(meta.id.clone(), rule);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Enable one rule with the given severity and positional options
    pub fn instantiate(
        &self,
        id: &str,
        severity: Severity,
        options: Vec<Value>,
    ) -> Result<ConfiguredRule> {
        let rule = self
            .rules
            .get(id)
            .ok_or_else(|| LintelError::unknown_rule(id))?;
        validate_options(&rule.meta().schema, &options)
            .map_err(|e| LintelError::invalid_options(id, e.path, e.message))?;
        Ok(ConfiguredRule {
            rule: Arc::clone(rule),
            severity,
            options,
        })
    }

    /// Instantiate every rule the configuration enables.
    ///
    /// Rules come back in registration order. A bad entry produces an error
    /// for that entry only; the remaining rules are still configured.
    pub fn configure(&self, config: &LintelConfiguration) -> (Vec<ConfiguredRule>, Vec<LintelError>) {
        let mut configured = Vec::new();
        let mut errors = Vec::new();
        let Some(settings) = config.rules.as_ref() else {
            return (configured, errors);
        };

        for id in settings.keys() {
            if !self.rules.contains_key(id) {
                warn!("Unknown rule '{}' in configuration", id);
                errors.push(LintelError::unknown_rule(id));
            }
        }

        for id in self.rules.keys() {
            let Some(setting) = settings.get(id) else {
                continue;
            };
            let resolved = match setting.resolve() {
                Ok(resolved) => resolved,
                Err(message) => {
                    errors.push(LintelError::invalid_options(id, "severity", message));
                    continue;
                }
            };
            let Some((severity, options)) = resolved else {
                continue;
            };
            match self.instantiate(id, severity, options) {
                Ok(rule) => configured.push(rule),
                Err(e) => {
                    warn!("Dropping rule '{}': {}", id, e);
                    errors.push(e);
                }
            }
        }

        (configured, errors)
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.keys()).finish()
    }
}
