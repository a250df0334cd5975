//! Configuration types for lintel

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::diagnostics::Severity;

/// Main lintel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LintelConfiguration {
    /// JSON Schema reference for IDE support
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub schema: Option<String>,

    /// Mark this directory as the root (stop upward search)
    #[schemars(description = "Stop config file discovery at this directory")]
    pub root: Option<bool>,

    /// Extend from other configuration files
    #[schemars(description = "Inherit from other config files (relative or absolute paths)")]
    pub extends: Option<Vec<String>>,

    /// Linter configuration
    #[schemars(description = "Linter settings")]
    pub linter: Option<LinterConfiguration>,

    /// Rule severities and options keyed by rule id
    #[schemars(
        description = "Rule configuration: a severity, or an array of a severity followed by the rule's options"
    )]
    pub rules: Option<BTreeMap<String, RuleSetting>>,

    /// Shared settings visible to every rule
    #[schemars(description = "Settings shared by all rules, such as react.pragma")]
    pub settings: Option<Value>,
}

/// Linter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfiguration {
    /// Enable/disable linter
    #[schemars(description = "Enable or disable the linter")]
    pub enabled: Option<bool>,

    /// Apply fixes
    #[schemars(description = "Apply autofixes and rewrite the source")]
    pub fix: Option<bool>,

    /// Upper bound on fix passes per file
    #[schemars(description = "Maximum number of fix passes per file (default 10)")]
    pub max_passes: Option<usize>,
}

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Informational message
    Info,
    /// Warning (doesn't fail the run)
    Warn,
    /// Error (fails the run)
    Error,
}

impl RuleSeverity {
    /// ESLint-style numeric level: 0 off, 1 warn, 2 error
    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(Self::Off),
            1 => Some(Self::Warn),
            2 => Some(Self::Error),
            _ => None,
        }
    }

    /// Diagnostic severity, `None` when the rule is off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Info => Some(Severity::Info),
            Self::Warn => Some(Severity::Warning),
            Self::Error => Some(Severity::Error),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => match name.as_str() {
                "off" => Some(Self::Off),
                "info" => Some(Self::Info),
                "warn" => Some(Self::Warn),
                "error" => Some(Self::Error),
                _ => None,
            },
            Value::Number(n) => n.as_u64().and_then(Self::from_level),
            _ => None,
        }
    }
}

/// A severity given by name or number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleLevel {
    Named(RuleSeverity),
    Numeric(u8),
}

/// One entry of the `rules` table
///
/// ```jsonc
/// "js/no-floating-decimal": "error",
/// "js/template-tag-spacing": ["warn", "always"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleSetting {
    Level(RuleLevel),
    WithOptions(Vec<Value>),
}

impl RuleSetting {
    /// Split into severity and positional options; `Ok(None)` means off
    pub fn resolve(&self) -> Result<Option<(Severity, Vec<Value>)>, String> {
        match self {
            Self::Level(RuleLevel::Named(severity)) => {
                Ok(severity.to_severity().map(|s| (s, Vec::new())))
            }
            Self::Level(RuleLevel::Numeric(level)) => RuleSeverity::from_level(u64::from(*level))
                .map(|severity| severity.to_severity().map(|s| (s, Vec::new())))
                .ok_or_else(|| format!("invalid severity level {level}, expected 0, 1 or 2")),
            Self::WithOptions(values) => {
                let Some((first, options)) = values.split_first() else {
                    return Err("rule setting array must start with a severity".to_string());
                };
                let severity = RuleSeverity::from_value(first).ok_or_else(|| {
                    format!(
                        "invalid severity {first}, expected \"off\", \"info\", \"warn\", \"error\" or 0-2"
                    )
                })?;
                Ok(severity.to_severity().map(|s| (s, options.to_vec())))
            }
        }
    }
}

impl LintelConfiguration {
    pub fn linter(&self) -> LinterConfiguration {
        self.linter.clone().unwrap_or_default()
    }

    pub fn settings(&self) -> Value {
        self.settings.clone().unwrap_or(Value::Null)
    }

    /// Merge another config into this one (current takes precedence)
    ///
    /// `$schema`, `root` and `extends` are file-specific and are not merged.
    /// Rule entries merge per rule id; settings objects merge recursively.
    pub fn merge_with(&mut self, other: LintelConfiguration) {
        if let Some(other_linter) = other.linter {
            if let Some(ref mut linter) = self.linter {
                linter.merge_with(other_linter);
            } else {
                self.linter = Some(other_linter);
            }
        }

        if let Some(other_rules) = other.rules {
            if let Some(ref mut rules) = self.rules {
                for (rule, setting) in other_rules {
                    rules.entry(rule).or_insert(setting);
                }
            } else {
                self.rules = Some(other_rules);
            }
        }

        if let Some(other_settings) = other.settings {
            match self.settings {
                Some(ref mut settings) => merge_values(settings, other_settings),
                None => self.settings = Some(other_settings),
            }
        }
    }
}

impl LinterConfiguration {
    /// Merge linter configuration (current takes precedence)
    pub fn merge_with(&mut self, other: LinterConfiguration) {
        if self.enabled.is_none() {
            self.enabled = other.enabled;
        }
        if self.fix.is_none() {
            self.fix = other.fix;
        }
        if self.max_passes.is_none() {
            self.max_passes = other.max_passes;
        }
    }
}

fn merge_values(target: &mut Value, source: Value) {
    if let (Value::Object(target), Value::Object(source)) = (target, source) {
        for (key, value) in source {
            match target.get_mut(&key) {
                Some(existing) => merge_values(existing, value),
                None => {
                    target.insert(key, value);
                }
            }
        }
    }
}
