//! Configuration file discovery and loading

use super::lintel_config::LintelConfiguration;
use crate::error::LintelError;
use crate::result::ResultExt;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".lintelrc.json",
    ".lintelrc.jsonc",
    "lintel.jsonc",
    "lintel.json",
    "lintel.toml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Find the config file closest to `start_path`, walking upward
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        Ok(Self::discover_chain(start_path)?.into_iter().next())
    }

    /// Every config file from `start_path` upward, nearest first.
    ///
    /// The search stops after a config with `root: true`.
    pub fn discover_chain(start_path: &Path) -> Result<Vec<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| LintelError::config_error(format!("Invalid path: {e}")))?;
        let mut chain = Vec::new();

        loop {
            if let Some(config_path) = Self::config_in(&current) {
                tracing::debug!("Found config: {}", config_path.display());
                let is_root = Self::load_from_file(&config_path)?.root == Some(true);
                chain.push(config_path);
                if is_root {
                    tracing::debug!("Config has root: true, stopping search");
                    break;
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(chain)
    }

    fn config_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load configuration from a specific file
    ///
    /// `.toml` files are read with `toml`; everything else as JSON5, which
    /// also accepts JSONC comments and trailing commas.
    pub fn load_from_file(path: &Path) -> Result<LintelConfiguration> {
        let content = fs::read_to_string(path).map_err(|e| {
            LintelError::config_error(format!(
                "Cannot read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|e| {
                LintelError::config_error(format!("Invalid TOML in '{}': {}", path.display(), e))
            })?
        } else {
            json5::from_str(&content).map_err(|e| {
                LintelError::config_error(format!("Invalid JSON in '{}': {}", path.display(), e))
            })?
        };

        tracing::debug!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load a config file and resolve its `extends` chain
    pub fn load_with_extends(path: &Path) -> Result<LintelConfiguration> {
        let mut visiting = Vec::new();
        Self::load_resolved(path, &mut visiting)
    }

    fn load_resolved(path: &Path, visiting: &mut Vec<PathBuf>) -> Result<LintelConfiguration> {
        let canonical = path.canonicalize().map_err(|e| {
            LintelError::config_error(format!("Config file not found: {}: {e}", path.display()))
        })?;
        if visiting.contains(&canonical) {
            return Err(LintelError::config_error(format!(
                "Circular extends involving '{}'",
                path.display()
            )));
        }
        visiting.push(canonical);

        let mut config = Self::load_from_file(path)?;
        if let Some(extends) = config.extends.clone() {
            let base_dir = path.parent().ok_or_else(|| {
                LintelError::config_error(format!(
                    "Cannot determine parent directory of '{}'",
                    path.display()
                ))
            })?;
            for extend_path in extends {
                let full_path = if Path::new(&extend_path).is_absolute() {
                    PathBuf::from(&extend_path)
                } else {
                    base_dir.join(&extend_path)
                };
                if !full_path.is_file() {
                    return Err(LintelError::config_error(format!(
                        "Extended config not found: {}",
                        full_path.display()
                    )));
                }
                let parent = Self::load_resolved(&full_path, visiting)?;
                config.merge_with(parent);
            }
        }

        visiting.pop();
        Ok(config)
    }

    /// Load config from an explicit path, or merge the discovered chain
    /// starting at `start_dir` (nearest config wins).
    pub fn load(custom_path: Option<&Path>, start_dir: &Path) -> Result<LintelConfiguration> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(LintelError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_with_extends(path);
        }

        let chain = Self::discover_chain(start_dir)?;
        if chain.is_empty() {
            return Err(LintelError::config_error(format!(
                "No config file found ({})",
                CONFIG_FILE_NAMES.join(", ")
            )));
        }

        let mut merged = LintelConfiguration::default();
        for path in &chain {
            merged.merge_with(Self::load_with_extends(path)?);
        }
        merged.root = Some(true);
        Ok(merged)
    }

    /// Like [`ConfigLoader::load`], falling back to the default configuration
    pub fn load_or_default(custom_path: Option<&Path>, start_dir: &Path) -> LintelConfiguration {
        Self::load(custom_path, start_dir)
            .log_and_continue()
            .unwrap_or_default()
    }

    /// JSON Schema for the configuration file, pretty-printed
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(LintelConfiguration);
        serde_json::to_string_pretty(&schema)
            .map_err(|e| LintelError::internal_error(format!("Failed to serialize schema: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RuleLevel, RuleSetting, RuleSeverity};
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_jsonc() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "lintel.jsonc",
            r#"{
                // comments and trailing commas are fine
                "linter": { "fix": true, },
                "rules": { "js/template-tag-spacing": ["warn", "always"], },
            }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.linter().fix, Some(true));
        let rules = config.rules.unwrap();
        assert!(matches!(
            rules["js/template-tag-spacing"],
            RuleSetting::WithOptions(ref values) if values.len() == 2
        ));
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "lintel.toml",
            r#"
root = true

[linter]
maxPasses = 4

[rules]
"js/no-floating-decimal" = "error"

[settings.react]
pragma = "h"
"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.root, Some(true));
        assert_eq!(config.linter().max_passes, Some(4));
        assert_eq!(
            config.rules.unwrap()["js/no-floating-decimal"],
            RuleSetting::Level(RuleLevel::Named(RuleSeverity::Error))
        );
        assert_eq!(config.settings.unwrap()["react"]["pragma"], "h");
    }

    #[test]
    fn test_auto_discover_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "lintel.json", "{}");
        create_temp_config(temp_dir.path(), ".lintelrc.json", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap();
        assert_eq!(found.unwrap().file_name().unwrap(), ".lintelrc.json");
    }

    #[test]
    fn test_discovery_stops_at_root() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project");
        let nested = project.join("src/nested");
        fs::create_dir_all(&nested).unwrap();

        create_temp_config(temp_dir.path(), "lintel.json", r#"{"rules": {"js/outer": "error"}}"#);
        create_temp_config(&project, "lintel.json", r#"{"root": true, "rules": {"js/a": "error"}}"#);
        create_temp_config(&nested, "lintel.json", r#"{"rules": {"js/a": "warn"}}"#);

        let chain = ConfigLoader::discover_chain(&nested).unwrap();
        assert_eq!(chain.len(), 2);

        let config = ConfigLoader::load(None, &nested).unwrap();
        let rules = config.rules.unwrap();
        assert_eq!(rules["js/a"], RuleSetting::Level(RuleLevel::Named(RuleSeverity::Warn)));
        assert!(!rules.contains_key("js/outer"));
    }

    #[test]
    fn test_extends_resolution() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(
            temp_dir.path(),
            "base.json",
            r#"{"linter": {"maxPasses": 2}, "rules": {"js/a": "error", "js/b": "warn"}}"#,
        );
        let config_path = create_temp_config(
            temp_dir.path(),
            "lintel.json",
            r#"{"extends": ["base.json"], "rules": {"js/a": "off"}}"#,
        );

        let config = ConfigLoader::load_with_extends(&config_path).unwrap();
        assert_eq!(config.linter().max_passes, Some(2));
        let rules = config.rules.unwrap();
        assert_eq!(rules["js/a"], RuleSetting::Level(RuleLevel::Named(RuleSeverity::Off)));
        assert!(rules.contains_key("js/b"));
    }

    #[test]
    fn test_circular_extends() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "a.json", r#"{"extends": ["b.json"]}"#);
        create_temp_config(temp_dir.path(), "b.json", r#"{"extends": ["a.json"]}"#);

        let err = ConfigLoader::load_with_extends(&temp_dir.path().join("a.json")).unwrap_err();
        assert!(err.to_string().contains("Circular extends"));
    }

    #[test]
    fn test_missing_extends_target() {
        let temp_dir = TempDir::new().unwrap();
        let config_path =
            create_temp_config(temp_dir.path(), "lintel.json", r#"{"extends": ["nope.json"]}"#);
        assert!(ConfigLoader::load_with_extends(&config_path).is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "lintel.json", "{ invalid json }");
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "lintel.json", "{ invalid json }");
        let config = ConfigLoader::load_or_default(None, temp_dir.path());
        assert_eq!(config, LintelConfiguration::default());

        let valid = TempDir::new().unwrap();
        create_temp_config(
            valid.path(),
            "lintel.json",
            r#"{ "root": true, "linter": { "fix": true } }"#,
        );
        let config = ConfigLoader::load_or_default(None, valid.path());
        assert_eq!(config.linter().fix, Some(true));
    }

    #[test]
    fn test_json_schema() {
        let schema = ConfigLoader::json_schema().unwrap();
        assert!(schema.contains("maxPasses"));
        assert!(schema.contains("extends"));
    }
}
