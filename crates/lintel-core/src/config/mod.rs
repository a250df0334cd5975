//! Configuration system for lintel
//!
//! - JSON/JSONC (via `json5`) and TOML configuration files
//! - Auto-discovery by traversing up directories, stopping at `root: true`
//! - Configuration extension/inheritance (`extends` field)
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Configuration Files
//!
//! Looked up in this order in every directory: `.lintelrc.json`,
//! `.lintelrc.jsonc`, `lintel.jsonc`, `lintel.json`, `lintel.toml`.
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   "root": true,
//!   "extends": ["../base.jsonc"],
//!   "linter": { "enabled": true, "fix": true, "maxPasses": 10 },
//!   "rules": {
//!     "js/no-floating-decimal": "error",
//!     "js/template-tag-spacing": ["warn", "always"]
//!   },
//!   "settings": { "react": { "pragma": "h" } }
//! }
//! ```

mod lintel_config;
mod loader;

pub use lintel_config::{
    LintelConfiguration, LinterConfiguration, RuleLevel, RuleSetting, RuleSeverity,
};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
