//! Rule contract: descriptors, visitors and the factory trait
//!
//! A rule is a stateless descriptor ([`RuleMeta`]) plus a factory. For every
//! file the dispatcher calls [`Rule::create`], which returns a
//! [`RuleVisitor`]: a list of `(SyntaxKind, Phase)` subscriptions with
//! handler closures. Per-file state lives in those closures.

use indexmap::IndexMap;
use lintel_syntax::{SourceCode, SyntaxKind, SyntaxNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::RuleContext;
use crate::options::OptionSchema;

/// Categories for organizing rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Code that is likely to be wrong
    Correctness,
    /// Suspicious patterns that often indicate bugs
    Suspicious,
    /// Style and formatting preferences
    Style,
    /// Experimental or incubating rules
    Nursery,
}

impl RuleCategory {
    /// Return the kebab-case slug used for filtering
    pub fn slug(&self) -> &str {
        match self {
            RuleCategory::Correctness => "correctness",
            RuleCategory::Suspicious => "suspicious",
            RuleCategory::Style => "style",
            RuleCategory::Nursery => "nursery",
        }
    }
}

/// Kind of edits a fixable rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixable {
    Code,
    Whitespace,
}

/// Declarative description of a rule
#[derive(Debug, Clone)]
pub struct RuleMeta {
    /// Unique identifier such as `js/no-floating-decimal`
    pub id: String,
    /// Detailed description of what the rule checks
    pub description: String,
    pub category: RuleCategory,
    /// `None` for rules that never offer fixes
    pub fixable: Option<Fixable>,
    /// Positional options schema
    pub schema: Vec<OptionSchema>,
    /// Message templates keyed by message id
    pub messages: IndexMap<String, String>,
    /// Documentation URL for the rule
    pub docs_url: Option<String>,
}

impl RuleMeta {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            category: RuleCategory::Style,
            fixable: None,
            schema: Vec::new(),
            messages: IndexMap::new(),
            docs_url: None,
        }
    }

    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_fixable(mut self, fixable: Fixable) -> Self {
        self.fixable = Some(fixable);
        self
    }

    pub fn with_schema(mut self, schema: Vec<OptionSchema>) -> Self {
        self.schema = schema;
        self
    }

    /// Add a message template; `{{ name }}` placeholders are filled from report data
    pub fn with_message(mut self, id: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(id.into(), template.into());
        self
    }

    pub fn with_docs_url(mut self, url: impl Into<String>) -> Self {
        self.docs_url = Some(url.into());
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fixable.is_some()
    }

    /// Check the descriptor is well formed
    pub fn validate(&self) -> crate::Result<()> {
        if self.id.trim().is_empty() {
            return Err(crate::LintelError::rule_error(
                &self.id,
                "Rule ID cannot be empty",
            ));
        }

        for segment in self.id.split('/') {
            if !is_valid_slug(segment) {
                return Err(crate::LintelError::rule_error(
                    &self.id,
                    format!("Rule ID segment '{segment}' must be lower-case and use hyphenated segments"),
                ));
            }
        }

        if self.messages.is_empty() {
            return Err(crate::LintelError::rule_error(
                &self.id,
                "Rule must declare at least one message",
            ));
        }

        Ok(())
    }
}

fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// When a handler runs relative to the node's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the children (pre-order)
    Enter,
    /// After the children (post-order)
    Exit,
}

/// Handler invoked for every subscribed node
pub type Handler = Box<dyn FnMut(&SyntaxNode, &mut RuleContext<'_>) -> anyhow::Result<()>>;

/// Per-file set of node subscriptions produced by [`Rule::create`]
#[derive(Default)]
pub struct RuleVisitor {
    handlers: Vec<(SyntaxKind, Phase, Handler)>,
}

impl RuleVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `kind` before its children are visited
    pub fn on<F>(self, kind: SyntaxKind, handler: F) -> Self
    where
        F: FnMut(&SyntaxNode, &mut RuleContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.subscribe(kind, Phase::Enter, handler)
    }

    /// Subscribe to `kind` after its children are visited
    pub fn on_exit<F>(self, kind: SyntaxKind, handler: F) -> Self
    where
        F: FnMut(&SyntaxNode, &mut RuleContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.subscribe(kind, Phase::Exit, handler)
    }

    pub fn subscribe<F>(mut self, kind: SyntaxKind, phase: Phase, handler: F) -> Self
    where
        F: FnMut(&SyntaxNode, &mut RuleContext<'_>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.push((kind, phase, Box::new(handler)));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn into_handlers(self) -> Vec<(SyntaxKind, Phase, Handler)> {
        self.handlers
    }
}

impl std::fmt::Debug for RuleVisitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(kind, phase, _)| (kind, phase)))
            .finish()
    }
}

/// A rule opting out of the current file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct RuleSkip {
    pub reason: String,
}

impl RuleSkip {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// What a rule sees when building its visitor for a file
#[derive(Debug, Clone, Copy)]
pub struct CreateContext<'a> {
    pub rule_id: &'a str,
    pub options: &'a [Value],
    pub settings: &'a Value,
    pub source: &'a SourceCode,
}

impl<'a> CreateContext<'a> {
    /// Positional option, if configured
    pub fn option(&self, index: usize) -> Option<&'a Value> {
        self.options.get(index)
    }

    /// Shared settings value at a path such as `["react", "pragma"]`
    pub fn setting(&self, path: &[&str]) -> Option<&'a Value> {
        path.iter()
            .try_fold(self.settings, |value, key| value.get(key))
    }
}

/// A lint rule
///
/// Implementations are shared across threads and files, so they hold no
/// per-file state of their own.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    /// Build the handlers for one file, or skip the rule for that file
    fn create(&self, ctx: &CreateContext<'_>) -> Result<RuleVisitor, RuleSkip>;

    fn id(&self) -> &str {
        &self.meta().id
    }
}
