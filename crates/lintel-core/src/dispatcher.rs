//! Single-pass rule dispatch over a syntax tree
//!
//! The dispatcher builds every configured rule's visitor for the file, folds
//! the subscriptions into a `(kind, phase) -> handlers` table and walks the
//! tree once in document order. Handlers for the same node run in rule
//! registration order. A handler that returns an error or panics disables
//! its rule for the rest of the file.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use lintel_syntax::{SourceCode, SyntaxKind, WalkEvent};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::context::RuleContext;
use crate::diagnostics::{DefaultDiagnosticCollector, Diagnostic};
use crate::registry::ConfiguredRule;
use crate::rules::{CreateContext, Handler, Phase};
use crate::LintelError;

/// A rule that opted out of a file through [`crate::RuleSkip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    pub rule_id: String,
    pub reason: String,
}

/// Everything one traversal produced
#[derive(Debug, Default)]
pub struct DispatchResult {
    /// Reported diagnostics in report order
    pub diagnostics: Vec<Diagnostic>,
    pub skipped: Vec<SkippedRule>,
    /// First handler failure. The failing rule stops for the rest of the
    /// file; other rules finish the traversal.
    pub error: Option<LintelError>,
}

impl DispatchResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

struct Slot {
    rule_index: usize,
    handler: Handler,
}

/// Runs configured rules over one [`SourceCode`]
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    rules: &'a [ConfiguredRule],
    settings: &'a Value,
}

impl<'a> Dispatcher<'a> {
    pub fn new(rules: &'a [ConfiguredRule], settings: &'a Value) -> Self {
        Self { rules, settings }
    }

    pub fn run(&self, source: &SourceCode) -> DispatchResult {
        let mut result = DispatchResult::default();
        let mut slots: Vec<Slot> = Vec::new();
        let mut table: HashMap<(SyntaxKind, Phase), Vec<usize>> = HashMap::new();

        for (rule_index, configured) in self.rules.iter().enumerate() {
            let ctx = CreateContext {
                rule_id: configured.id(),
                options: &configured.options,
                settings: self.settings,
                source,
            };
            match configured.rule.create(&ctx) {
                Ok(visitor) => {
                    for (kind, phase, handler) in visitor.into_handlers() {
                        table.entry((kind, phase)).or_default().push(slots.len());
                        slots.push(Slot {
                            rule_index,
                            handler,
                        });
                    }
                }
                Err(skip) => {
                    warn!(rule_id = configured.id(), "Skipping rule for this file: {}", skip);
                    result.skipped.push(SkippedRule {
                        rule_id: configured.id().to_string(),
                        reason: skip.reason,
                    });
                }
            }
        }

        if slots.is_empty() {
            return result;
        }
        debug!(
            handlers = slots.len(),
            kinds = table.len(),
            "Built handler table"
        );

        let mut collector = DefaultDiagnosticCollector::new();
        let mut crashed = vec![false; self.rules.len()];
        for event in source.root().preorder() {
            let (node, phase) = match event {
                WalkEvent::Enter(node) => (node, Phase::Enter),
                WalkEvent::Leave(node) => (node, Phase::Exit),
            };
            let Some(subscribers) = table.get(&(node.kind(), phase)) else {
                continue;
            };

            for &slot_index in subscribers {
                let slot = &mut slots[slot_index];
                if crashed[slot.rule_index] {
                    continue;
                }
                let configured = &self.rules[slot.rule_index];
                let mut ctx = RuleContext::new(
                    configured.rule.meta(),
                    configured.severity,
                    &configured.options,
                    self.settings,
                    source,
                    &mut collector,
                );
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| (slot.handler)(&node, &mut ctx)))
                        .unwrap_or_else(|payload| Err(panic_cause(payload)));
                if let Err(cause) = outcome {
                    let crash = LintelError::rule_crash(configured.id(), cause);
                    error!("{}", crash);
                    crashed[slot.rule_index] = true;
                    result.error.get_or_insert(crash);
                }
            }
        }

        result.diagnostics = collector.into_diagnostics();
        result
    }
}

/// Turn a panic payload into a crash cause
fn panic_cause(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    anyhow::anyhow!("panicked: {message}")
}
