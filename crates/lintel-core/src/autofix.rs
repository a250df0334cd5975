//! Fixes and fix application
//!
//! A [`Fix`] is a single text edit. Rules build fixes through [`Fixer`]; the
//! [`FixApplier`] takes the fixes of one pass, drops the ones that overlap an
//! earlier accepted edit and splices the rest into new source text.

use std::ops::Range;

use lintel_syntax::{SyntaxElement, SyntaxNode, SyntaxToken, to_byte_range};
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, FixStatus};

/// A text edit: replace `range` of the current source with `text`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    /// Byte range to replace; empty for a pure insertion
    pub range: Range<usize>,
    /// The replacement text
    pub text: String,
}

impl Fix {
    pub fn new(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Insert `text` at `offset`
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset..offset, text)
    }

    /// Delete `range`
    pub fn remove(range: Range<usize>) -> Self {
        Self::new(range, "")
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }

    /// Whether the two edits share at least one byte.
    ///
    /// Touching edits (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Fix) -> bool {
        self.range.start < other.range.end && other.range.start < self.range.end
    }

    /// Check that the range is ordered, in bounds and on char boundaries
    pub fn validate(&self, source: &str) -> std::result::Result<(), String> {
        let Range { start, end } = self.range;
        if start > end {
            return Err(format!("fix range {start}..{end} is inverted"));
        }
        if end > source.len() {
            return Err(format!(
                "fix range {start}..{end} is out of bounds for source of length {}",
                source.len()
            ));
        }
        if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            return Err(format!(
                "fix range {start}..{end} does not fall on character boundaries"
            ));
        }
        Ok(())
    }

    /// Merge the fixes of a single report into one edit.
    ///
    /// The merged range spans all fixes; the text between them is copied
    /// from `source`. Fixes may touch but must not overlap.
    pub fn merge(mut fixes: Vec<Fix>, source: &str) -> std::result::Result<Option<Fix>, String> {
        if fixes.len() <= 1 {
            return Ok(fixes.pop());
        }
        for fix in &fixes {
            fix.validate(source)?;
        }
        fixes.sort_by_key(|f| (f.range.start, f.range.end));

        let start = fixes[0].range.start;
        let mut cursor = start;
        let mut text = String::new();
        for fix in &fixes {
            if fix.range.start < cursor {
                return Err("fixes of one report must not overlap".to_string());
            }
            text.push_str(&source[cursor..fix.range.start]);
            text.push_str(&fix.text);
            cursor = fix.range.end;
        }
        Ok(Some(Fix::new(start..cursor, text)))
    }
}

/// Anything with a byte range a fix can target
pub trait FixTarget {
    fn fix_range(&self) -> Range<usize>;
}

impl FixTarget for SyntaxNode {
    fn fix_range(&self) -> Range<usize> {
        to_byte_range(self.text_range())
    }
}

impl FixTarget for SyntaxToken {
    fn fix_range(&self) -> Range<usize> {
        to_byte_range(self.text_range())
    }
}

impl FixTarget for SyntaxElement {
    fn fix_range(&self) -> Range<usize> {
        to_byte_range(self.text_range())
    }
}

impl FixTarget for Range<usize> {
    fn fix_range(&self) -> Range<usize> {
        self.clone()
    }
}

/// Builder for fixes handed to rule handlers
#[derive(Debug, Clone, Copy, Default)]
pub struct Fixer;

impl Fixer {
    pub fn replace_text(&self, target: &impl FixTarget, text: impl Into<String>) -> Fix {
        Fix::new(target.fix_range(), text)
    }

    pub fn replace_text_range(&self, range: Range<usize>, text: impl Into<String>) -> Fix {
        Fix::new(range, text)
    }

    pub fn insert_text_before(&self, target: &impl FixTarget, text: impl Into<String>) -> Fix {
        Fix::insert(target.fix_range().start, text)
    }

    pub fn insert_text_after(&self, target: &impl FixTarget, text: impl Into<String>) -> Fix {
        Fix::insert(target.fix_range().end, text)
    }

    pub fn insert_text_before_range(&self, range: Range<usize>, text: impl Into<String>) -> Fix {
        Fix::insert(range.start, text)
    }

    pub fn insert_text_after_range(&self, range: Range<usize>, text: impl Into<String>) -> Fix {
        Fix::insert(range.end, text)
    }

    pub fn remove(&self, target: &impl FixTarget) -> Fix {
        Fix::remove(target.fix_range())
    }

    pub fn remove_range(&self, range: Range<usize>) -> Fix {
        Fix::remove(range)
    }
}

/// Outcome of applying one pass worth of fixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFixes {
    /// Source text after splicing the accepted fixes
    pub output: String,
    /// Accepted ranges, ascending and pairwise non-overlapping
    pub accepted: Vec<Range<usize>>,
    /// Number of fixes dropped because they overlapped an accepted one
    pub skipped: usize,
}

impl AppliedFixes {
    pub fn applied(&self) -> usize {
        self.accepted.len()
    }
}

/// Resolves overlapping fixes and applies the survivors in one rewrite
#[derive(Debug, Clone, Copy, Default)]
pub struct FixApplier;

impl FixApplier {
    pub fn new() -> Self {
        Self
    }

    /// Apply the fixes carried by `diagnostics` to `source`.
    ///
    /// Fixes are ordered by `(start, end)`, ties keeping diagnostic order.
    /// A fix is accepted when it starts at or after the end of the last
    /// accepted fix. Every diagnostic with a valid fix is marked
    /// [`FixStatus::Applied`] or [`FixStatus::SkippedConflict`]; a fix whose
    /// range does not fit `source` is left out and keeps its status.
    pub fn apply(&self, source: &str, diagnostics: &mut [Diagnostic]) -> AppliedFixes {
        let mut candidates: Vec<(usize, Range<usize>)> = diagnostics
            .iter()
            .enumerate()
            .filter_map(|(index, d)| {
                let fix = d.fix.as_ref()?;
                if let Err(reason) = fix.validate(source) {
                    tracing::warn!(rule_id = %d.rule_id, "Ignoring invalid fix: {}", reason);
                    return None;
                }
                Some((index, fix.range.clone()))
            })
            .collect();
        candidates.sort_by_key(|(_, range)| (range.start, range.end));

        let mut accepted_indices = Vec::with_capacity(candidates.len());
        let mut last_end: Option<usize> = None;
        let mut skipped = 0;

        for (index, range) in candidates {
            if last_end.is_none_or(|end| range.start >= end) {
                last_end = Some(range.end);
                diagnostics[index].fix_status = FixStatus::Applied;
                accepted_indices.push(index);
            } else {
                tracing::debug!(
                    rule_id = %diagnostics[index].rule_id,
                    start = range.start,
                    end = range.end,
                    "Skipping conflicting fix"
                );
                diagnostics[index].fix_status = FixStatus::SkippedConflict;
                skipped += 1;
            }
        }

        let mut output = String::with_capacity(source.len());
        let mut accepted = Vec::with_capacity(accepted_indices.len());
        let mut cursor = 0;
        for index in accepted_indices {
            let Some(fix) = diagnostics[index].fix.as_ref() else {
                continue;
            };
            output.push_str(&source[cursor..fix.range.start]);
            output.push_str(&fix.text);
            cursor = fix.range.end;
            accepted.push(fix.range.clone());
        }
        output.push_str(&source[cursor..]);

        AppliedFixes {
            output,
            accepted,
            skipped,
        }
    }
}

/// Generate a plain unified diff between two texts
pub fn generate_unified_diff(original: &str, modified: &str, label: &str) -> String {
    use similar::{ChangeTag, TextDiff};

    let mut output = String::new();
    if original == modified {
        return output;
    }

    let diff = TextDiff::from_lines(original, modified);

    output.push_str(&format!("--- {label}\n"));
    output.push_str(&format!("+++ {label} (fixed)\n"));

    for group in diff.grouped_ops(3) {
        let old_line = group[0].old_range().start;
        let new_line = group[0].new_range().start;
        let old_len = group.iter().map(|op| op.old_range().len()).sum::<usize>();
        let new_len = group.iter().map(|op| op.new_range().len()).sum::<usize>();

        output.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old_line + 1,
            old_len,
            new_line + 1,
            new_len
        ));

        for op in &group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                let line_text = change.value();
                output.push(sign);
                output.push_str(line_text);
                if !line_text.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
    }

    output
}
