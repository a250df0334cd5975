//! Type aliases and helpers for ECMAScript CST nodes
//!
//! The tree types are Rowan's red tree parameterized with [`EcmaLanguage`].
//! Ranges are exposed to the rest of the workspace as plain byte
//! `Range<usize>` values so that fixes and diagnostics do not depend on
//! Rowan's text-size types.

use std::ops::Range;

use super::EcmaLanguage;

/// A node in the concrete syntax tree
pub type SyntaxNode = rowan::SyntaxNode<EcmaLanguage>;

/// A token (including trivia) in the concrete syntax tree
pub type SyntaxToken = rowan::SyntaxToken<EcmaLanguage>;

/// Either a node or a token
pub type SyntaxElement = rowan::SyntaxElement<EcmaLanguage>;

pub use rowan::{TextRange, TextSize, WalkEvent};

/// Convert a Rowan text range into a byte range
pub fn to_byte_range(range: TextRange) -> Range<usize> {
    usize::from(range.start())..usize::from(range.end())
}

/// Byte range covered by a node, trivia inside the node included
pub fn node_range(node: &SyntaxNode) -> Range<usize> {
    to_byte_range(node.text_range())
}

/// Byte range covered by a token
pub fn token_range(token: &SyntaxToken) -> Range<usize> {
    to_byte_range(token.text_range())
}

/// Render a tree as an indented `Kind@start..end` listing.
///
/// Tokens are printed with their text; trivia is included so the dump
/// reflects exactly what the parser produced.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0usize;

    for event in node.preorder_with_tokens() {
        match event {
            WalkEvent::Enter(element) => {
                let range = to_byte_range(element.text_range());
                out.push_str(&"  ".repeat(depth));
                match &element {
                    rowan::NodeOrToken::Node(n) => {
                        out.push_str(&format!("{:?}@{}..{}\n", n.kind(), range.start, range.end));
                    }
                    rowan::NodeOrToken::Token(t) => {
                        out.push_str(&format!(
                            "{:?}@{}..{} {:?}\n",
                            t.kind(),
                            range.start,
                            range.end,
                            t.text()
                        ));
                    }
                }
                depth += 1;
            }
            WalkEvent::Leave(_) => depth -= 1,
        }
    }

    out
}
