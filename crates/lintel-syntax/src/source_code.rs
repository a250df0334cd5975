//! Read-only token and comment queries over a parsed source
//!
//! Rules never walk raw trivia themselves; they ask [`SourceCode`] for the
//! significant token next to a node, the comments in a gap, or whether two
//! tokens are separated by whitespace.

use std::ops::Range;

use crate::line_index::{LineCol, LineIndex};
use crate::{SyntaxKind, SyntaxNode, SyntaxToken, node_range, token_range};

/// Source text together with its syntax tree and line index
#[derive(Debug, Clone)]
pub struct SourceCode {
    text: String,
    root: SyntaxNode,
    line_index: LineIndex,
}

impl SourceCode {
    pub fn new(text: impl Into<String>, root: SyntaxNode) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        Self {
            text,
            root,
            line_index,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// 1-based line/column of a byte offset
    pub fn line_col(&self, offset: usize) -> LineCol {
        self.line_index.line_col(&self.text, offset)
    }

    /// Text covered by a byte range, or `""` when the range is not valid
    pub fn text_of(&self, range: Range<usize>) -> &str {
        self.text.get(range).unwrap_or("")
    }

    pub fn node_text(&self, node: &SyntaxNode) -> &str {
        self.text_of(node_range(node))
    }

    /// First significant token of a node
    pub fn first_token(&self, node: &SyntaxNode) -> Option<SyntaxToken> {
        node.descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    /// Last significant token of a node
    pub fn last_token(&self, node: &SyntaxNode) -> Option<SyntaxToken> {
        let mut token = node.last_token()?;
        let range = node.text_range();
        while token.kind().is_trivia() {
            token = token.prev_token()?;
            if token.text_range().start() < range.start() {
                return None;
            }
        }
        Some(token)
    }

    /// Significant token immediately preceding a node
    pub fn token_before(&self, node: &SyntaxNode) -> Option<SyntaxToken> {
        let first = self.first_token(node)?;
        self.token_before_token(&first)
    }

    /// Significant token immediately following a node
    pub fn token_after(&self, node: &SyntaxNode) -> Option<SyntaxToken> {
        let last = self.last_token(node)?;
        self.token_after_token(&last)
    }

    pub fn token_before_token(&self, token: &SyntaxToken) -> Option<SyntaxToken> {
        let mut current = token.prev_token()?;
        while current.kind().is_trivia() {
            current = current.prev_token()?;
        }
        Some(current)
    }

    pub fn token_after_token(&self, token: &SyntaxToken) -> Option<SyntaxToken> {
        let mut current = token.next_token()?;
        while current.kind().is_trivia() {
            current = current.next_token()?;
        }
        Some(current)
    }

    /// Trivia tokens strictly between two tokens, in document order
    pub fn trivia_between(&self, first: &SyntaxToken, second: &SyntaxToken) -> Vec<SyntaxToken> {
        let end = second.text_range().start();
        let mut trivia = Vec::new();
        let mut current = first.next_token();
        while let Some(token) = current {
            if token.text_range().start() >= end || !token.kind().is_trivia() {
                break;
            }
            current = token.next_token();
            trivia.push(token);
        }
        trivia
    }

    /// Whether whitespace separates two tokens.
    ///
    /// Only whitespace tokens count; the text inside a comment does not, so
    /// `a/**/b` has no space between `a` and `b`.
    pub fn is_space_between(&self, first: &SyntaxToken, second: &SyntaxToken) -> bool {
        self.trivia_between(first, second)
            .iter()
            .any(|t| t.kind() == SyntaxKind::Whitespace)
    }

    /// Comments between a node and the significant token before it
    pub fn comments_before(&self, node: &SyntaxNode) -> Vec<SyntaxToken> {
        let Some(first) = self.first_token(node) else {
            return Vec::new();
        };
        let mut comments = Vec::new();
        let mut current = first.prev_token();
        while let Some(token) = current {
            if !token.kind().is_trivia() {
                break;
            }
            current = token.prev_token();
            if token.kind().is_comment() {
                comments.push(token);
            }
        }
        comments.reverse();
        comments
    }

    /// Comments between a node and the significant token after it
    pub fn comments_after(&self, node: &SyntaxNode) -> Vec<SyntaxToken> {
        let Some(last) = self.last_token(node) else {
            return Vec::new();
        };
        let mut comments = Vec::new();
        let mut current = last.next_token();
        while let Some(token) = current {
            if !token.kind().is_trivia() {
                break;
            }
            current = token.next_token();
            if token.kind().is_comment() {
                comments.push(token);
            }
        }
        comments
    }

    /// Every comment in the file, in document order
    pub fn all_comments(&self) -> Vec<SyntaxToken> {
        self.root
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind().is_comment())
            .collect()
    }

    /// Every significant token in the file, in document order
    pub fn tokens(&self) -> Vec<SyntaxToken> {
        self.root
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
            .collect()
    }

    pub fn token_text(&self, token: &SyntaxToken) -> &str {
        self.text_of(token_range(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn source(text: &str) -> SourceCode {
        SourceCode::new(text, parse(text).syntax())
    }

    fn find(code: &SourceCode, kind: SyntaxKind) -> SyntaxNode {
        code.root()
            .descendants()
            .find(|n| n.kind() == kind)
            .unwrap()
    }

    #[test]
    fn test_first_and_last_token() {
        let code = source("var  a = b + c ;");
        let declarator = find(&code, SyntaxKind::VariableDeclarator);
        assert_eq!(code.first_token(&declarator).unwrap().text(), "a");
        assert_eq!(code.last_token(&declarator).unwrap().text(), "c");
    }

    #[test]
    fn test_tokens_around_node() {
        let code = source("typeof.2");
        let literal = find(&code, SyntaxKind::Literal);
        let before = code.token_before(&literal).unwrap();
        assert_eq!(before.kind(), SyntaxKind::TypeofKw);
        assert!(code.token_after(&literal).is_none());
    }

    #[test]
    fn test_comments_before_node() {
        let code = source("tag /* a */ // b\n `x`");
        let quasi = find(&code, SyntaxKind::TemplateLiteral);
        let comments: Vec<_> = code
            .comments_before(&quasi)
            .iter()
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(comments, vec!["/* a */", "// b"]);
        assert_eq!(code.all_comments().len(), 2);
    }

    #[test]
    fn test_is_space_between_ignores_comment_text() {
        let code = source("a/* x */`t`; b `u`;");
        let tokens = code.tokens();
        assert!(!code.is_space_between(&tokens[0], &tokens[1]));
        assert!(code.is_space_between(&tokens[3], &tokens[4]));
    }

    #[test]
    fn test_line_col_lookup() {
        let code = source("a;\n  b;");
        assert_eq!(code.line_col(5), LineCol { line: 2, column: 3 });
        assert_eq!(code.text_of(5..6), "b");
        assert_eq!(code.text_of(5..99), "");
    }
}
