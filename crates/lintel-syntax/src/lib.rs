//! Lintel Syntax
//!
//! Lossless concrete syntax trees for a small ECMAScript subset.
//! This crate provides the lexer, the error-tolerant parser and the
//! read-only [`SourceCode`] query surface the lint engine hands to rules.

pub mod language;
pub mod lexer;
pub mod line_index;
pub mod nodes;
pub mod parser;
pub mod source_code;
pub mod syntax_kind;

pub use language::EcmaLanguage;
pub use lexer::{LexResult, LexerError, Token, is_id_continue, is_id_start, lex};
pub use line_index::{LineCol, LineIndex};
pub use nodes::{
    SyntaxElement, SyntaxNode, SyntaxToken, TextRange, TextSize, WalkEvent, debug_tree,
    node_range, to_byte_range, token_range,
};
pub use parser::{Parse, ParseError, parse};
pub use source_code::SourceCode;
pub use syntax_kind::SyntaxKind;
