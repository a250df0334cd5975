//! JSX pragma resolution
//!
//! The pragma is the identifier JSX compiles against (`React` in
//! `React.createElement`). A `/** @jsx h */` comment anywhere in the file
//! takes precedence over the `settings.react.pragma` value, which in turn
//! overrides the `React` default.

use lintel_syntax::{SourceCode, SyntaxKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const DEFAULT_PRAGMA: &str = "React";

static JSX_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@jsx\s+([^\s]+)").expect("valid jsx annotation regex"));

// Reserved words and unicode identifiers are not checked
static JS_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[_$a-zA-Z][_$a-zA-Z0-9]*$").expect("valid identifier regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PragmaError {
    #[error("React pragma {0} is not a valid identifier")]
    InvalidIdentifier(String),
}

/// Resolve the JSX pragma for a file.
///
/// Only the part before the first `.` of an annotation is kept, so
/// `@jsx Preact.h` resolves to `Preact`.
pub fn pragma_from_source(source: &SourceCode, settings: &Value) -> Result<String, PragmaError> {
    let annotated = source.all_comments().into_iter().find_map(|comment| {
        let value = comment_value(comment.kind(), comment.text());
        JSX_ANNOTATION
            .captures(value)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().split('.').next().unwrap_or_default().to_string())
    });

    let pragma = match annotated {
        Some(pragma) => pragma,
        None => settings
            .get("react")
            .and_then(|react| react.get("pragma"))
            .and_then(Value::as_str)
            .filter(|pragma| !pragma.is_empty())
            .unwrap_or(DEFAULT_PRAGMA)
            .to_string(),
    };

    if !JS_IDENTIFIER.is_match(&pragma) {
        return Err(PragmaError::InvalidIdentifier(pragma));
    }
    Ok(pragma)
}

/// Comment text without its `//` or `/* */` delimiters
fn comment_value(kind: SyntaxKind, text: &str) -> &str {
    match kind {
        SyntaxKind::LineComment => text.strip_prefix("//").unwrap_or(text),
        SyntaxKind::BlockComment => text
            .strip_prefix("/*")
            .and_then(|rest| rest.strip_suffix("*/"))
            .unwrap_or(text),
        _ => text,
    }
}
