//! Rowan language implementation for ECMAScript
//!
//! Connects [`SyntaxKind`] to Rowan's generic tree types.

use rowan::Language;

use crate::SyntaxKind;

/// Language marker for ECMAScript syntax trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EcmaLanguage;

impl Language for EcmaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Only the builder in this crate produces raw kinds, so anything
        // unknown is a bug surfaced as an error node.
        SyntaxKind::from_raw(raw.0).unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        let kinds = [
            SyntaxKind::Whitespace,
            SyntaxKind::TypeofKw,
            SyntaxKind::Ident,
            SyntaxKind::Dot,
            SyntaxKind::Program,
            SyntaxKind::TemplateLiteral,
        ];

        for &kind in &kinds {
            let raw = EcmaLanguage::kind_to_raw(kind);
            let back = EcmaLanguage::kind_from_raw(raw);
            assert_eq!(kind, back, "Roundtrip failed for {kind:?}");
        }
    }

    #[test]
    fn test_unknown_raw_maps_to_error() {
        assert_eq!(
            EcmaLanguage::kind_from_raw(rowan::SyntaxKind(9999)),
            SyntaxKind::Error
        );
    }
}
