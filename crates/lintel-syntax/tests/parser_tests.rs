//! Parser integration tests
//!
//! Trees are compared through `debug_tree` snapshots; every test also checks
//! that the tree text reproduces the input exactly.

use insta::assert_snapshot;
use lintel_syntax::{SourceCode, SyntaxKind, SyntaxNode, debug_tree, parse};

fn parse_clean(source: &str) -> SyntaxNode {
    let parse = parse(source);
    assert!(parse.errors().is_empty(), "unexpected errors: {:?}", parse.errors());
    let root = parse.syntax();
    assert_eq!(root.text().to_string(), source);
    root
}

fn kinds_of(root: &SyntaxNode, kind: SyntaxKind) -> Vec<String> {
    root.descendants()
        .filter(|n| n.kind() == kind)
        .map(|n| n.text().to_string())
        .collect()
}

#[test]
fn test_tagged_template_tree() {
    let root = parse_clean("tag`x`;");
    assert_snapshot!(debug_tree(&root).trim_end(), @r#"
    Program@0..7
      ExpressionStatement@0..7
        TaggedTemplateExpression@0..6
          Identifier@0..3
            Ident@0..3 "tag"
          TemplateLiteral@3..6
            Template@3..6 "`x`"
        Semicolon@6..7 ";"
    "#);
}

#[test]
fn test_member_tag_and_call_tag() {
    let root = parse_clean("a.b `x`; f() `y`; new Foo `z`;");
    assert_eq!(
        kinds_of(&root, SyntaxKind::TaggedTemplateExpression),
        vec!["a.b `x`", "f() `y`", "Foo `z`"]
    );
}

#[test]
fn test_floating_decimals_in_expressions() {
    let root = parse_clean("var x = -.5, y = 2. + .7;\nfor (foo of.2);\nx = typeof.2");
    assert_eq!(
        kinds_of(&root, SyntaxKind::Literal),
        vec![".5", "2.", ".7", ".2", ".2"]
    );
    assert_eq!(kinds_of(&root, SyntaxKind::UnaryExpression), vec!["-.5", "typeof.2"]);
}

#[test]
fn test_statement_kinds() {
    let source = "if (a) return; else { ; }\nfor (var i = 0; i < 3; i++) f(i)\nfor (k in o) {}";
    let root = parse_clean(source);
    let statements: Vec<_> = root.children().map(|n| n.kind()).collect();
    assert_eq!(
        statements,
        vec![
            SyntaxKind::IfStatement,
            SyntaxKind::ForStatement,
            SyntaxKind::ForInStatement,
        ]
    );
}

#[test]
fn test_logical_and_conditional() {
    let root = parse_clean("r = a ?? b || c && d ? e : f;");
    assert_eq!(kinds_of(&root, SyntaxKind::ConditionalExpression).len(), 1);
    assert_eq!(
        kinds_of(&root, SyntaxKind::LogicalExpression),
        vec!["a ?? b || c && d", "b || c && d", "c && d"]
    );
}

#[test]
fn test_keyword_property_names() {
    let root = parse_clean("o.new = {if: 1, for: o.this};");
    assert_eq!(kinds_of(&root, SyntaxKind::Property), vec!["if: 1", "for: o.this"]);
}

#[test]
fn test_errors_keep_text_lossless() {
    let sources = ["var = ;", "f(a b)", "{ x", "'open", "a /* open"];
    for source in sources {
        let parse = parse(source);
        assert!(!parse.errors().is_empty(), "expected errors for {source:?}");
        assert_eq!(parse.syntax().text().to_string(), source);
    }
}

#[test]
fn test_source_code_over_parsed_tree() {
    let text = "/** @jsx h */\nvar h = 1; // trailing";
    let code = SourceCode::new(text, parse_clean(text));
    let comments: Vec<_> = code.all_comments().iter().map(|t| t.text().to_string()).collect();
    assert_eq!(comments, vec!["/** @jsx h */", "// trailing"]);

    let declaration = code
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::VariableDeclaration)
        .unwrap();
    assert_eq!(code.comments_before(&declaration).len(), 1);
    assert_eq!(code.comments_after(&declaration).len(), 1);
    assert_eq!(code.node_text(&declaration), "var h = 1;");
}
