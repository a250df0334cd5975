//! Error-tolerant recursive descent parser building the Rowan CST
//!
//! The parser never fails: unexpected input is wrapped in [`SyntaxKind::Error`]
//! nodes and recorded as a [`ParseError`]. Trivia is attached to whichever node
//! is open when the next significant token is consumed, and nodes always start
//! at their first significant token, so a node's range never begins with
//! whitespace or a comment.

use std::ops::Range;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};

use crate::lexer::{self, Token};
use crate::{SyntaxKind, SyntaxNode};

/// A syntax error found while lexing or parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {}..{}", .range.start, .range.end)]
pub struct ParseError {
    pub message: String,
    pub range: Range<usize>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Result of parsing: the green tree plus collected errors
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build a red tree rooted at the `Program` node
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_parts(self) -> (GreenNode, Vec<ParseError>) {
        (self.green, self.errors)
    }
}

/// Parse source text into a lossless CST
///
/// # Example
///
/// ```
/// use lintel_syntax::{parse, SyntaxKind};
///
/// let parse = parse("var x = .5;");
/// assert!(parse.errors().is_empty());
/// assert_eq!(parse.syntax().kind(), SyntaxKind::Program);
/// assert_eq!(parse.syntax().text().to_string(), "var x = .5;");
/// ```
pub fn parse(source: &str) -> Parse {
    let (tokens, lex_errors) = lexer::lex(source);
    let mut parser = Parser::new(source, &tokens);
    parser.errors.extend(
        lex_errors
            .into_iter()
            .map(|e| ParseError::new(e.message, e.span)),
    );
    parser.parse_program();
    parser.finish()
}

/// Binding power and node kind of binary operators
fn binary_op(kind: SyntaxKind) -> Option<(u8, SyntaxKind)> {
    let op = match kind {
        SyntaxKind::QuestionQuestion => (1, SyntaxKind::LogicalExpression),
        SyntaxKind::PipePipe => (2, SyntaxKind::LogicalExpression),
        SyntaxKind::AmpAmp => (3, SyntaxKind::LogicalExpression),
        SyntaxKind::EqEq | SyntaxKind::BangEq | SyntaxKind::EqEqEq | SyntaxKind::BangEqEq => {
            (6, SyntaxKind::BinaryExpression)
        }
        SyntaxKind::Lt | SyntaxKind::Gt | SyntaxKind::LtEq | SyntaxKind::GtEq => {
            (7, SyntaxKind::BinaryExpression)
        }
        SyntaxKind::Plus | SyntaxKind::Minus => (9, SyntaxKind::BinaryExpression),
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => {
            (10, SyntaxKind::BinaryExpression)
        }
        _ => return None,
    };
    Some(op)
}

fn is_assignment_op(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Eq
            | SyntaxKind::PlusEq
            | SyntaxKind::MinusEq
            | SyntaxKind::StarEq
            | SyntaxKind::SlashEq
    )
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        let mut errors = self.errors;
        errors.sort_by_key(|e| (e.range.start, e.range.end));
        Parse {
            green: self.builder.finish(),
            errors,
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    /// Index of the next significant token at or after `pos`
    fn significant_index(&self) -> Option<usize> {
        (self.pos..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    fn current(&self) -> SyntaxKind {
        self.significant_index()
            .map(|i| self.tokens[i].kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn current_text(&self) -> &'a str {
        self.significant_index()
            .map(|i| self.tokens[i].text(self.source))
            .unwrap_or("")
    }

    fn current_range(&self) -> Range<usize> {
        match self.significant_index() {
            Some(i) => self.tokens[i].span.clone(),
            None => self.source.len()..self.source.len(),
        }
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::Ident) && self.current_text() == word
    }

    /// Whether a line terminator sits between the previous significant
    /// token and the current one
    fn newline_before_current(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .take_while(|t| t.kind.is_trivia())
            .any(|t| t.text(self.source).contains(['\n', '\r']))
    }

    /// Flush pending trivia into the currently open node
    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder
                .token(token.kind.into(), token.text(self.source));
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        let kind = self.current();
        self.bump_as(kind);
    }

    fn bump_as(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(kind.into(), token.text(self.source));
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if !self.eat(kind) {
            self.error(format!("Expected {kind}, found {}", self.current()));
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        self.errors.push(ParseError::new(message, range));
    }

    /// Record an error and consume the current token inside an error node
    fn error_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        if self.at(SyntaxKind::Eof) {
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.builder.finish_node();
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Automatic semicolon insertion
    fn consume_semicolon(&mut self) {
        if self.eat(SyntaxKind::Semicolon) {
            return;
        }
        if self.at(SyntaxKind::RBrace) || self.at(SyntaxKind::Eof) || self.newline_before_current() {
            return;
        }
        self.error(format!("Expected ';', found {}", self.current()));
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_program(&mut self) {
        // Leading trivia belongs to the root, so open it before flushing
        self.builder.start_node(SyntaxKind::Program.into());
        while !self.at(SyntaxKind::Eof) {
            self.parse_statement_with_progress();
        }
        self.eat_trivia();
        self.finish_node();
    }

    fn parse_statement_with_progress(&mut self) {
        let before = self.pos;
        self.parse_statement();
        if self.pos == before {
            self.error_and_bump(format!("Unexpected {}", self.current()));
        }
    }

    fn parse_statement(&mut self) {
        match self.current() {
            SyntaxKind::VarKw | SyntaxKind::LetKw | SyntaxKind::ConstKw => {
                self.parse_variable_declaration(false);
            }
            SyntaxKind::Semicolon => {
                self.start_node(SyntaxKind::EmptyStatement);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::IfKw => self.parse_if(),
            SyntaxKind::ReturnKw => self.parse_return(),
            SyntaxKind::ForKw => self.parse_for(),
            SyntaxKind::Eof => {}
            kind if self.at_expression_start(kind) => {
                self.start_node(SyntaxKind::ExpressionStatement);
                self.parse_expression();
                self.consume_semicolon();
                self.finish_node();
            }
            kind => self.error_and_bump(format!("Unexpected {kind}")),
        }
    }

    fn at_expression_start(&self, kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::Ident
                | SyntaxKind::Number
                | SyntaxKind::String
                | SyntaxKind::Template
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
                | SyntaxKind::ThisKw
                | SyntaxKind::NewKw
                | SyntaxKind::TypeofKw
                | SyntaxKind::VoidKw
                | SyntaxKind::DeleteKw
                | SyntaxKind::LParen
                | SyntaxKind::LBracket
                | SyntaxKind::LBrace
                | SyntaxKind::Plus
                | SyntaxKind::Minus
                | SyntaxKind::Bang
                | SyntaxKind::Tilde
                | SyntaxKind::PlusPlus
                | SyntaxKind::MinusMinus
        )
    }

    /// `var a = 1, b;`; inside a `for` head the terminator is left alone
    fn parse_variable_declaration(&mut self, in_for_head: bool) {
        self.start_node(SyntaxKind::VariableDeclaration);
        self.bump();
        loop {
            self.start_node(SyntaxKind::VariableDeclarator);
            if self.at(SyntaxKind::Ident) {
                self.parse_identifier();
            } else {
                self.error(format!("Expected an identifier, found {}", self.current()));
            }
            if self.eat(SyntaxKind::Eq) {
                self.parse_assignment();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        if !in_for_head {
            self.consume_semicolon();
        }
        self.finish_node();
    }

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BlockStatement);
        self.bump();
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_statement_with_progress();
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IfStatement);
        self.bump();
        self.expect(SyntaxKind::LParen);
        self.parse_expression();
        self.expect(SyntaxKind::RParen);
        self.parse_statement_with_progress();
        if self.eat(SyntaxKind::ElseKw) {
            self.parse_statement_with_progress();
        }
        self.finish_node();
    }

    fn parse_return(&mut self) {
        self.start_node(SyntaxKind::ReturnStatement);
        self.bump();
        let current = self.current();
        if !self.newline_before_current() && self.at_expression_start(current) {
            self.parse_expression();
        }
        self.consume_semicolon();
        self.finish_node();
    }

    /// `for (init; test; update)`, `for (left in right)`, `for (left of right)`
    fn parse_for(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        self.expect(SyntaxKind::LParen);

        match self.current() {
            SyntaxKind::VarKw | SyntaxKind::LetKw | SyntaxKind::ConstKw => {
                self.parse_variable_declaration(true);
            }
            SyntaxKind::Semicolon => {}
            _ => self.parse_assignment(),
        }

        let kind = if self.at_contextual("of") {
            self.bump_as(SyntaxKind::OfKw);
            self.parse_assignment();
            SyntaxKind::ForOfStatement
        } else if self.eat(SyntaxKind::InKw) {
            self.parse_expression();
            SyntaxKind::ForInStatement
        } else {
            self.expect(SyntaxKind::Semicolon);
            if !self.at(SyntaxKind::Semicolon) {
                self.parse_expression();
            }
            self.expect(SyntaxKind::Semicolon);
            if !self.at(SyntaxKind::RParen) {
                self.parse_expression();
            }
            SyntaxKind::ForStatement
        };

        self.expect(SyntaxKind::RParen);
        self.start_node_at(checkpoint, kind);
        self.parse_statement_with_progress();
        self.finish_node();
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_assignment();
        if self.at(SyntaxKind::Comma) {
            self.start_node_at(checkpoint, SyntaxKind::SequenceExpression);
            while self.eat(SyntaxKind::Comma) {
                self.parse_assignment();
            }
            self.finish_node();
        }
    }

    fn parse_assignment(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_conditional();
        if is_assignment_op(self.current()) {
            self.start_node_at(checkpoint, SyntaxKind::AssignmentExpression);
            self.bump();
            self.parse_assignment();
            self.finish_node();
        }
    }

    fn parse_conditional(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_binary(0);
        if self.at(SyntaxKind::Question) {
            self.start_node_at(checkpoint, SyntaxKind::ConditionalExpression);
            self.bump();
            self.parse_assignment();
            self.expect(SyntaxKind::Colon);
            self.parse_assignment();
            self.finish_node();
        }
    }

    /// Precedence climbing; repeated wrapping at one checkpoint yields
    /// left-associative nesting
    fn parse_binary(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();
        while let Some((bp, kind)) = binary_op(self.current()) {
            if bp < min_bp {
                break;
            }
            self.start_node_at(checkpoint, kind);
            self.bump();
            self.parse_binary(bp + 1);
            self.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        match self.current() {
            SyntaxKind::Minus
            | SyntaxKind::Plus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::TypeofKw
            | SyntaxKind::VoidKw
            | SyntaxKind::DeleteKw => {
                self.start_node(SyntaxKind::UnaryExpression);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                self.start_node(SyntaxKind::UpdateExpression);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            _ => {
                let checkpoint = self.checkpoint();
                self.parse_call_member();
                if matches!(self.current(), SyntaxKind::PlusPlus | SyntaxKind::MinusMinus)
                    && !self.newline_before_current()
                {
                    self.start_node_at(checkpoint, SyntaxKind::UpdateExpression);
                    self.bump();
                    self.finish_node();
                }
            }
        }
    }

    fn parse_call_member(&mut self) {
        let checkpoint = self.checkpoint();
        if self.at(SyntaxKind::NewKw) {
            self.parse_new();
        } else {
            self.parse_primary();
        }
        self.parse_suffixes(checkpoint, true);
    }

    /// Member access, calls and tagged templates following a callee
    fn parse_suffixes(&mut self, checkpoint: Checkpoint, allow_calls: bool) {
        loop {
            match self.current() {
                SyntaxKind::Dot => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberExpression);
                    self.bump();
                    let current = self.current();
                    if current == SyntaxKind::Ident || current.is_keyword() {
                        self.start_node(SyntaxKind::Identifier);
                        self.bump_as(SyntaxKind::Ident);
                        self.finish_node();
                    } else {
                        self.error(format!("Expected a property name, found {current}"));
                    }
                    self.finish_node();
                }
                SyntaxKind::LBracket => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberExpression);
                    self.bump();
                    self.parse_expression();
                    self.expect(SyntaxKind::RBracket);
                    self.finish_node();
                }
                SyntaxKind::Template => {
                    self.start_node_at(checkpoint, SyntaxKind::TaggedTemplateExpression);
                    self.parse_template_literal();
                    self.finish_node();
                }
                SyntaxKind::LParen if allow_calls => {
                    self.start_node_at(checkpoint, SyntaxKind::CallExpression);
                    self.parse_arguments();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_new(&mut self) {
        self.start_node(SyntaxKind::NewExpression);
        self.bump();
        let checkpoint = self.checkpoint();
        if self.at(SyntaxKind::NewKw) {
            self.parse_new();
        } else {
            self.parse_primary();
        }
        self.parse_suffixes(checkpoint, false);
        if self.at(SyntaxKind::LParen) {
            self.parse_arguments();
        }
        self.finish_node();
    }

    fn parse_arguments(&mut self) {
        self.start_node(SyntaxKind::Arguments);
        self.bump();
        while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            let before = self.pos;
            self.parse_assignment();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
            if self.pos == before {
                break;
            }
        }
        self.expect(SyntaxKind::RParen);
        self.finish_node();
    }

    fn parse_identifier(&mut self) {
        self.start_node(SyntaxKind::Identifier);
        self.bump();
        self.finish_node();
    }

    fn parse_template_literal(&mut self) {
        self.start_node(SyntaxKind::TemplateLiteral);
        self.bump();
        self.finish_node();
    }

    fn parse_primary(&mut self) {
        match self.current() {
            SyntaxKind::Ident => self.parse_identifier(),
            SyntaxKind::Number
            | SyntaxKind::String
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NullKw => {
                self.start_node(SyntaxKind::Literal);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::ThisKw => {
                self.start_node(SyntaxKind::ThisExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Template => self.parse_template_literal(),
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ParenthesizedExpression);
                self.bump();
                self.parse_expression();
                self.expect(SyntaxKind::RParen);
                self.finish_node();
            }
            SyntaxKind::LBracket => self.parse_array(),
            SyntaxKind::LBrace => self.parse_object(),
            SyntaxKind::Semicolon
            | SyntaxKind::RParen
            | SyntaxKind::RBracket
            | SyntaxKind::RBrace
            | SyntaxKind::Comma
            | SyntaxKind::Eof => {
                self.error(format!("Expected an expression, found {}", self.current()));
            }
            kind => self.error_and_bump(format!("Expected an expression, found {kind}")),
        }
    }

    fn parse_array(&mut self) {
        self.start_node(SyntaxKind::ArrayExpression);
        self.bump();
        while !self.at(SyntaxKind::RBracket) && !self.at(SyntaxKind::Eof) {
            if self.eat(SyntaxKind::Comma) {
                continue;
            }
            let before = self.pos;
            self.parse_assignment();
            if !self.at(SyntaxKind::RBracket) {
                self.expect(SyntaxKind::Comma);
            }
            if self.pos == before {
                break;
            }
        }
        self.expect(SyntaxKind::RBracket);
        self.finish_node();
    }

    fn parse_object(&mut self) {
        self.start_node(SyntaxKind::ObjectExpression);
        self.bump();
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            let before = self.pos;
            self.parse_property();
            if !self.at(SyntaxKind::RBrace) {
                self.expect(SyntaxKind::Comma);
            }
            if self.pos == before {
                break;
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    /// `key: value` or shorthand `key`
    fn parse_property(&mut self) {
        self.start_node(SyntaxKind::Property);
        match self.current() {
            SyntaxKind::String | SyntaxKind::Number => {
                self.start_node(SyntaxKind::Literal);
                self.bump();
                self.finish_node();
            }
            kind if kind == SyntaxKind::Ident || kind.is_keyword() => {
                self.start_node(SyntaxKind::Identifier);
                self.bump_as(SyntaxKind::Ident);
                self.finish_node();
            }
            kind => self.error(format!("Expected a property key, found {kind}")),
        }
        if self.eat(SyntaxKind::Colon) {
            self.parse_assignment();
        }
        self.finish_node();
    }
}
