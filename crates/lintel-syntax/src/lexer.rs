//! Lossless lexer for the supported ECMAScript subset
//!
//! Whitespace and comments are emitted as trivia tokens so the parser can
//! rebuild the exact input: `parse(source).syntax().text() == source`.
//!
//! Regular expression literals are not recognized; `/` always lexes as a
//! division operator.

use std::ops::Range;

use crate::SyntaxKind;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: Range<usize>,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }

    /// Slice this token's text out of the source it was lexed from
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// Result returned by the lexer
pub type LexResult = (Vec<Token>, Vec<LexerError>);

/// Punctuators ordered longest first so the first prefix match wins
const PUNCTUATORS: &[(&str, SyntaxKind)] = &[
    ("===", SyntaxKind::EqEqEq),
    ("!==", SyntaxKind::BangEqEq),
    ("==", SyntaxKind::EqEq),
    ("!=", SyntaxKind::BangEq),
    ("<=", SyntaxKind::LtEq),
    (">=", SyntaxKind::GtEq),
    ("&&", SyntaxKind::AmpAmp),
    ("||", SyntaxKind::PipePipe),
    ("??", SyntaxKind::QuestionQuestion),
    ("+=", SyntaxKind::PlusEq),
    ("-=", SyntaxKind::MinusEq),
    ("*=", SyntaxKind::StarEq),
    ("/=", SyntaxKind::SlashEq),
    ("++", SyntaxKind::PlusPlus),
    ("--", SyntaxKind::MinusMinus),
    ("(", SyntaxKind::LParen),
    (")", SyntaxKind::RParen),
    ("[", SyntaxKind::LBracket),
    ("]", SyntaxKind::RBracket),
    ("{", SyntaxKind::LBrace),
    ("}", SyntaxKind::RBrace),
    (";", SyntaxKind::Semicolon),
    (",", SyntaxKind::Comma),
    (".", SyntaxKind::Dot),
    ("?", SyntaxKind::Question),
    (":", SyntaxKind::Colon),
    ("=", SyntaxKind::Eq),
    ("<", SyntaxKind::Lt),
    (">", SyntaxKind::Gt),
    ("+", SyntaxKind::Plus),
    ("-", SyntaxKind::Minus),
    ("*", SyntaxKind::Star),
    ("/", SyntaxKind::Slash),
    ("%", SyntaxKind::Percent),
    ("!", SyntaxKind::Bang),
    ("~", SyntaxKind::Tilde),
];

/// Lex input preserving all trivia
pub fn lex(input: &str) -> LexResult {
    let mut lexer = Lexer {
        input,
        pos: 0,
        tokens: Vec::new(),
        errors: Vec::new(),
    };
    lexer.run();
    (lexer.tokens, lexer.errors)
}

/// Whether `c` may start an identifier
pub fn is_id_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

/// Whether `c` may continue an identifier
pub fn is_id_continue(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphanumeric()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    errors: Vec<LexerError>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) {
        while let Some(c) = self.peek() {
            let start = self.pos;

            let kind = if c.is_whitespace() || c == '\u{feff}' {
                self.eat_while(|c| c.is_whitespace() || c == '\u{feff}');
                SyntaxKind::Whitespace
            } else if self.rest().starts_with("//") {
                self.eat_while(|c| c != '\n' && c != '\r');
                SyntaxKind::LineComment
            } else if self.rest().starts_with("/*") {
                self.lex_block_comment(start)
            } else if c.is_ascii_digit() || (c == '.' && self.nth_char(1).is_some_and(|n| n.is_ascii_digit())) {
                self.lex_number()
            } else if c == '"' || c == '\'' {
                self.lex_string(c, start)
            } else if c == '`' {
                self.lex_template(start)
            } else if is_id_start(c) {
                self.eat_while(is_id_continue);
                SyntaxKind::from_keyword(&self.input[start..self.pos]).unwrap_or(SyntaxKind::Ident)
            } else if let Some((text, kind)) = PUNCTUATORS.iter().find(|(p, _)| self.rest().starts_with(p)) {
                self.pos += text.len();
                *kind
            } else {
                self.pos += c.len_utf8();
                self.errors.push(LexerError::new(
                    format!("Unexpected character '{c}'"),
                    start..self.pos,
                ));
                SyntaxKind::Error
            };

            self.tokens.push(Token::new(kind, start..self.pos));
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn nth_char(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn lex_block_comment(&mut self, start: usize) -> SyntaxKind {
        self.pos += 2;
        match self.rest().find("*/") {
            Some(end) => self.pos += end + 2,
            None => {
                self.pos = self.input.len();
                self.errors.push(LexerError::new(
                    "Unterminated block comment",
                    start..self.pos,
                ));
            }
        }
        SyntaxKind::BlockComment
    }

    fn lex_number(&mut self) -> SyntaxKind {
        let radix_prefix = self.rest().get(..2).map(str::to_ascii_lowercase);
        if matches!(radix_prefix.as_deref(), Some("0x" | "0o" | "0b")) {
            self.pos += 2;
            self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            return SyntaxKind::Number;
        }

        self.eat_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') {
            self.pos += 1;
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_digits = match self.nth_char(1) {
                Some('+' | '-') => self.nth_char(2),
                other => other,
            };
            if exponent_digits.is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
                if matches!(self.peek(), Some('+' | '-')) {
                    self.pos += 1;
                }
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
        }
        SyntaxKind::Number
    }

    fn lex_string(&mut self, quote: char, start: usize) -> SyntaxKind {
        self.pos += quote.len_utf8();
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    self.errors.push(LexerError::new(
                        "Unterminated string literal",
                        start..self.pos,
                    ));
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    self.bump_char();
                }
                Some(c) if c == quote => {
                    self.pos += c.len_utf8();
                    break;
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        SyntaxKind::String
    }

    /// Lex a template literal as a single token.
    ///
    /// Substitutions are skipped by brace depth; strings and nested
    /// templates inside a substitution are skipped whole so their braces
    /// do not count.
    fn lex_template(&mut self, start: usize) -> SyntaxKind {
        self.pos += 1;
        let mut depth = 0usize;
        loop {
            let Some(c) = self.peek() else {
                self.errors.push(LexerError::new(
                    "Unterminated template literal",
                    start..self.pos,
                ));
                break;
            };

            if depth == 0 {
                match c {
                    '\\' => {
                        self.pos += 1;
                        self.bump_char();
                    }
                    '`' => {
                        self.pos += 1;
                        break;
                    }
                    '$' if self.nth_char(1) == Some('{') => {
                        self.pos += 2;
                        depth = 1;
                    }
                    _ => self.pos += c.len_utf8(),
                }
                continue;
            }

            match c {
                '{' => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' => {
                    depth -= 1;
                    self.pos += 1;
                }
                '"' | '\'' => {
                    let inner = self.pos;
                    self.lex_string(c, inner);
                }
                '`' => {
                    let inner = self.pos;
                    self.lex_template(inner);
                }
                _ => self.pos += c.len_utf8(),
            }
        }
        SyntaxKind::Template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_leading_and_trailing_decimal_numbers() {
        let (tokens, errors) = lex("var x = .5 + 2.;");
        assert!(errors.is_empty());
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == SyntaxKind::Number)
            .map(|t| t.text("var x = .5 + 2.;"))
            .collect();
        assert_eq!(numbers, vec![".5", "2."]);
    }

    #[test]
    fn test_keyword_followed_by_decimal() {
        assert_eq!(
            kinds("typeof.2"),
            vec![SyntaxKind::TypeofKw, SyntaxKind::Number]
        );
    }

    #[test]
    fn test_member_access_is_not_a_number() {
        assert_eq!(
            kinds("a.b"),
            vec![SyntaxKind::Ident, SyntaxKind::Dot, SyntaxKind::Ident]
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(
            kinds("a /* b */ // c\n"),
            vec![
                SyntaxKind::Ident,
                SyntaxKind::Whitespace,
                SyntaxKind::BlockComment,
                SyntaxKind::Whitespace,
                SyntaxKind::LineComment,
                SyntaxKind::Whitespace,
            ]
        );
    }

    #[test]
    fn test_template_with_substitution_is_one_token() {
        let source = "tag`a ${ {b: `c`}.b } d`";
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, SyntaxKind::Template);
        assert_eq!(tokens[1].text(source), "`a ${ {b: `c`}.b } d`");
    }

    #[test]
    fn test_longest_punctuator_wins() {
        assert_eq!(
            kinds("a!==b"),
            vec![SyntaxKind::Ident, SyntaxKind::BangEqEq, SyntaxKind::Ident]
        );
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (tokens, errors) = lex("'abc");
        assert_eq!(tokens.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 0..4);
    }

    #[test]
    fn test_unknown_character() {
        let (tokens, errors) = lex("a # b");
        assert_eq!(tokens[2].kind, SyntaxKind::Error);
        assert_eq!(errors[0].message, "Unexpected character '#'");
    }
}
