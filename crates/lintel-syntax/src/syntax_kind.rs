//! Syntax kind enumeration for the ECMAScript CST
//!
//! Every node and token in the tree carries one of these tags. Rules subscribe
//! to node kinds, so this enum is the closed set of things a handler can be
//! attached to.

use std::fmt;

/// Syntax kind for ECMAScript language elements
///
/// The numeric ranges mirror the classification helpers below:
/// - 0-9: trivia (whitespace, comments)
/// - 10-99: keywords
/// - 100-149: punctuation and operators
/// - 150-199: literal and identifier tokens
/// - 200-399: structural nodes
/// - 400+: error recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces, tabs and line terminators
    Whitespace = 0,
    /// Line comment starting with //
    LineComment = 1,
    /// Block comment /* ... */
    BlockComment = 2,

    // ==================
    // Keywords (10-99)
    // ==================
    VarKw = 10,
    LetKw = 11,
    ConstKw = 12,
    ForKw = 13,
    InKw = 14,
    /// Contextual `of`, only produced by the parser inside `for` heads
    OfKw = 15,
    IfKw = 16,
    ElseKw = 17,
    ReturnKw = 18,
    TypeofKw = 19,
    VoidKw = 20,
    DeleteKw = 21,
    NewKw = 22,
    TrueKw = 23,
    FalseKw = 24,
    NullKw = 25,
    ThisKw = 26,

    // ==================
    // Punctuation (100-149)
    // ==================
    LParen = 100,
    RParen = 101,
    LBracket = 102,
    RBracket = 103,
    LBrace = 104,
    RBrace = 105,
    Semicolon = 106,
    Comma = 107,
    Dot = 108,
    Question = 109,
    Colon = 110,
    Eq = 111,
    EqEq = 112,
    EqEqEq = 113,
    BangEq = 114,
    BangEqEq = 115,
    Lt = 116,
    Gt = 117,
    LtEq = 118,
    GtEq = 119,
    Plus = 120,
    Minus = 121,
    Star = 122,
    Slash = 123,
    Percent = 124,
    Bang = 125,
    Tilde = 126,
    AmpAmp = 127,
    PipePipe = 128,
    QuestionQuestion = 129,
    PlusEq = 130,
    MinusEq = 131,
    StarEq = 132,
    SlashEq = 133,
    PlusPlus = 134,
    MinusMinus = 135,

    // ==================
    // Literals & identifiers (150-199)
    // ==================
    Ident = 150,
    /// Numeric literal, including `.5` and `2.` forms
    Number = 151,
    /// Single or double quoted string
    String = 152,
    /// Whole template literal including `${}` substitutions
    Template = 153,

    // ==================
    // Structure nodes (200-399)
    // ==================
    Program = 200,

    // Statements
    VariableDeclaration = 210,
    VariableDeclarator = 211,
    ExpressionStatement = 212,
    EmptyStatement = 213,
    BlockStatement = 214,
    IfStatement = 215,
    ReturnStatement = 216,
    ForStatement = 217,
    ForInStatement = 218,
    ForOfStatement = 219,

    // Expressions
    Identifier = 250,
    Literal = 251,
    TemplateLiteral = 252,
    TaggedTemplateExpression = 253,
    MemberExpression = 254,
    CallExpression = 255,
    NewExpression = 256,
    Arguments = 257,
    UnaryExpression = 258,
    UpdateExpression = 259,
    BinaryExpression = 260,
    LogicalExpression = 261,
    AssignmentExpression = 262,
    ConditionalExpression = 263,
    SequenceExpression = 264,
    ArrayExpression = 265,
    ObjectExpression = 266,
    Property = 267,
    ParenthesizedExpression = 268,
    ThisExpression = 269,

    // ==================
    // Error recovery (400+)
    // ==================
    /// Unrecognized token or node wrapping tokens skipped during recovery
    Error = 400,
    /// End of input marker, never stored in a tree
    Eof = 401,
}

impl SyntaxKind {
    /// Check if this is a trivia kind (whitespace, comments)
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }

    /// Check if this is a comment token
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Check if this is a keyword
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= 10 && (self as u16) < 100
    }

    /// Check if this is punctuation
    pub const fn is_punct(self) -> bool {
        (self as u16) >= 100 && (self as u16) < 150
    }

    /// Check if this is a literal token
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::String
                | Self::Template
                | Self::TrueKw
                | Self::FalseKw
                | Self::NullKw
        )
    }

    /// Check if this is a structural node
    pub const fn is_node(self) -> bool {
        (self as u16) >= 200 && (self as u16) < 400
    }

    /// Map reserved words to their keyword kind.
    ///
    /// `of` is contextual and is deliberately absent.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "var" => Self::VarKw,
            "let" => Self::LetKw,
            "const" => Self::ConstKw,
            "for" => Self::ForKw,
            "in" => Self::InKw,
            "if" => Self::IfKw,
            "else" => Self::ElseKw,
            "return" => Self::ReturnKw,
            "typeof" => Self::TypeofKw,
            "void" => Self::VoidKw,
            "delete" => Self::DeleteKw,
            "new" => Self::NewKw,
            "true" => Self::TrueKw,
            "false" => Self::FalseKw,
            "null" => Self::NullKw,
            "this" => Self::ThisKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Recover a kind from its raw `u16` tag
    pub const fn from_raw(raw: u16) -> Option<Self> {
        let kind = match raw {
            0 => Self::Whitespace,
            1 => Self::LineComment,
            2 => Self::BlockComment,

            10 => Self::VarKw,
            11 => Self::LetKw,
            12 => Self::ConstKw,
            13 => Self::ForKw,
            14 => Self::InKw,
            15 => Self::OfKw,
            16 => Self::IfKw,
            17 => Self::ElseKw,
            18 => Self::ReturnKw,
            19 => Self::TypeofKw,
            20 => Self::VoidKw,
            21 => Self::DeleteKw,
            22 => Self::NewKw,
            23 => Self::TrueKw,
            24 => Self::FalseKw,
            25 => Self::NullKw,
            26 => Self::ThisKw,

            100 => Self::LParen,
            101 => Self::RParen,
            102 => Self::LBracket,
            103 => Self::RBracket,
            104 => Self::LBrace,
            105 => Self::RBrace,
            106 => Self::Semicolon,
            107 => Self::Comma,
            108 => Self::Dot,
            109 => Self::Question,
            110 => Self::Colon,
            111 => Self::Eq,
            112 => Self::EqEq,
            113 => Self::EqEqEq,
            114 => Self::BangEq,
            115 => Self::BangEqEq,
            116 => Self::Lt,
            117 => Self::Gt,
            118 => Self::LtEq,
            119 => Self::GtEq,
            120 => Self::Plus,
            121 => Self::Minus,
            122 => Self::Star,
            123 => Self::Slash,
            124 => Self::Percent,
            125 => Self::Bang,
            126 => Self::Tilde,
            127 => Self::AmpAmp,
            128 => Self::PipePipe,
            129 => Self::QuestionQuestion,
            130 => Self::PlusEq,
            131 => Self::MinusEq,
            132 => Self::StarEq,
            133 => Self::SlashEq,
            134 => Self::PlusPlus,
            135 => Self::MinusMinus,

            150 => Self::Ident,
            151 => Self::Number,
            152 => Self::String,
            153 => Self::Template,

            200 => Self::Program,
            210 => Self::VariableDeclaration,
            211 => Self::VariableDeclarator,
            212 => Self::ExpressionStatement,
            213 => Self::EmptyStatement,
            214 => Self::BlockStatement,
            215 => Self::IfStatement,
            216 => Self::ReturnStatement,
            217 => Self::ForStatement,
            218 => Self::ForInStatement,
            219 => Self::ForOfStatement,
            250 => Self::Identifier,
            251 => Self::Literal,
            252 => Self::TemplateLiteral,
            253 => Self::TaggedTemplateExpression,
            254 => Self::MemberExpression,
            255 => Self::CallExpression,
            256 => Self::NewExpression,
            257 => Self::Arguments,
            258 => Self::UnaryExpression,
            259 => Self::UpdateExpression,
            260 => Self::BinaryExpression,
            261 => Self::LogicalExpression,
            262 => Self::AssignmentExpression,
            263 => Self::ConditionalExpression,
            264 => Self::SequenceExpression,
            265 => Self::ArrayExpression,
            266 => Self::ObjectExpression,
            267 => Self::Property,
            268 => Self::ParenthesizedExpression,
            269 => Self::ThisExpression,

            400 => Self::Error,
            401 => Self::Eof,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}
