//! Token types for the query language.
//!
//! Tokens are the output of the lexer and input to the parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types for the query language.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Delimiters
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,

    // Matchers and filters
    /// `=`
    Eq,
    /// `!=` (matcher operator, line filter, or binary comparison)
    Neq,
    /// `=~`
    Re,
    /// `!~` (matcher operator or line filter)
    Nre,
    /// `|=`
    PipeExact,
    /// `|~`
    PipeMatch,
    /// `|`
    Pipe,

    // Arithmetic and comparison
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `^`
    Pow,
    /// `==`
    CmpEq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,

    // Literals
    /// Identifier or keyword: label names, function names, `by`, `offset`, ...
    Ident(String),
    /// String literal with escapes resolved.
    String(String),
    /// Number or duration literal like `5`, `90s`, `1h30m`.
    Duration(String),

    /// End of input.
    Eof,
    /// Lexical error with a message.
    Error(String),
}

impl TokenKind {
    /// Returns a human-readable name for error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Comma => "','",
            Self::Eq => "'='",
            Self::Neq => "'!='",
            Self::Re => "'=~'",
            Self::Nre => "'!~'",
            Self::PipeExact => "'|='",
            Self::PipeMatch => "'|~'",
            Self::Pipe => "'|'",
            Self::Add => "'+'",
            Self::Sub => "'-'",
            Self::Mul => "'*'",
            Self::Div => "'/'",
            Self::Mod => "'%'",
            Self::Pow => "'^'",
            Self::CmpEq => "'=='",
            Self::Lt => "'<'",
            Self::Lte => "'<='",
            Self::Gt => "'>'",
            Self::Gte => "'>='",
            Self::Ident(_) => "identifier",
            Self::String(_) => "string",
            Self::Duration(_) => "duration",
            Self::Eof => "end of input",
            Self::Error(_) => "invalid token",
        }
    }
}
