//! Lexer for the query language.
//!
//! The lexer converts query text into a stream of tokens.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for query source text.
pub struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = match c {
            '{' => {
                self.advance();
                TokenKind::LBrace
            }
            '}' => {
                self.advance();
                TokenKind::RBrace
            }
            '(' => {
                self.advance();
                TokenKind::LParen
            }
            ')' => {
                self.advance();
                TokenKind::RParen
            }
            '[' => {
                self.advance();
                TokenKind::LBracket
            }
            ']' => {
                self.advance();
                TokenKind::RBracket
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            '+' => {
                self.advance();
                TokenKind::Add
            }
            '-' => {
                self.advance();
                TokenKind::Sub
            }
            '*' => {
                self.advance();
                TokenKind::Mul
            }
            '/' => {
                self.advance();
                TokenKind::Div
            }
            '%' => {
                self.advance();
                TokenKind::Mod
            }
            '^' => {
                self.advance();
                TokenKind::Pow
            }
            '=' => {
                self.advance();
                match self.peek_char() {
                    Some('~') => {
                        self.advance();
                        TokenKind::Re
                    }
                    Some('=') => {
                        self.advance();
                        TokenKind::CmpEq
                    }
                    _ => TokenKind::Eq,
                }
            }
            '!' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => {
                        self.advance();
                        TokenKind::Neq
                    }
                    Some('~') => {
                        self.advance();
                        TokenKind::Nre
                    }
                    c => TokenKind::Error(match c {
                        Some(c) => format!("unexpected character after '!': {c}"),
                        None => "unexpected end of input after '!'".into(),
                    }),
                }
            }
            '|' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => {
                        self.advance();
                        TokenKind::PipeExact
                    }
                    Some('~') => {
                        self.advance();
                        TokenKind::PipeMatch
                    }
                    _ => TokenKind::Pipe,
                }
            }
            '<' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::Lte
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_duration(),
            c if is_ident_start(c) => self.scan_ident(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // consume opening '"'
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => {
                            self.advance();
                            text.push('\n');
                        }
                        Some('r') => {
                            self.advance();
                            text.push('\r');
                        }
                        Some('t') => {
                            self.advance();
                            text.push('\t');
                        }
                        Some('\\') => {
                            self.advance();
                            text.push('\\');
                        }
                        Some('"') => {
                            self.advance();
                            text.push('"');
                        }
                        Some(c) => {
                            return TokenKind::Error(format!("invalid escape sequence: \\{c}"));
                        }
                        None => {
                            return TokenKind::Error("unterminated string".into());
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => {
                    return TokenKind::Error("unterminated string".into());
                }
            }
        }
        TokenKind::String(text)
    }

    /// Scans a number or duration literal like `5`, `90s`, or `1h30m`.
    fn scan_duration(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Duration(text)
    }

    /// Scans an identifier: label names, function names, keywords.
    fn scan_ident(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Ident(text)
    }
}

/// Returns true if the character can start an identifier.
const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true if the character can continue an identifier.
const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
