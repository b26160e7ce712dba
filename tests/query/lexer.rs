//! Integration tests for the query lexer.

use logfence_query::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn lex_full_metric_query() {
    let tokens = kinds("sum by (app) (rate({app=\"foo\"}[5m]))");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Ident("sum".into()),
            TokenKind::Ident("by".into()),
            TokenKind::LParen,
            TokenKind::Ident("app".into()),
            TokenKind::RParen,
            TokenKind::LParen,
            TokenKind::Ident("rate".into()),
            TokenKind::LParen,
            TokenKind::LBrace,
            TokenKind::Ident("app".into()),
            TokenKind::Eq,
            TokenKind::String("foo".into()),
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::Duration("5m".into()),
            TokenKind::RBracket,
            TokenKind::RParen,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_distinguishes_pipe_forms() {
    assert_eq!(
        kinds("{a=\"1\"} |= \"x\" | json |~ \"y\""),
        vec![
            TokenKind::LBrace,
            TokenKind::Ident("a".into()),
            TokenKind::Eq,
            TokenKind::String("1".into()),
            TokenKind::RBrace,
            TokenKind::PipeExact,
            TokenKind::String("x".into()),
            TokenKind::Pipe,
            TokenKind::Ident("json".into()),
            TokenKind::PipeMatch,
            TokenKind::String("y".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_comparison_operators() {
    assert_eq!(
        kinds("== != < <= > >= ="),
        vec![
            TokenKind::CmpEq,
            TokenKind::Neq,
            TokenKind::Lt,
            TokenKind::Lte,
            TokenKind::Gt,
            TokenKind::Gte,
            TokenKind::Eq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_error_token_for_stray_character() {
    let tokens = kinds("{a=\"1\"} @");
    assert!(matches!(tokens[5], TokenKind::Error(_)));
}
