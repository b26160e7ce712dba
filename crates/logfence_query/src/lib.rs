//! Lexer, parser, and printer for the LogQL subset logfence validates.
//!
//! This crate provides:
//! - `Lexer` - Tokenization of query source
//! - `Parser` - Parsing tokens into the `Expr` AST
//! - `pretty` - Canonical re-serialization of an `Expr` to query text
//!
//! The grammar covers stream selectors, line filters, log ranges,
//! range/vector aggregations, pipeline stages, and binary operators.
//! Parsing and printing round-trip: `parse_expr(to_query(e))` yields an
//! AST equivalent to `e` for enforcement purposes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod duration;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod span;
pub mod token;

pub use ast::{BinOp, Expr, FilterOp, Grouping, LabelFormatValue, RangeOp, Stage, VectorOp};
pub use duration::QueryDuration;
pub use lexer::Lexer;
pub use parser::{Parser, parse_expr};
pub use pretty::to_query;
pub use span::Span;
pub use token::{Token, TokenKind};
