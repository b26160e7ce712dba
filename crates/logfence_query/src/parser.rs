//! Parser for the query language.
//!
//! A recursive-descent parser with one token of lookahead. Binary operators
//! are parsed by precedence climbing; log expressions (selector plus line
//! filters and pipeline stages) are parsed greedily after an opening `{`.

use logfence_foundation::{Error, LabelMatcher, MatchOp, Result};

use crate::ast::{BinOp, Expr, FilterOp, Grouping, LabelFormatValue, RangeOp, Stage, VectorOp};
use crate::duration::QueryDuration;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser for query source text.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Source text (for error messages).
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
        }
    }

    /// Parses the source as a single complete expression.
    ///
    /// # Errors
    /// Returns an error if the source cannot be parsed.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_binary(0)?;
        if self.current.kind != TokenKind::Eof {
            return Err(self.error(&format!(
                "unexpected {} after expression",
                self.current.kind.name()
            )));
        }
        Ok(expr)
    }

    /// Parses binary operations at or above the given precedence.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr> {
        let mut left = self.parse_primary()?;

        while let Some(op) = self.peek_binop() {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let next_min = if op.is_right_associative() {
                op.precedence()
            } else {
                op.precedence() + 1
            };
            let right = self.parse_binary(next_min)?;
            let span = left.span().to(right.span());
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    /// Maps the current token to a binary operator, if it is one.
    fn peek_binop(&self) -> Option<BinOp> {
        match &self.current.kind {
            TokenKind::Ident(name) => match name.as_str() {
                "or" => Some(BinOp::Or),
                "and" => Some(BinOp::And),
                "unless" => Some(BinOp::Unless),
                _ => None,
            },
            TokenKind::CmpEq => Some(BinOp::Eq),
            TokenKind::Neq => Some(BinOp::Neq),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Lte => Some(BinOp::Lte),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Gte => Some(BinOp::Gte),
            TokenKind::Add => Some(BinOp::Add),
            TokenKind::Sub => Some(BinOp::Sub),
            TokenKind::Mul => Some(BinOp::Mul),
            TokenKind::Div => Some(BinOp::Div),
            TokenKind::Mod => Some(BinOp::Mod),
            TokenKind::Pow => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr> {
        match &self.current.kind {
            TokenKind::LBrace => {
                let (expr, unwrap) = self.parse_log_expr()?;
                if unwrap.is_some() {
                    return Err(self.error("'unwrap' is only valid inside a range aggregation"));
                }
                if self.current.kind == TokenKind::LBracket {
                    return Err(
                        self.error("log range is only valid inside a range aggregation")
                    );
                }
                Ok(expr)
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_binary(0)?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                if let Some(op) = RangeOp::from_name(&name) {
                    self.parse_range_aggregation(op)
                } else if let Some(op) = VectorOp::from_name(&name) {
                    self.parse_vector_aggregation(op)
                } else {
                    Err(self.error(&format!("unknown function: {name}")))
                }
            }
            TokenKind::Error(msg) => {
                let msg = msg.clone();
                Err(self.error(&msg))
            }
            kind => Err(self.error(&format!("unexpected {}", kind.name()))),
        }
    }

    /// Parses a log expression: a selector followed by any number of line
    /// filters and pipeline stages.
    ///
    /// Returns the expression and the label of a trailing `| unwrap <label>`,
    /// if present. Unwrap terminates the log expression; the caller decides
    /// whether it is legal in context.
    fn parse_log_expr(&mut self) -> Result<(Expr, Option<String>)> {
        let mut expr = self.parse_selector()?;
        let mut unwrap = None;

        loop {
            match &self.current.kind {
                TokenKind::PipeExact => {
                    expr = self.parse_filter(expr, FilterOp::Contains)?;
                }
                TokenKind::PipeMatch => {
                    expr = self.parse_filter(expr, FilterOp::Matches)?;
                }
                TokenKind::Neq => {
                    expr = self.parse_filter(expr, FilterOp::NotContains)?;
                }
                TokenKind::Nre => {
                    expr = self.parse_filter(expr, FilterOp::NotMatches)?;
                }
                TokenKind::Pipe => {
                    let mut stages = Vec::new();
                    while self.current.kind == TokenKind::Pipe {
                        self.advance();
                        if self.current_ident_is("unwrap") {
                            self.advance();
                            unwrap = Some(self.expect_ident()?);
                            break;
                        }
                        stages.push(self.parse_stage()?);
                    }
                    if !stages.is_empty() {
                        let span = expr.span().to(self.previous_span());
                        expr = Expr::Pipeline {
                            child: Box::new(expr),
                            stages,
                            span,
                        };
                    }
                    if unwrap.is_some() {
                        break;
                    }
                }
                _ => break,
            }
        }

        Ok((expr, unwrap))
    }

    /// Parses a line filter: `<op> "<pattern>"`.
    fn parse_filter(&mut self, child: Expr, op: FilterOp) -> Result<Expr> {
        self.advance();
        let pattern = self.expect_string()?;
        let span = child.span().to(self.previous_span());
        Ok(Expr::Filter {
            child: Box::new(child),
            op,
            pattern,
            span,
        })
    }

    /// Parses a stream selector: `{name op "value", ...}`.
    fn parse_selector(&mut self) -> Result<Expr> {
        let start = self.current.span;
        self.expect(&TokenKind::LBrace)?;

        let mut matchers = Vec::new();
        loop {
            if self.current.kind == TokenKind::RBrace {
                break;
            }
            let name = self.expect_ident()?;
            let op = self.parse_match_op()?;
            let value = self.expect_string()?;
            matchers.push(LabelMatcher::new(name, op, value));

            if self.current.kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }

        if matchers.is_empty() {
            return Err(self.error("selector must contain at least one matcher"));
        }

        let end = self.current.span;
        self.expect(&TokenKind::RBrace)?;
        Ok(Expr::Selector {
            matchers,
            span: start.to(end),
        })
    }

    /// Parses a matcher operator.
    fn parse_match_op(&mut self) -> Result<MatchOp> {
        let op = match self.current.kind {
            TokenKind::Eq => MatchOp::Equal,
            TokenKind::Neq => MatchOp::NotEqual,
            TokenKind::Re => MatchOp::RegexMatch,
            TokenKind::Nre => MatchOp::RegexNotMatch,
            ref kind => {
                return Err(self.error(&format!(
                    "expected matcher operator, got {}",
                    kind.name()
                )));
            }
        };
        self.advance();
        Ok(op)
    }

    /// Parses a range aggregation: `rate({...}[5m])`.
    fn parse_range_aggregation(&mut self, op: RangeOp) -> Result<Expr> {
        let start = self.current.span;
        self.advance(); // function name
        self.expect(&TokenKind::LParen)?;

        let range = self.parse_log_range()?;

        let end = self.current.span;
        self.expect(&TokenKind::RParen)?;
        Ok(Expr::RangeAggregation {
            op,
            child: Box::new(range),
            span: start.to(end),
        })
    }

    /// Parses a log range: `{...} |= "x" | unwrap lbl [5m] offset 1h`.
    fn parse_log_range(&mut self) -> Result<Expr> {
        let (child, unwrap) = self.parse_log_expr()?;

        self.expect(&TokenKind::LBracket)?;
        let range = self.expect_duration()?;
        let mut end = self.current.span;
        self.expect(&TokenKind::RBracket)?;

        let mut offset = None;
        if self.current_ident_is("offset") {
            self.advance();
            offset = Some(self.expect_duration()?);
            end = self.previous_span();
        }

        Ok(Expr::LogRange {
            span: child.span().to(end),
            child: Box::new(child),
            range,
            offset,
            unwrap,
        })
    }

    /// Parses a vector aggregation: `sum by (app) (<expr>)`, `topk(5, <expr>)`.
    fn parse_vector_aggregation(&mut self, op: VectorOp) -> Result<Expr> {
        let start = self.current.span;
        self.advance(); // function name

        let mut grouping = self.parse_grouping()?;

        self.expect(&TokenKind::LParen)?;

        let mut parameter = None;
        if op.takes_parameter() {
            let text = self.expect_duration_text()?;
            let value = text
                .parse::<u64>()
                .map_err(|_| self.error(&format!("invalid parameter for {}: {text}", op.as_str())))?;
            parameter = Some(value);
            self.expect(&TokenKind::Comma)?;
        }

        let child = self.parse_binary(0)?;

        let mut end = self.current.span;
        self.expect(&TokenKind::RParen)?;

        // Grouping may also trail the closing paren
        if grouping.is_none() {
            if let Some(trailing) = self.parse_grouping()? {
                grouping = Some(trailing);
                end = self.previous_span();
            }
        }

        Ok(Expr::VectorAggregation {
            op,
            grouping,
            parameter,
            child: Box::new(child),
            span: start.to(end),
        })
    }

    /// Parses an optional `by (...)` / `without (...)` clause.
    fn parse_grouping(&mut self) -> Result<Option<Grouping>> {
        let without = if self.current_ident_is("by") {
            false
        } else if self.current_ident_is("without") {
            true
        } else {
            return Ok(None);
        };
        self.advance();

        self.expect(&TokenKind::LParen)?;
        let mut labels = Vec::new();
        loop {
            if self.current.kind == TokenKind::RParen {
                break;
            }
            labels.push(self.expect_ident()?);
            if self.current.kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;

        Ok(Some(Grouping { without, labels }))
    }

    /// Parses a single pipeline stage after a `|`.
    fn parse_stage(&mut self) -> Result<Stage> {
        let name = self.expect_ident()?;
        match name.as_str() {
            "json" => Ok(Stage::Json),
            "logfmt" => Ok(Stage::Logfmt),
            "line_format" => {
                let template = self.expect_string()?;
                Ok(Stage::LineFormat(template))
            }
            "label_format" => {
                let mut assignments = Vec::new();
                loop {
                    let dst = self.expect_ident()?;
                    self.expect(&TokenKind::Eq)?;
                    let value = match &self.current.kind {
                        TokenKind::Ident(src) => {
                            let src = src.clone();
                            self.advance();
                            LabelFormatValue::Label(src)
                        }
                        TokenKind::String(template) => {
                            let template = template.clone();
                            self.advance();
                            LabelFormatValue::Template(template)
                        }
                        kind => {
                            return Err(self.error(&format!(
                                "expected label name or template string, got {}",
                                kind.name()
                            )));
                        }
                    };
                    assignments.push((dst, value));
                    if self.current.kind == TokenKind::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
                Ok(Stage::LabelFormat(assignments))
            }
            _ => Err(self.error(&format!("unknown pipeline stage: {name}"))),
        }
    }

    /// Returns true if the current token is the given keyword identifier.
    fn current_ident_is(&self, keyword: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Ident(name) if name == keyword)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Span of the most recently consumed token's end position.
    fn previous_span(&self) -> Span {
        // The lexer has already produced the lookahead token, so the best
        // available end position is the start of the current token.
        Span::new(
            self.current.span.start,
            self.current.span.start,
            self.current.span.line,
            self.current.span.column,
        )
    }

    /// Consumes the current token if it matches, or errors.
    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if &self.current.kind == kind {
            self.advance();
            Ok(())
        } else if let TokenKind::Error(msg) = &self.current.kind {
            let msg = msg.clone();
            Err(self.error(&msg))
        } else {
            Err(self.error(&format!(
                "expected {}, got {}",
                kind.name(),
                self.current.kind.name()
            )))
        }
    }

    /// Consumes an identifier token and returns its text.
    fn expect_ident(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::Error(msg) => {
                let msg = msg.clone();
                Err(self.error(&msg))
            }
            kind => Err(self.error(&format!("expected identifier, got {}", kind.name()))),
        }
    }

    /// Consumes a string token and returns its value.
    fn expect_string(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            TokenKind::Error(msg) => {
                let msg = msg.clone();
                Err(self.error(&msg))
            }
            kind => Err(self.error(&format!("expected string, got {}", kind.name()))),
        }
    }

    /// Consumes a duration token and returns its raw text.
    fn expect_duration_text(&mut self) -> Result<String> {
        match &self.current.kind {
            TokenKind::Duration(text) => {
                let text = text.clone();
                self.advance();
                Ok(text)
            }
            TokenKind::Error(msg) => {
                let msg = msg.clone();
                Err(self.error(&msg))
            }
            kind => Err(self.error(&format!("expected duration, got {}", kind.name()))),
        }
    }

    /// Consumes a duration token and parses it.
    fn expect_duration(&mut self) -> Result<QueryDuration> {
        let span = self.current.span;
        let text = self.expect_duration_text()?;
        QueryDuration::parse(&text).map_err(|msg| self.error_at(span, &msg))
    }

    /// Creates a parse error at the current token.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    /// Creates a parse error at the given span.
    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::parse(message, span.line, span.column, self.context_at(span))
    }

    /// Gets the source line around a span for error messages.
    fn context_at(&self, span: Span) -> String {
        let line_start = self.source[..span.start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.source[span.start..]
            .find('\n')
            .map_or(self.source.len(), |i| span.start + i);

        self.source[line_start..line_end].to_string()
    }
}

/// Parses query source into an expression.
///
/// # Errors
/// Returns an error if the source cannot be parsed.
pub fn parse_expr(source: &str) -> Result<Expr> {
    Parser::new(source).parse()
}
