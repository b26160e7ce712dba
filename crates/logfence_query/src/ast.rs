//! Abstract syntax tree for the query language.
//!
//! `Expr` is a closed tagged union: every node kind the parser can produce
//! is a variant here, and consumers dispatch over it exhaustively. The tree
//! is acyclic by ownership; `Selector` is the sole leaf.

use logfence_foundation::LabelMatcher;

use crate::duration::QueryDuration;
use crate::span::Span;

/// A parsed query expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Stream selector: `{app="foo", env="prod"}`.
    Selector {
        /// Ordered label matchers.
        matchers: Vec<LabelMatcher>,
        /// Source location.
        span: Span,
    },

    /// Line filter applied to a log expression: `<child> |= "error"`.
    Filter {
        /// Expression the filter applies to.
        child: Box<Expr>,
        /// Filter operator.
        op: FilterOp,
        /// Pattern the log line is matched against.
        pattern: String,
        /// Source location.
        span: Span,
    },

    /// Log range: `<child>[5m]`, with optional `offset` and `unwrap` metadata.
    LogRange {
        /// Log expression the range selects over.
        child: Box<Expr>,
        /// Range window.
        range: QueryDuration,
        /// Optional `offset <duration>`.
        offset: Option<QueryDuration>,
        /// Optional `| unwrap <label>` sample extraction.
        unwrap: Option<String>,
        /// Source location.
        span: Span,
    },

    /// Range aggregation: `rate(<child>)`.
    RangeAggregation {
        /// Aggregation operator.
        op: RangeOp,
        /// The log range (or nested expression) being aggregated.
        child: Box<Expr>,
        /// Source location.
        span: Span,
    },

    /// Vector aggregation: `sum by (app) (<child>)`.
    VectorAggregation {
        /// Aggregation operator.
        op: VectorOp,
        /// Optional `by (...)` / `without (...)` clause.
        grouping: Option<Grouping>,
        /// Operator parameter, e.g. the `5` in `topk(5, ...)`.
        parameter: Option<u64>,
        /// Expression being aggregated.
        child: Box<Expr>,
        /// Source location.
        span: Span,
    },

    /// Pipeline of parsing/formatting stages: `<child> | json | line_format "..."`.
    ///
    /// Stages are text-only operations over log lines; enforcement never
    /// inspects them.
    Pipeline {
        /// Expression feeding the pipeline.
        child: Box<Expr>,
        /// Stages applied in order.
        stages: Vec<Stage>,
        /// Source location.
        span: Span,
    },

    /// Binary operation: `<left> <op> <right>`.
    BinaryOp {
        /// Binary operator.
        op: BinOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
        /// Source location.
        span: Span,
    },
}

impl Expr {
    /// Returns the source span of this node.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Selector { span, .. }
            | Self::Filter { span, .. }
            | Self::LogRange { span, .. }
            | Self::RangeAggregation { span, .. }
            | Self::VectorAggregation { span, .. }
            | Self::Pipeline { span, .. }
            | Self::BinaryOp { span, .. } => *span,
        }
    }

    /// Returns a short name for this node kind, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Selector { .. } => "selector",
            Self::Filter { .. } => "filter",
            Self::LogRange { .. } => "log range",
            Self::RangeAggregation { .. } => "range aggregation",
            Self::VectorAggregation { .. } => "vector aggregation",
            Self::Pipeline { .. } => "pipeline",
            Self::BinaryOp { .. } => "binary operation",
        }
    }

    /// Returns true if this node is a stream selector.
    #[must_use]
    pub const fn is_selector(&self) -> bool {
        matches!(self, Self::Selector { .. })
    }
}

/// Line filter operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    /// `|=` line contains the pattern.
    Contains,
    /// `!=` line does not contain the pattern.
    NotContains,
    /// `|~` line matches the regex.
    Matches,
    /// `!~` line does not match the regex.
    NotMatches,
}

impl FilterOp {
    /// Returns the query syntax for this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "|=",
            Self::NotContains => "!=",
            Self::Matches => "|~",
            Self::NotMatches => "!~",
        }
    }
}

/// Range aggregation operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeOp {
    /// `count_over_time`
    CountOverTime,
    /// `rate`
    Rate,
    /// `bytes_over_time`
    BytesOverTime,
    /// `bytes_rate`
    BytesRate,
    /// `sum_over_time`
    SumOverTime,
    /// `avg_over_time`
    AvgOverTime,
    /// `min_over_time`
    MinOverTime,
    /// `max_over_time`
    MaxOverTime,
    /// `stddev_over_time`
    StddevOverTime,
    /// `stdvar_over_time`
    StdvarOverTime,
}

impl RangeOp {
    /// Returns the query syntax for this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CountOverTime => "count_over_time",
            Self::Rate => "rate",
            Self::BytesOverTime => "bytes_over_time",
            Self::BytesRate => "bytes_rate",
            Self::SumOverTime => "sum_over_time",
            Self::AvgOverTime => "avg_over_time",
            Self::MinOverTime => "min_over_time",
            Self::MaxOverTime => "max_over_time",
            Self::StddevOverTime => "stddev_over_time",
            Self::StdvarOverTime => "stdvar_over_time",
        }
    }

    /// Resolves a function name to a range operator.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "count_over_time" => Some(Self::CountOverTime),
            "rate" => Some(Self::Rate),
            "bytes_over_time" => Some(Self::BytesOverTime),
            "bytes_rate" => Some(Self::BytesRate),
            "sum_over_time" => Some(Self::SumOverTime),
            "avg_over_time" => Some(Self::AvgOverTime),
            "min_over_time" => Some(Self::MinOverTime),
            "max_over_time" => Some(Self::MaxOverTime),
            "stddev_over_time" => Some(Self::StddevOverTime),
            "stdvar_over_time" => Some(Self::StdvarOverTime),
            _ => None,
        }
    }
}

/// Vector aggregation operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorOp {
    /// `sum`
    Sum,
    /// `avg`
    Avg,
    /// `min`
    Min,
    /// `max`
    Max,
    /// `count`
    Count,
    /// `stddev`
    Stddev,
    /// `stdvar`
    Stdvar,
    /// `bottomk`
    Bottomk,
    /// `topk`
    Topk,
}

impl VectorOp {
    /// Returns the query syntax for this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
            Self::Count => "count",
            Self::Stddev => "stddev",
            Self::Stdvar => "stdvar",
            Self::Bottomk => "bottomk",
            Self::Topk => "topk",
        }
    }

    /// Resolves a function name to a vector operator.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(Self::Sum),
            "avg" => Some(Self::Avg),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "count" => Some(Self::Count),
            "stddev" => Some(Self::Stddev),
            "stdvar" => Some(Self::Stdvar),
            "bottomk" => Some(Self::Bottomk),
            "topk" => Some(Self::Topk),
            _ => None,
        }
    }

    /// Returns true if this operator takes a numeric parameter.
    #[must_use]
    pub const fn takes_parameter(self) -> bool {
        matches!(self, Self::Bottomk | Self::Topk)
    }
}

/// A `by (...)` or `without (...)` grouping clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grouping {
    /// True for `without`, false for `by`.
    pub without: bool,
    /// Grouping label names, in source order.
    pub labels: Vec<String>,
}

/// A pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    /// `| json`
    Json,
    /// `| logfmt`
    Logfmt,
    /// `| line_format "<template>"`
    LineFormat(String),
    /// `| label_format <dst>=<src-or-template>, ...`
    LabelFormat(Vec<(String, LabelFormatValue)>),
}

/// Right-hand side of a `label_format` assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelFormatValue {
    /// Rename from another label: `dst=src`.
    Label(String),
    /// Template string: `dst="<template>"`.
    Template(String),
}

/// Binary operators, with parsing precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    /// `or`
    Or,
    /// `and`
    And,
    /// `unless`
    Unless,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
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
}

impl BinOp {
    /// Returns the query syntax for this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Unless => "unless",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
        }
    }

    /// Binding strength; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And | Self::Unless => 2,
            Self::Eq | Self::Neq | Self::Lt | Self::Lte | Self::Gt | Self::Gte => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div | Self::Mod => 5,
            Self::Pow => 6,
        }
    }

    /// Returns true for right-associative operators.
    #[must_use]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }
}
