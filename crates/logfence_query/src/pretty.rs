//! Canonical printer for query expressions.
//!
//! Converts an `Expr` back to query text. The output need not byte-match the
//! original source, but it always re-parses to an equivalent tree: binary
//! operands are parenthesized exactly where precedence requires it, matcher
//! values are re-quoted, and durations print in canonical form.

use std::fmt::Write;

use logfence_foundation::label::quote;

use crate::ast::{BinOp, Expr, LabelFormatValue, Stage};

/// Prints an expression as query text.
#[must_use]
pub fn to_query(expr: &Expr) -> String {
    let mut out = String::new();
    print_expr(&mut out, expr);
    out
}

fn print_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Selector { matchers, .. } => {
            out.push('{');
            for (i, matcher) in matchers.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{matcher}");
            }
            out.push('}');
        }

        Expr::Filter {
            child, op, pattern, ..
        } => {
            print_expr(out, child);
            let _ = write!(out, " {} {}", op.as_str(), quote(pattern));
        }

        Expr::LogRange {
            child,
            range,
            offset,
            unwrap,
            ..
        } => {
            print_expr(out, child);
            if let Some(label) = unwrap {
                let _ = write!(out, " | unwrap {label} ");
            }
            let _ = write!(out, "[{range}]");
            if let Some(offset) = offset {
                let _ = write!(out, " offset {offset}");
            }
        }

        Expr::RangeAggregation { op, child, .. } => {
            let _ = write!(out, "{}(", op.as_str());
            print_expr(out, child);
            out.push(')');
        }

        Expr::VectorAggregation {
            op,
            grouping,
            parameter,
            child,
            ..
        } => {
            out.push_str(op.as_str());
            if let Some(grouping) = grouping {
                out.push_str(if grouping.without { " without (" } else { " by (" });
                out.push_str(&grouping.labels.join(", "));
                out.push_str(") ");
            }
            out.push('(');
            if let Some(parameter) = parameter {
                let _ = write!(out, "{parameter}, ");
            }
            print_expr(out, child);
            out.push(')');
        }

        Expr::Pipeline { child, stages, .. } => {
            print_expr(out, child);
            for stage in stages {
                out.push_str(" | ");
                print_stage(out, stage);
            }
        }

        Expr::BinaryOp {
            op, left, right, ..
        } => {
            print_operand(out, left, *op, false);
            let _ = write!(out, " {} ", op.as_str());
            print_operand(out, right, *op, true);
        }
    }
}

/// Prints a binary operand, parenthesized where precedence demands.
fn print_operand(out: &mut String, operand: &Expr, parent: BinOp, is_right: bool) {
    let needs_parens = match operand {
        Expr::BinaryOp { op: child, .. } => {
            child.precedence() < parent.precedence()
                || (child.precedence() == parent.precedence()
                    && if parent.is_right_associative() {
                        !is_right
                    } else {
                        is_right
                    })
        }
        _ => false,
    };

    if needs_parens {
        out.push('(');
        print_expr(out, operand);
        out.push(')');
    } else {
        print_expr(out, operand);
    }
}

fn print_stage(out: &mut String, stage: &Stage) {
    match stage {
        Stage::Json => out.push_str("json"),
        Stage::Logfmt => out.push_str("logfmt"),
        Stage::LineFormat(template) => {
            let _ = write!(out, "line_format {}", quote(template));
        }
        Stage::LabelFormat(assignments) => {
            out.push_str("label_format ");
            for (i, (dst, value)) in assignments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match value {
                    LabelFormatValue::Label(src) => {
                        let _ = write!(out, "{dst}={src}");
                    }
                    LabelFormatValue::Template(template) => {
                        let _ = write!(out, "{dst}={}", quote(template));
                    }
                }
            }
        }
    }
}
