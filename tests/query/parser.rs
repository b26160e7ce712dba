//! Integration tests for the query parser.

use logfence::foundation::{ErrorKind, LabelMatcher, MatchOp};
use logfence::query::{BinOp, Expr, FilterOp, RangeOp, VectorOp, parse_expr};

#[test]
fn parse_selector_with_all_matcher_operators() {
    let expr = parse_expr("{app=\"foo\", env!=\"dev\", pod=~\"web-.*\", job!~\".*canary\"}")
        .expect("parse failed");
    let Expr::Selector { matchers, .. } = expr else {
        panic!("expected selector");
    };
    assert_eq!(
        matchers,
        vec![
            LabelMatcher::equal("app", "foo"),
            LabelMatcher::new("env", MatchOp::NotEqual, "dev"),
            LabelMatcher::new("pod", MatchOp::RegexMatch, "web-.*"),
            LabelMatcher::new("job", MatchOp::RegexNotMatch, ".*canary"),
        ]
    );
}

#[test]
fn parse_deeply_nested_query() {
    // vector agg over range agg over log range over filter over selector
    let expr = parse_expr("sum(count_over_time({app=\"foo\"} |= \"error\" [5m]))")
        .expect("parse failed");

    let Expr::VectorAggregation { op, child, .. } = expr else {
        panic!("expected vector aggregation");
    };
    assert_eq!(op, VectorOp::Sum);

    let Expr::RangeAggregation { op, child, .. } = *child else {
        panic!("expected range aggregation");
    };
    assert_eq!(op, RangeOp::CountOverTime);

    let Expr::LogRange { child, .. } = *child else {
        panic!("expected log range");
    };
    let Expr::Filter { op, child, .. } = *child else {
        panic!("expected filter");
    };
    assert_eq!(op, FilterOp::Contains);
    assert!(child.is_selector());
}

#[test]
fn parse_binary_over_aggregations() {
    let expr = parse_expr(
        "sum(rate({app=\"a\"}[1m])) / sum(rate({app=\"b\"}[1m])) > sum(rate({app=\"c\"}[1m]))",
    )
    .expect("parse failed");

    let Expr::BinaryOp { op, left, .. } = expr else {
        panic!("expected binary op");
    };
    assert_eq!(op, BinOp::Gt);
    assert!(matches!(*left, Expr::BinaryOp { op: BinOp::Div, .. }));
}

#[test]
fn parse_error_reports_position_and_line() {
    let err = parse_expr("{app=\"foo\"}\n|= 5").unwrap_err();
    let ErrorKind::ParseError { line, context, .. } = err.kind else {
        panic!("expected parse error, got {err}");
    };
    assert_eq!(line, 2);
    assert_eq!(context, "|= 5");
}

#[test]
fn parse_rejects_unknown_function() {
    let err = parse_expr("median({app=\"foo\"}[5m])").unwrap_err();
    assert!(err.to_string().contains("unknown function: median"));
}

#[test]
fn parse_rejects_unknown_stage() {
    let err = parse_expr("{app=\"foo\"} | regexp \"x\"").unwrap_err();
    assert!(err.to_string().contains("unknown pipeline stage: regexp"));
}

#[test]
fn parse_rejects_missing_range() {
    assert!(parse_expr("rate({app=\"foo\"})").is_err());
}

#[test]
fn parse_rejects_parameter_on_plain_aggregation() {
    // `sum` takes no parameter; `5,` cannot start an expression
    assert!(parse_expr("sum(5, rate({a=\"1\"}[1m]))").is_err());
}

#[test]
fn parse_requires_parameter_for_topk() {
    assert!(parse_expr("topk(rate({a=\"1\"}[1m]))").is_err());
}
