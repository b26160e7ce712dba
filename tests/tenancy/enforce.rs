//! Integration tests for namespace enforcement.

use logfence::foundation::ErrorKind;
use logfence::query::{parse_expr, to_query};
use logfence::tenancy::enforce_expr;

fn enforce(ns: &str, source: &str) -> Result<String, logfence::foundation::Error> {
    let mut expr = parse_expr(source).expect("parse failed");
    enforce_expr(ns, &mut expr)?;
    Ok(to_query(&expr))
}

#[test]
fn adds_namespace_to_bare_selector() {
    assert_eq!(
        enforce("prod", "{app=\"foo\"}").unwrap(),
        "{app=\"foo\", namespace=\"prod\"}"
    );
}

#[test]
fn rejects_foreign_namespace() {
    let err = enforce("prod", "{app=\"foo\", namespace=\"staging\"}").unwrap_err();
    let ErrorKind::NamespaceMismatch { found, expected } = err.kind else {
        panic!("expected namespace mismatch, got {err}");
    };
    assert_eq!(found, "namespace=\"staging\"");
    assert_eq!(expected, "prod");
}

#[test]
fn accepts_matching_namespace_unchanged() {
    assert_eq!(
        enforce("prod", "{app=\"foo\", namespace=\"prod\"}").unwrap(),
        "{app=\"foo\", namespace=\"prod\"}"
    );
}

#[test]
fn rejects_regex_namespace_matcher() {
    let err = enforce("prod", "{app=\"foo\", namespace=~\"prod\"}").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NamespaceMismatch { .. }));
}

#[test]
fn enforces_inside_range_aggregation() {
    assert_eq!(
        enforce("prod", "sum(rate({app=\"foo\"}[5m]))").unwrap(),
        "sum(rate({app=\"foo\", namespace=\"prod\"}[5m]))"
    );
}

#[test]
fn enforces_through_full_depth() {
    // vector agg -> range agg -> log range -> filter -> selector
    assert_eq!(
        enforce(
            "prod",
            "max by (app) (avg_over_time({app=\"foo\"} |= \"err\" | unwrap latency [10m] offset 5m))"
        )
        .unwrap(),
        "max by (app) (avg_over_time({app=\"foo\", namespace=\"prod\"} |= \"err\" | unwrap latency [10m] offset 5m))"
    );
}

#[test]
fn pipeline_stages_are_not_inspected() {
    // label_format may mention the namespace label; only selectors matter
    assert_eq!(
        enforce("prod", "{app=\"foo\"} | label_format namespace=\"evil\"").unwrap(),
        "{app=\"foo\", namespace=\"prod\"} | label_format namespace=\"evil\""
    );
}

#[test]
fn enforces_left_operand_of_binary_op() {
    let err = enforce(
        "prod",
        "rate({namespace=\"other\", a=\"1\"}[1m]) + rate({b=\"2\"}[1m])",
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NamespaceMismatch { .. }));
}

#[test]
fn enforces_right_operand_of_binary_op() {
    let err = enforce(
        "prod",
        "rate({a=\"1\"}[1m]) + rate({namespace=\"other\", b=\"2\"}[1m])",
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NamespaceMismatch { .. }));
}

#[test]
fn rewrites_both_operands_of_binary_op() {
    assert_eq!(
        enforce(
            "prod",
            "sum(rate({a=\"1\"}[1m])) / sum(rate({b=\"2\"}[1m]))"
        )
        .unwrap(),
        "sum(rate({a=\"1\", namespace=\"prod\"}[1m])) / sum(rate({b=\"2\", namespace=\"prod\"}[1m]))"
    );
}

#[test]
fn enforces_all_selectors_in_nested_binaries() {
    let enforced = enforce(
        "prod",
        "rate({a=\"1\"}[1m]) or rate({b=\"2\"}[1m]) or rate({c=\"3\"}[1m])",
    )
    .unwrap();
    assert_eq!(enforced.matches("namespace=\"prod\"").count(), 3);
}

#[test]
fn moves_existing_namespace_matcher_last() {
    assert_eq!(
        enforce("prod", "{namespace=\"prod\", app=\"foo\"}").unwrap(),
        "{app=\"foo\", namespace=\"prod\"}"
    );
}
