//! Integration tests for whole-document validation.

use std::collections::BTreeMap;

use logfence::foundation::ErrorKind;
use logfence::rules::{GroupRule, RuleDocument, RuleGroup, RuleStatus, validate};

fn alerting_rule(alert: &str, expr: &str) -> GroupRule {
    GroupRule {
        alert: Some(alert.to_string()),
        expr: expr.to_string(),
        for_duration: Some("10m".to_string()),
        annotations: BTreeMap::from([(
            "summary".to_string(),
            "error rate is high".to_string(),
        )]),
        ..GroupRule::default()
    }
}

fn tenant_document() -> RuleDocument {
    RuleDocument::new(
        "prod",
        vec![
            RuleGroup {
                name: "availability".to_string(),
                interval: Some("1m".to_string()),
                rules: vec![
                    alerting_rule(
                        "HighErrorRate",
                        "sum(rate({app=\"api\"} |= \"error\" [5m])) > sum(rate({app=\"api\"}[5m]))",
                    ),
                    GroupRule {
                        record: Some("api:errors:rate5m".to_string()),
                        expr: "sum(rate({app=\"api\"} |= \"error\" [5m]))".to_string(),
                        ..GroupRule::default()
                    },
                ],
            },
            RuleGroup {
                name: "capacity".to_string(),
                interval: None,
                rules: vec![alerting_rule(
                    "HighLogVolume",
                    "sum by (app) (bytes_rate({env=\"prod\"}[10m]))",
                )],
            },
        ],
    )
}

#[test]
fn validates_and_enforces_whole_document() {
    let validated = validate(&tenant_document(), true).unwrap();

    for group in &validated.groups {
        for rule in &group.rules {
            assert!(
                rule.expr.contains("namespace=\"prod\""),
                "rule {} not enforced: {}",
                rule.label(),
                rule.expr
            );
        }
    }

    // Both operands of the binary comparison are enforced
    let alert = &validated.groups[0].rules[0];
    assert_eq!(alert.expr.matches("namespace=\"prod\"").count(), 2);
}

#[test]
fn validation_preserves_rule_metadata() {
    let validated = validate(&tenant_document(), true).unwrap();
    let alert = &validated.groups[0].rules[0];
    assert_eq!(alert.alert.as_deref(), Some("HighErrorRate"));
    assert_eq!(alert.for_duration.as_deref(), Some("10m"));
    assert_eq!(
        alert.annotations.get("summary").map(String::as_str),
        Some("error rate is high")
    );
}

#[test]
fn cluster_scoped_documents_skip_enforcement() {
    let doc = RuleDocument::new(
        "",
        vec![RuleGroup {
            name: "global".to_string(),
            interval: None,
            rules: vec![alerting_rule(
                "AnyNamespaceErrors",
                "sum(rate({namespace=~\".+\"} |= \"error\" [5m]))",
            )],
        }],
    );

    // Syntax-only validation accepts a selector no tenant could use
    let validated = validate(&doc, false).unwrap();
    assert!(validated.groups[0].rules[0].expr.contains("namespace=~\".+\""));
}

#[test]
fn invalid_rule_fails_document_with_status_message() {
    let mut doc = tenant_document();
    doc.groups[1].rules[0].expr = "sum(rate({app=\"api\"}[5m])".to_string();

    let result = validate(&doc, true);
    let status = RuleStatus::from_result(&result);
    assert!(!status.valid);
    assert!(status.message.starts_with("HighLogVolume: "));

    let err = result.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { .. }));
}

#[test]
fn valid_document_maps_to_ok_status() {
    let result = validate(&tenant_document(), true);
    let status = RuleStatus::from_result(&result);
    assert!(status.valid);
    assert!(status.message.is_empty());
}

#[test]
fn foreign_namespace_in_any_rule_rejects_document() {
    let mut doc = tenant_document();
    doc.groups[0].rules[1].expr =
        "sum(rate({app=\"api\", namespace=\"staging\"}[5m]))".to_string();

    let err = validate(&doc, true).unwrap_err();
    assert!(err.to_string().starts_with("api:errors:rate5m: "));
    assert!(matches!(err.kind, ErrorKind::NamespaceMismatch { .. }));
}
