//! Integration tests for the shared rule artifact.

use std::collections::BTreeMap;

use logfence::foundation::ErrorKind;
use logfence::rules::{
    GroupRule, OWNER, OWNERSHIP_LABEL, RuleDocument, RuleGroup, RuleStore, entry_name, validate,
};

fn document(namespace: &str, expr: &str) -> RuleDocument {
    RuleDocument::new(
        namespace,
        vec![RuleGroup {
            name: "g".to_string(),
            interval: None,
            rules: vec![GroupRule {
                alert: Some("A".to_string()),
                expr: expr.to_string(),
                ..GroupRule::default()
            }],
        }],
    )
}

#[test]
fn validated_documents_persist_as_yaml_entries() {
    let doc = document("prod", "rate({app=\"foo\"}[5m])");
    let validated = validate(&doc, true).unwrap();

    let mut store = RuleStore::new("loki-rules");
    let entry = entry_name(&validated.namespace, "my-rules");
    store.apply(&entry, &validated).unwrap();

    let payload = store.get("prod-my-rules.yml").expect("missing entry");
    assert!(payload.contains("expr: rate({app=\"foo\", namespace=\"prod\"}[5m])"));
}

#[test]
fn invalid_documents_never_reach_the_store() {
    let doc = document("prod", "{app=\"foo\", namespace=\"staging\"}");
    let mut store = RuleStore::new("loki-rules");

    // Reconciliation only applies documents that validated; a failure
    // becomes a status update and the store keeps its previous contents.
    if let Ok(validated) = validate(&doc, true) {
        store
            .apply(&entry_name(&validated.namespace, "my-rules"), &validated)
            .unwrap();
    }
    assert!(store.is_empty());
}

#[test]
fn entries_from_different_tenants_coexist() {
    let mut store = RuleStore::new("loki-rules");

    for (ns, name) in [("prod", "alerts"), ("staging", "alerts"), ("prod", "slo")] {
        let validated = validate(&document(ns, "{app=\"foo\"}"), true).unwrap();
        store.apply(&entry_name(ns, name), &validated).unwrap();
    }

    assert_eq!(store.len(), 3);
    assert!(store.get("prod-alerts.yml").is_some());
    assert!(store.get("staging-alerts.yml").is_some());
    assert!(
        store
            .get("staging-alerts.yml")
            .unwrap()
            .contains("namespace=\"staging\"")
    );
}

#[test]
fn update_replaces_existing_entry() {
    let mut store = RuleStore::new("loki-rules");
    let entry = entry_name("prod", "alerts");

    let first = validate(&document("prod", "{app=\"foo\"}"), true).unwrap();
    store.apply(&entry, &first).unwrap();

    let second = validate(&document("prod", "{app=\"bar\"}"), true).unwrap();
    store.apply(&entry, &second).unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.get(&entry).unwrap().contains("app=\"bar\""));
}

#[test]
fn foreign_artifact_is_never_touched() {
    let labels = BTreeMap::from([(OWNERSHIP_LABEL.to_string(), "helm".to_string())]);
    let mut store = RuleStore::existing("loki-rules", labels);

    let validated = validate(&document("prod", "{app=\"foo\"}"), true).unwrap();
    let apply_err = store
        .apply(&entry_name("prod", "alerts"), &validated)
        .unwrap_err();
    assert!(matches!(apply_err.kind, ErrorKind::NotManaged { .. }));

    let remove_err = store.remove("prod-alerts.yml").unwrap_err();
    assert!(matches!(remove_err.kind, ErrorKind::NotManaged { .. }));
}

#[test]
fn owned_artifact_reports_owner_sentinel() {
    assert_eq!(OWNER, "logfence");
    assert_eq!(OWNERSHIP_LABEL, "app.kubernetes.io/managed-by");
}
