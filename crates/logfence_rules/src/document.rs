//! The rule-document model.
//!
//! A `RuleDocument` holds the groups and rules owned by one tenant-scoped
//! resource. The `namespace` is supplied by the resource's location in the
//! cluster, never parsed from the document, and never serialized into the
//! rule artifact.

use std::collections::BTreeMap;

use logfence_foundation::{Error, Result};
use serde::{Deserialize, Serialize};

/// The rules owned by one resource, subject to validation as a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDocument {
    /// Owning namespace; empty for cluster-scoped documents.
    pub namespace: String,
    /// Ordered rule groups.
    pub groups: Vec<RuleGroup>,
}

impl RuleDocument {
    /// Creates a document owned by the given namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>, groups: Vec<RuleGroup>) -> Self {
        Self {
            namespace: namespace.into(),
            groups,
        }
    }
}

/// A named group of rules evaluated at one interval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    /// Group name.
    pub name: String,
    /// Evaluation interval, e.g. `1m`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    /// Ordered rules.
    pub rules: Vec<GroupRule>,
}

/// A single alerting or recording rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Alert name, for alerting rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Recorded metric name, for recording rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    /// Query expression source text.
    pub expr: String,
    /// How long the condition must hold before the alert fires.
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,
    /// Annotations attached to the fired alert.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Labels attached to the fired alert or recorded series.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl GroupRule {
    /// Returns the label identifying this rule in error messages: the alert
    /// or record name if present, else the raw expression text.
    #[must_use]
    pub fn label(&self) -> &str {
        self.alert
            .as_deref()
            .or(self.record.as_deref())
            .unwrap_or(&self.expr)
    }
}

/// Observed validation state of a rule resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStatus {
    /// True when the document last validated cleanly.
    pub valid: bool,
    /// Error description for invalid documents, empty otherwise.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl RuleStatus {
    /// Status for a document that validated cleanly.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    /// Status recording a validation failure.
    #[must_use]
    pub fn from_error(err: &Error) -> Self {
        Self {
            valid: false,
            message: err.to_string(),
        }
    }

    /// Derives a status from a validation result.
    #[must_use]
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(err) => Self::from_error(err),
        }
    }
}
