//! In-memory model of the shared rule artifact.
//!
//! Validated documents are persisted as named YAML entries in one shared
//! key-value artifact consumed by the log ruler. The artifact carries an
//! ownership sentinel label; entries are only ever created, updated, or
//! deleted when the sentinel marks the artifact as ours. Transport of the
//! artifact (and the reconcile loop driving these calls) lives outside
//! this crate.

use std::collections::BTreeMap;

use logfence_foundation::{Error, Result};
use serde::Serialize;

use crate::document::{RuleDocument, RuleGroup};

/// Label key of the ownership sentinel.
pub const OWNERSHIP_LABEL: &str = "app.kubernetes.io/managed-by";

/// Sentinel value marking the artifact as owned by this system.
pub const OWNER: &str = "logfence";

/// Builds the artifact entry name for a rule resource.
#[must_use]
pub fn entry_name(namespace: &str, name: &str) -> String {
    format!("{namespace}-{name}.yml")
}

/// Serialized shape of one artifact entry: the groups only. The namespace
/// is carried by the entry name, never by the payload.
#[derive(Serialize)]
struct RuleFile<'a> {
    groups: &'a [RuleGroup],
}

/// The shared key-value rule artifact.
///
/// `None` state models an artifact that does not exist yet; the first
/// `apply` creates it stamped with the ownership sentinel.
#[derive(Clone, Debug, Default)]
pub struct RuleStore {
    /// Artifact name, for error messages.
    name: String,
    /// Labels and entries, present once the artifact exists.
    artifact: Option<Artifact>,
}

#[derive(Clone, Debug)]
struct Artifact {
    labels: BTreeMap<String, String>,
    entries: BTreeMap<String, String>,
}

impl RuleStore {
    /// Creates a store for an artifact that does not exist yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact: None,
        }
    }

    /// Creates a store over an artifact that already exists with the given
    /// labels, e.g. one created by another tool.
    #[must_use]
    pub fn existing(name: impl Into<String>, labels: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            artifact: Some(Artifact {
                labels,
                entries: BTreeMap::new(),
            }),
        }
    }

    /// Writes a validated document under the given entry name.
    ///
    /// Creates the artifact (stamped with the ownership sentinel) if it does
    /// not exist yet.
    ///
    /// # Errors
    /// Fails with `NotManaged` if the artifact exists but is not owned by
    /// this system, or with `EncodeError` if the document cannot be encoded.
    pub fn apply(&mut self, entry: &str, document: &RuleDocument) -> Result<()> {
        let data = serde_yaml::to_string(&RuleFile {
            groups: &document.groups,
        })
        .map_err(|e| Error::encode(e.to_string()))?;

        match &mut self.artifact {
            None => {
                let mut labels = BTreeMap::new();
                labels.insert(OWNERSHIP_LABEL.to_string(), OWNER.to_string());
                let mut entries = BTreeMap::new();
                entries.insert(entry.to_string(), data);
                self.artifact = Some(Artifact { labels, entries });
                Ok(())
            }
            Some(artifact) => {
                check_ownership(&self.name, &artifact.labels)?;
                artifact.entries.insert(entry.to_string(), data);
                Ok(())
            }
        }
    }

    /// Removes an entry, e.g. after its rule resource was deleted.
    ///
    /// Removing from a missing artifact, or removing an absent entry, is a
    /// no-op success.
    ///
    /// # Errors
    /// Fails with `NotManaged` if the artifact exists but is not owned by
    /// this system.
    pub fn remove(&mut self, entry: &str) -> Result<()> {
        let Some(artifact) = &mut self.artifact else {
            return Ok(());
        };
        check_ownership(&self.name, &artifact.labels)?;
        artifact.entries.remove(entry);
        Ok(())
    }

    /// Returns the payload stored under an entry name.
    #[must_use]
    pub fn get(&self, entry: &str) -> Option<&str> {
        self.artifact
            .as_ref()
            .and_then(|a| a.entries.get(entry))
            .map(String::as_str)
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifact.as_ref().map_or(0, |a| a.entries.len())
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Verifies the ownership sentinel before any mutation.
fn check_ownership(name: &str, labels: &BTreeMap<String, String>) -> Result<()> {
    match labels.get(OWNERSHIP_LABEL) {
        Some(owner) if owner == OWNER => Ok(()),
        Some(owner) => Err(Error::not_managed(name, Some(owner.clone()))),
        None => Err(Error::not_managed(name, None)),
    }
}
