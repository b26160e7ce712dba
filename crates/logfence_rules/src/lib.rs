//! Rule documents, validation, and the shared rule artifact.
//!
//! This crate provides:
//! - `RuleDocument` / `RuleGroup` / `GroupRule` - The groups and rules owned
//!   by one tenant-scoped resource
//! - `validate` - Parse, enforce, and canonicalize every rule expression
//! - `RuleStore` - In-memory model of the shared key-value rule artifact,
//!   guarded by an ownership sentinel

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod document;
pub mod store;
pub mod validator;

pub use document::{GroupRule, RuleDocument, RuleGroup, RuleStatus};
pub use store::{OWNER, OWNERSHIP_LABEL, RuleStore, entry_name};
pub use validator::validate;
