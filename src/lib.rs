//! Logfence - Namespace isolation for multi-tenant log-query rules
//!
//! This crate re-exports all layers of the logfence system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: logfence_rules      — Rule documents, validation, rule store
//! Layer 2: logfence_tenancy    — Matcher enforcement, expression walker
//! Layer 1: logfence_query      — Lexer, parser, AST, canonical printer
//! Layer 0: logfence_foundation — Label matchers, errors
//! ```

pub use logfence_foundation as foundation;
pub use logfence_query as query;
pub use logfence_rules as rules;
pub use logfence_tenancy as tenancy;
