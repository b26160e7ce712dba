//! Namespace enforcement for query expressions.
//!
//! Tenant-scoped rules may only select log streams belonging to their own
//! namespace. This crate rewrites every stream selector reachable from an
//! expression root so it carries exactly one `namespace="<ns>"` matcher,
//! and rejects expressions whose author pinned a different namespace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod enforce;

pub use enforce::{enforce_expr, enforce_matchers};
