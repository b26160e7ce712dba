//! Core types for the logfence system.
//!
//! This crate provides:
//! - `Error` / `ErrorKind` - Error types shared by all layers
//! - `LabelMatcher` / `MatchOp` - Stream-selector label matchers
//! - `NAMESPACE_LABEL` - The reserved tenant-isolation label

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod label;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use label::{LabelMatcher, MatchOp, NAMESPACE_LABEL};
