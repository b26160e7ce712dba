//! Integration tests for Layer 3: Rules
//!
//! Tests for document validation and the shared rule artifact.

mod store;
mod validator;
