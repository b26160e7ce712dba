//! Integration tests for Layer 2: Tenancy
//!
//! Tests for matcher enforcement and the expression walker.

mod enforce;
