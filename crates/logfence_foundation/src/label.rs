//! Label matchers for stream selectors.
//!
//! A stream selector filters log streams by label values through a list of
//! matchers. The `namespace` label is reserved: tenant isolation is enforced
//! by requiring every selector to pin it to the owning namespace.

use std::fmt;

/// The reserved label enforced on every stream selector of a tenant-scoped rule.
pub const NAMESPACE_LABEL: &str = "namespace";

/// Comparison operator of a label matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchOp {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `=~`
    RegexMatch,
    /// `!~`
    RegexNotMatch,
}

impl MatchOp {
    /// Returns the selector syntax for this operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::RegexMatch => "=~",
            Self::RegexNotMatch => "!~",
        }
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `name op "value"` constraint inside a stream selector.
///
/// Matchers are immutable; enforcement replaces whole matcher lists rather
/// than editing matchers in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelMatcher {
    /// Label name being matched.
    pub name: String,
    /// Comparison operator.
    pub op: MatchOp,
    /// Value (or regex) the label is matched against.
    pub value: String,
}

impl LabelMatcher {
    /// Creates a new matcher.
    #[must_use]
    pub fn new(name: impl Into<String>, op: MatchOp, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op,
            value: value.into(),
        }
    }

    /// Creates an exact-match matcher.
    #[must_use]
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, MatchOp::Equal, value)
    }

    /// Creates the synthesized namespace matcher for the given namespace.
    #[must_use]
    pub fn namespace(ns: impl Into<String>) -> Self {
        Self::equal(NAMESPACE_LABEL, ns)
    }

    /// Returns true if this matcher constrains the reserved namespace label.
    #[must_use]
    pub fn is_namespace(&self) -> bool {
        self.name == NAMESPACE_LABEL
    }

    /// Returns true if this matcher is exactly `namespace="<ns>"`.
    #[must_use]
    pub fn pins_namespace(&self, ns: &str) -> bool {
        self.is_namespace() && self.op == MatchOp::Equal && self.value == ns
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, self.op, quote(&self.value))
    }
}

/// Quotes a matcher value as a selector string literal.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
