//! Error types for the logfence system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Result type used throughout logfence.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for logfence operations.
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attaches the label of the rule that produced this error.
    #[must_use]
    pub fn with_rule(self, label: impl Into<String>) -> Self {
        self.with_context(ErrorContext::new().with_rule(label))
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32, context: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context: context.into(),
        })
    }

    /// Creates a namespace mismatch error.
    #[must_use]
    pub fn namespace_mismatch(found: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(ErrorKind::NamespaceMismatch {
            found: found.into(),
            expected: expected.into(),
        })
    }

    /// Creates an unsupported node error.
    #[must_use]
    pub fn unsupported_node(kind: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedNode(kind.into()))
    }

    /// Creates an ownership violation error for the rule store.
    #[must_use]
    pub fn not_managed(name: impl Into<String>, owner: Option<String>) -> Self {
        Self::new(ErrorKind::NotManaged {
            name: name.into(),
            owner,
        })
    }

    /// Creates an artifact encoding error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EncodeError(message.into()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rule) = self.context.as_ref().and_then(|c| c.rule.as_deref()) {
            write!(f, "{rule}: {}", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed query text.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// An author-supplied namespace matcher conflicts with the owning namespace.
    #[error("'namespace' selector {found} should equal '{expected}'")]
    NamespaceMismatch {
        /// The offending matcher, rendered as selector text.
        found: String,
        /// The namespace the matcher must equal.
        expected: String,
    },

    /// The walker met an expression kind it does not know how to enforce.
    ///
    /// This signals grammar/walker drift, not bad user input. It must abort
    /// loudly: skipping enforcement would reopen the isolation hole.
    #[error("unhandled expression kind: {0}")]
    UnsupportedNode(String),

    /// The shared rule artifact is owned by someone else.
    #[error("rule artifact '{name}' is managed by '{}'", .owner.as_deref().unwrap_or("nobody (missing ownership label)"))]
    NotManaged {
        /// Name of the artifact.
        name: String,
        /// The foreign owner, if the ownership label was present at all.
        owner: Option<String>,
    },

    /// Failed to encode a validated document into the artifact format.
    #[error("encode error: {0}")]
    EncodeError(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Label of the rule being validated: its alert or record name if present,
    /// else its raw expression text.
    pub rule: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule label.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}
