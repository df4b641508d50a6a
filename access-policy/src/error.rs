//! Error types for the access policy engine.
//!
//! Business-rule denials are never errors. They are returned as
//! [`Decision`](crate::Decision) values. The variants here cover malformed
//! input (caller contract violations) and configuration problems only.

use thiserror::Error;

/// Errors raised while building principals or loading policy configuration.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// A role string outside the closed role set.
    ///
    /// Unknown roles are rejected at construction time and never reach the
    /// rule table, so they cannot be granted anything by accident.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// An action string outside `read | write | delete | reassign`.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// The session record handed over by the auth provider is malformed.
    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),

    /// The policy configuration document could not be parsed.
    #[error("policy configuration parsing failed: {0}")]
    ConfigParse(String),

    /// The policy configuration parsed but holds out-of-range values.
    #[error("policy configuration is invalid: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for access policy operations.
pub type Result<T> = std::result::Result<T, AuthzError>;
