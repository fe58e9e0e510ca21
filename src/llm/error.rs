//! Advisory error types

use thiserror::Error;

/// Advisory provider error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AdvisoryError {
    pub kind: AdvisoryErrorKind,
    pub message: String,
}

impl AdvisoryError {
    pub fn new(kind: AdvisoryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::Configuration, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::Auth, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::Timeout, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::ServerError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::InvalidRequest, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AdvisoryErrorKind::Unknown, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryErrorKind {
    /// Required credential absent - a deployment problem, not upstream
    Configuration,
    /// Authentication rejected (401, 403)
    Auth,
    /// Network issues
    Network,
    /// Bounded request timeout elapsed; treated as an upstream failure
    Timeout,
    /// Server error (5xx)
    ServerError,
    /// Bad request (400)
    InvalidRequest,
    /// Unknown error
    Unknown,
}

impl AdvisoryErrorKind {
    /// Configuration problems are the caller's deployment issue; all
    /// other kinds are failures of the upstream provider.
    pub fn is_configuration(self) -> bool {
        matches!(self, Self::Configuration)
    }
}
