//! Error types for the Legistar client

use thiserror::Error;

/// Failures raised by a [`Transport`](crate::transport::Transport)
///
/// The client never retries or recovers from these; they reach the caller
/// wrapped in [`Error::Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("service schema error: {0}")]
    Schema(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by client operations
#[derive(Debug, Error)]
pub enum Error {
    /// A government-scoped operation ran before a tenant was selected
    #[error("operation '{operation}' requires a government; call select_tenant first")]
    NoTenantSelected { operation: String },

    /// The transport failed; passed through unmodified
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response did not have any shape the unwrapper knows how to classify
    #[error("unrecognized response shape: expected {expected}, found {found}")]
    UnrecognizedResponseShape { expected: String, found: String },

    /// A tenant was given as a blank identifier or a record without a GUID
    #[error("cannot select tenant from {0}: no guid")]
    InvalidTenant(String),

    /// A relationship lookup needs a key the record does not carry
    #[error("{kind} record has no '{field}' field")]
    MissingField { kind: String, field: String },
}

impl Error {
    pub(crate) fn missing(kind: impl std::fmt::Display, field: &str) -> Self {
        Error::MissingField {
            kind: kind.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::UnrecognizedResponseShape {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result alias for client operations
pub type Result<T> = std::result::Result<T, Error>;
