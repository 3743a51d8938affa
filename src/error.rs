//! Error types: infrastructure failures and request-processing faults.

use thiserror::Error;

use crate::response::Response;

/// The error type returned by gatehouse's fallible server operations.
///
/// Request-level failures (bad input, missing users, auth problems) are
/// expressed as [`Fault`]s and translated to HTTP responses inside the
/// pipeline. This type surfaces infrastructure failures only: binding to a
/// port or accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A classified request-processing failure.
///
/// Handlers and the registry raise `Fault`s with `?`; they travel up the
/// middleware chain untouched until the error boundary translates them into
/// a problem response. The variants are the complete taxonomy — classification
/// is a total match, so no failure ever reaches the transport unshaped.
#[derive(Debug, Error)]
pub enum Fault {
    /// The request carried a malformed or missing argument (bad path
    /// parameter, unparseable body).
    #[error("invalid request argument")]
    InvalidArgument,

    /// The addressed resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The caller is not authenticated for the attempted operation.
    #[error("authentication required")]
    Unauthorized,

    /// The input was well-formed but violated a domain rule. The message is
    /// returned to the client verbatim.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Anything else. The message is logged server-side and never shown to
    /// the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Fault {
    /// Wraps an arbitrary failure as an internal fault.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

/// What every pipeline stage and handler produces for one request.
pub type Outcome = Result<Response, Fault>;
