//! Collaborator error types.

use thiserror::Error;

/// Errors reported by a collaborator (session, router).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The collaborator could not be reached or is not ready.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The collaborator refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}
