//! Shared error taxonomy.
//!
//! Every guard violation, session failure, and validation problem in the
//! domain layer is raised as a [`CoreError`] at the point of detection and
//! translated to an HTTP response at the API boundary. Session failures
//! carry a machine-readable reason so the boundary can decide whether to
//! instruct the client to clear its cookie.

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// No usable employee session. Always paired with a clear-cookie
    /// instruction at the HTTP boundary.
    #[error("Session required: {0}")]
    SessionRequired(SessionRequiredReason),

    /// The session resolved to a record whose status permanently revokes
    /// employee access. Also paired with a clear-cookie instruction.
    #[error("Access revoked: onboarding is {0}")]
    AccessRevoked(RevokedReason),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why an employee session could not be established (SESSION_REQUIRED).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequiredReason {
    /// No session cookie was presented.
    MissingCookie,
    /// The target onboarding id was malformed.
    InvalidId,
    /// No digital onboarding matches the presented token's hash.
    NoMatch,
    /// The invite backing the session has expired or was cleared.
    Expired,
}

impl SessionRequiredReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionRequiredReason::MissingCookie => "MISSING_COOKIE",
            SessionRequiredReason::InvalidId => "INVALID_ID",
            SessionRequiredReason::NoMatch => "NO_MATCH",
            SessionRequiredReason::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for SessionRequiredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which terminal-for-the-employee status revoked access (UNAUTHORIZED).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokedReason {
    Approved,
    Terminated,
}

impl RevokedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RevokedReason::Approved => "APPROVED",
            RevokedReason::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for RevokedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
