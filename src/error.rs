//! Error types for netreach
//!
//! Two disjoint classes, matched exhaustively by callers:
//! - [`Error::Blocked`] is a deterministic policy outcome: a real rule,
//!   state, or policy decision against the traffic descriptor, attributed to
//!   exactly one component.
//! - [`Error::Lookup`] is an inconclusive abort: the injected client could
//!   not produce a resource snapshot. Callers must not report it as
//!   "blocked".

use thiserror::Error;

/// Main error type for netreach
#[derive(Error, Debug)]
pub enum Error {
    /// Traffic was denied by a specific component.
    #[error("{component}: {reason}")]
    Blocked {
        /// Id of the component that made the decision
        component: String,
        /// Human-readable reason for the denial
        reason: String,
    },

    /// A resource lookup failed; the traversal branch is inconclusive.
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

impl Error {
    /// Create a blocking error attributed to `component`.
    pub fn blocked(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Blocked {
            component: component.into(),
            reason: reason.into(),
        }
    }

    /// True if this is a deterministic block rather than a failed lookup.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Error::Blocked { .. })
    }
}

/// Errors produced at the injected client boundary.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("client error: {0}")]
    Client(String),

    #[error("no analyzer context for {0}")]
    NoContext(&'static str),

    #[error("no client for account {0}")]
    NoAccount(String),
}

impl LookupError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        LookupError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Result type alias for netreach
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_carries_component_and_reason() {
        let err = Error::blocked("sg-123", "no allowing rule");
        assert!(err.is_blocked());
        assert_eq!(err.to_string(), "sg-123: no allowing rule");
    }

    #[test]
    fn lookup_is_not_blocked() {
        let err = Error::from(LookupError::not_found("subnet", "subnet-1"));
        assert!(!err.is_blocked());
    }
}
