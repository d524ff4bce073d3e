use thiserror::Error;

/// Errors produced by k-means clustering
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// Caller supplied arguments that cannot be clustered (e.g. k == 0 or k > points)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal state broke an invariant; this is a bug, not a recoverable condition
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
