//! Shared error type across aspectmon crates.

use std::net::SocketAddr;

use thiserror::Error;

/// Stable error codes used in JSON error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Metrics listener could not bind its address.
    BindFailed,
    /// Two aspects claim the same route or root key.
    DuplicateAspect,
    /// Aspect name cannot be used as a path segment.
    InvalidAspectName,
    /// An aspect failed to produce its snapshot.
    SnapshotFailed,
    /// Configuration rejected.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BindFailed => "BIND_FAILED",
            ErrorCode::DuplicateAspect => "DUPLICATE_ASPECT",
            ErrorCode::InvalidAspectName => "INVALID_ASPECT_NAME",
            ErrorCode::SnapshotFailed => "SNAPSHOT_FAILED",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, AspectMonError>;

/// Unified error type used by core and the axum adapter.
#[derive(Debug, Error)]
pub enum AspectMonError {
    #[error("metrics listener bind failed ({addr}): {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("duplicate aspect: {0}")]
    DuplicateAspect(String),
    #[error("invalid aspect name: {0:?}")]
    InvalidAspectName(String),
    #[error("snapshot failed: {0}")]
    Snapshot(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl AspectMonError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AspectMonError::Bind { .. } => ErrorCode::BindFailed,
            AspectMonError::DuplicateAspect(_) => ErrorCode::DuplicateAspect,
            AspectMonError::InvalidAspectName(_) => ErrorCode::InvalidAspectName,
            AspectMonError::Snapshot(_) => ErrorCode::SnapshotFailed,
            AspectMonError::BadConfig(_) => ErrorCode::BadConfig,
            AspectMonError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            AspectMonError::Internal(_) => ErrorCode::Internal,
        }
    }
}
