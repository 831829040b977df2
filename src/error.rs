//! Error types for the lookup cache

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::geocode::ResolveError;

/// Low-level reason a snapshot could not be read or written
#[derive(Debug, Error)]
pub enum StorageFault {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not a valid name -> coordinates mapping: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("entry \"{name}\" cannot be stored: {reason}")]
    InvalidEntry { name: String, reason: String },
}

/// Lifecycle state of a cache session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Open => write!(f, "open"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    /// The snapshot exists but cannot be used. Never treated as an empty cache.
    #[error("cache storage unavailable at {path:?}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: StorageFault,
    },

    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error("cannot {operation}: cache session is {state}")]
    SessionState {
        state: SessionState,
        operation: &'static str,
    },
}

impl CacheError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: impl Into<StorageFault>) -> Self {
        CacheError::StorageUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_message() {
        let err = CacheError::storage(
            "/tmp/geo_cache.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("geo_cache.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_session_state_message() {
        let err = CacheError::SessionState {
            state: SessionState::Closed,
            operation: "look up names",
        };
        assert_eq!(err.to_string(), "cannot look up names: cache session is closed");
    }

    #[test]
    fn test_resolution_is_transparent() {
        let err: CacheError = ResolveError::NotFound {
            name: "Atlantis".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "no geocoding result for \"Atlantis\"");
    }
}
