//! Error types for the live list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for list operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A change record's index is inconsistent with the current cache size.
    /// This is a contract violation by the query source, not a recoverable
    /// condition.
    #[error("malformed change batch: {0}")]
    MalformedBatch(String),

    #[error("no query configured")]
    NoQueryConfigured,
}

/// Failure reported by the query source itself (network, permission,
/// backend). Never retried here; surfaced through the notifier's `on_error`
/// with the cache left untouched.
#[derive(Clone, Debug, Error, Serialize, Deserialize)]
#[error("{kind} error from query source: {message}")]
pub struct SubscriptionError {
    pub kind: SubscriptionErrorKind,
    pub message: String,
}

impl SubscriptionError {
    pub fn new(kind: SubscriptionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Transport-level failure (connection lost, timeout).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SubscriptionErrorKind::Network, message)
    }

    /// The source rejected the registration or a delivery.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(SubscriptionErrorKind::PermissionDenied, message)
    }

    /// Server-side failure.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(SubscriptionErrorKind::Backend, message)
    }
}

/// Classification of source-reported failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionErrorKind {
    Network,
    PermissionDenied,
    Backend,
}

impl std::fmt::Display for SubscriptionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionErrorKind::Network => write!(f, "network"),
            SubscriptionErrorKind::PermissionDenied => write!(f, "permission"),
            SubscriptionErrorKind::Backend => write!(f, "backend"),
        }
    }
}

/// Result type for list operations.
pub type Result<T> = std::result::Result<T, SyncError>;
