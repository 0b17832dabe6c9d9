// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Solace SMS agent.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// The primary error type shared by every adapter trait and pipeline stage.
#[derive(Debug, Error)]
pub enum SolaceError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed input: bad phone number, missing webhook field, undecodable envelope.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Work queue errors.
    #[error("queue error: {message}")]
    Queue {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Completion or analysis provider errors (API failure, unparseable response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound SMS transport errors.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A retried call gave up after exhausting its attempts.
    #[error("retry count exceeded after {attempts} attempts: {last_error}")]
    RetryExceeded { attempts: u32, last_error: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse error classification used at component boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ErrorKind {
    /// The caller sent something unusable. Retrying will not help.
    Validation,
    /// A referenced user, conversation, or message is missing.
    NotFound,
    /// A collaborator (storage, queue, provider, transport) failed.
    Dependency,
    /// A bounded retry loop gave up.
    RetryExceeded,
    /// Everything else.
    Internal,
}

impl SolaceError {
    /// Classify this error into the boundary taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolaceError::Validation(_) => ErrorKind::Validation,
            SolaceError::NotFound { .. } => ErrorKind::NotFound,
            SolaceError::Storage { .. }
            | SolaceError::Queue { .. }
            | SolaceError::Provider { .. }
            | SolaceError::Transport { .. }
            | SolaceError::Timeout { .. } => ErrorKind::Dependency,
            SolaceError::RetryExceeded { .. } => ErrorKind::RetryExceeded,
            SolaceError::Config(_) | SolaceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a later attempt of the same operation might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Dependency | ErrorKind::RetryExceeded)
    }

    /// Shorthand for a [`SolaceError::NotFound`].
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        SolaceError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}
