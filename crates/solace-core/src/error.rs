//! Error types for the Solace application.

use thiserror::Error;

/// A shared error type for the entire Solace application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The chat-facing variants
/// mirror the recovery paths the controller takes: history failures become a
/// fallback transcript, exchange failures become a connectivity apology, and
/// session-creation failures block submission until resolved.
#[derive(Error, Debug, Clone)]
pub enum SolaceError {
    /// The chat history service failed or returned unusable records.
    /// Always recovered locally into a fallback transcript.
    #[error("History load error: {0}")]
    HistoryLoad(String),

    /// The session-creation service was unreachable or minted an invalid
    /// identity. Surfaced inline; submission stays blocked until resolved.
    #[error("Session creation error: {0}")]
    SessionCreation(String),

    /// The assistant exchange failed at the transport level (network error
    /// or non-success status).
    #[error("Exchange transport error: {message}")]
    ExchangeTransport {
        status_code: Option<u16>,
        message: String,
        retryable: bool,
    },

    /// The assistant exchange returned a payload that could not be decoded.
    #[error("Exchange format error: {0}")]
    ExchangeFormat(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SolaceError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a HistoryLoad error
    pub fn history_load(message: impl Into<String>) -> Self {
        Self::HistoryLoad(message.into())
    }

    /// Creates a SessionCreation error
    pub fn session_creation(message: impl Into<String>) -> Self {
        Self::SessionCreation(message.into())
    }

    /// Creates an ExchangeTransport error
    pub fn exchange_transport(
        status_code: Option<u16>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self::ExchangeTransport {
            status_code,
            message: message.into(),
            retryable,
        }
    }

    /// Creates an ExchangeFormat error
    pub fn exchange_format(message: impl Into<String>) -> Self {
        Self::ExchangeFormat(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a HistoryLoad error
    pub fn is_history_load(&self) -> bool {
        matches!(self, Self::HistoryLoad(_))
    }

    /// Check if this is a SessionCreation error
    pub fn is_session_creation(&self) -> bool {
        matches!(self, Self::SessionCreation(_))
    }

    /// Check if this is an exchange error of either kind (transport or
    /// format). Both are recovered the same way: a connectivity apology is
    /// appended and the busy gate is released so the user can resubmit.
    pub fn is_exchange(&self) -> bool {
        matches!(
            self,
            Self::ExchangeTransport { .. } | Self::ExchangeFormat(_)
        )
    }

    /// Check whether a manual retry has a reasonable chance of succeeding.
    ///
    /// Transport errors carry a retryable flag (connect/timeout failures and
    /// 429/5xx statuses); format errors are never retryable since the remote
    /// payload itself was unusable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ExchangeTransport { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SolaceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SolaceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for SolaceError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, SolaceError>`.
pub type Result<T> = std::result::Result<T, SolaceError>;
