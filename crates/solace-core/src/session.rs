//! Session identity type.
//!
//! A session identity is an opaque string token addressing one
//! conversation's server-side state. It is supplied externally (route or
//! context) or minted on demand by the session-creation service; once
//! adopted it is used for every exchange request and for history loading.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolaceError};

/// Opaque token identifying a server-side conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Validates and wraps a session token.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::SessionCreation`] for an empty or
    /// whitespace-only token - the same failure class as an unreachable
    /// session service, since both leave the client without a usable
    /// identity.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SolaceError::session_creation(
                "session service returned an empty identity",
            ));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_token_is_accepted() {
        let id = SessionId::new("sess-42").unwrap();
        assert_eq!(id.as_str(), "sess-42");
        assert_eq!(id.to_string(), "sess-42");
    }

    #[test]
    fn test_blank_tokens_are_rejected() {
        assert!(SessionId::new("").unwrap_err().is_session_creation());
        assert!(SessionId::new("   ").unwrap_err().is_session_creation());
    }
}
