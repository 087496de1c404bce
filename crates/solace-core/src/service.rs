//! Contracts for the remote collaborators.
//!
//! These traits decouple the controller from any specific transport. The
//! production implementations live in `solace-interaction` (HTTP); tests
//! supply in-memory mocks.

use async_trait::async_trait;

use crate::error::Result;
use crate::exchange::AssistantPayload;
use crate::message::Message;
use crate::session::SessionId;

/// The chat history service: a one-shot fetch of a session's prior
/// transcript.
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Fetches the ordered message history for a session.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Message>)`: the prior transcript (possibly empty)
    /// - `Err(_)`: the history could not be loaded; the caller recovers
    ///   with a fallback transcript and never surfaces this error
    async fn fetch_history(&self, session_id: &SessionId) -> Result<Vec<Message>>;
}

/// The session-creation service: mints a new server-side conversation.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Creates a new session and returns its identity.
    ///
    /// # Returns
    ///
    /// - `Ok(SessionId)`: a freshly minted, validated identity
    /// - `Err(_)`: the service was unreachable or returned an invalid
    ///   identity ([`crate::SolaceError::SessionCreation`])
    async fn create_session(&self) -> Result<SessionId>;
}

/// The assistant exchange endpoint: one request, one reply.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Sends one user message for the given session and returns the decoded
    /// reply payload.
    ///
    /// # Returns
    ///
    /// - `Ok(AssistantPayload)`: the decoded reply (fields may be absent;
    ///   defaulting happens on append)
    /// - `Err(_)`: transport failure, non-success status, or an
    ///   undecodable payload
    async fn send_message(&self, session_id: &SessionId, message: &str)
        -> Result<AssistantPayload>;
}
