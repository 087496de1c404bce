//! Append-only transcript store.
//!
//! The transcript is the ordered message history of one active session
//! view. Entries are appended, never mutated, removed, or reordered: append
//! order is display order, and a user message always precedes the assistant
//! (or fallback) message that answers it.

use crate::exchange::AssistantPayload;
use crate::message::{CONNECTIVITY_FALLBACK, HISTORY_LOAD_FALLBACK, Message};

/// Ordered, append-only sequence of messages for one session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// An empty transcript, awaiting a history load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the transcript wholesale with loaded history. Used once, at
    /// session entry.
    pub fn load(&mut self, history: Vec<Message>) {
        self.messages = history;
    }

    /// Replaces the transcript with the single synthesized apology used
    /// when the history load fails, timestamped at load time. The
    /// transcript is never left empty or partial on a failed load.
    pub fn load_fallback(&mut self) {
        self.messages = vec![Message::assistant(HISTORY_LOAD_FALLBACK)];
    }

    /// Appends a user message and returns it for downstream correlation.
    pub fn append_user(&mut self, content: &str) -> Message {
        let message = Message::user(content);
        self.messages.push(message.clone());
        message
    }

    /// Maps an exchange payload to a fully-defaulted assistant message and
    /// appends it.
    pub fn append_assistant(&mut self, payload: AssistantPayload) -> Message {
        let message = payload.into_message();
        self.messages.push(message.clone());
        message
    }

    /// Appends the fixed connectivity apology in place of a reply.
    pub fn append_failure(&mut self) -> Message {
        let message = Message::assistant(CONNECTIVITY_FALLBACK);
        self.messages.push(message.clone());
        message
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{GENERIC_SUPPORT_PROMPT, MessageRole};

    #[test]
    fn test_load_replaces_wholesale() {
        let mut transcript = Transcript::new();
        transcript.append_user("stale");

        transcript.load(vec![Message::assistant("Welcome back.")]);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "Welcome back.");
    }

    #[test]
    fn test_load_fallback_is_a_single_apology() {
        let mut transcript = Transcript::new();
        transcript.load_fallback();

        assert_eq!(transcript.len(), 1);
        let only = &transcript.messages()[0];
        assert_eq!(only.role, MessageRole::Assistant);
        assert_eq!(only.content, HISTORY_LOAD_FALLBACK);
    }

    #[test]
    fn test_appends_preserve_order_and_prior_entries() {
        let mut transcript = Transcript::new();
        let user = transcript.append_user("I had a rough day");
        let before = transcript.messages().to_vec();

        let reply = transcript
            .append_assistant(AssistantPayload::from_body(r#"{"response": "Tell me more."}"#).unwrap());

        assert_eq!(transcript.len(), 2);
        // Earlier entries are untouched by later appends.
        assert_eq!(&transcript.messages()[..1], &before[..]);
        assert_eq!(transcript.messages()[0], user);
        assert_eq!(transcript.messages()[1], reply);
        assert_eq!(reply.content, "Tell me more.");
    }

    #[test]
    fn test_append_assistant_defaults_empty_payload() {
        let mut transcript = Transcript::new();
        let reply = transcript.append_assistant(AssistantPayload::default());
        assert_eq!(reply.content, GENERIC_SUPPORT_PROMPT);
        assert!(reply.metadata.is_some());
    }

    #[test]
    fn test_append_failure_text() {
        let mut transcript = Transcript::new();
        let failure = transcript.append_failure();
        assert_eq!(failure.role, MessageRole::Assistant);
        assert_eq!(failure.content, CONNECTIVITY_FALLBACK);
        assert!(failure.metadata.is_none());
    }
}
