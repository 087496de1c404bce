//! Transcript message types.
//!
//! This module contains types for representing messages in a therapy chat
//! transcript, including roles, therapeutic metadata, and the fixed texts
//! used when a remote collaborator fails or returns nothing usable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed reply shown when the chat history cannot be loaded.
pub const HISTORY_LOAD_FALLBACK: &str =
    "I apologize, but I'm having trouble loading the chat session. Please try refreshing the page.";

/// Fixed reply appended when the assistant exchange fails.
pub const CONNECTIVITY_FALLBACK: &str =
    "I apologize, but I'm having trouble connecting right now. Please try again in a moment.";

/// Fixed reply used when an assistant payload carries no usable text.
pub const GENERIC_SUPPORT_PROMPT: &str =
    "I'm here to support you. Could you tell me more about what's on your mind?";

/// Default therapeutic technique applied when the assistant reports none.
pub const DEFAULT_TECHNIQUE: &str = "supportive";
/// Default session goal applied when the assistant reports none.
pub const DEFAULT_GOAL: &str = "Provide support";
/// Default emotional state applied when the assistant reports none.
pub const DEFAULT_EMOTIONAL_STATE: &str = "neutral";

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message authored by the user.
    User,
    /// Message from the assistant (or synthesized locally in its place).
    Assistant,
}

/// A point-in-time view of the user's emotional progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    #[serde(default = "default_emotional_state")]
    pub emotional_state: String,
    #[serde(default)]
    pub risk_level: f64,
}

fn default_emotional_state() -> String {
    DEFAULT_EMOTIONAL_STATE.to_string()
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            emotional_state: default_emotional_state(),
            risk_level: 0.0,
        }
    }
}

/// Optional deeper analysis attached by the assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAnalysis {
    #[serde(default)]
    pub emotional_state: String,
    #[serde(default)]
    pub risk_level: f64,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub recommended_approach: String,
    #[serde(default)]
    pub progress_indicators: Vec<String>,
}

/// Therapeutic metadata carried by assistant messages.
///
/// Every field has a fixed default so a message is never left partially
/// populated, whatever the remote payload omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    pub technique: String,
    pub goal: String,
    pub progress: ProgressSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ConversationAnalysis>,
}

impl Default for MessageMetadata {
    fn default() -> Self {
        Self {
            technique: DEFAULT_TECHNIQUE.to_string(),
            goal: DEFAULT_GOAL.to_string(),
            progress: ProgressSnapshot::default(),
            analysis: None,
        }
    }
}

/// A single message in a chat transcript.
///
/// Messages are immutable once appended: the transcript only ever grows,
/// and entries are never edited or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
    /// Therapeutic metadata (assistant messages only, and not always).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    /// Creates a user message timestamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Creates an assistant message timestamped now, without metadata.
    ///
    /// Used for locally synthesized entries (load fallback, connectivity
    /// apology) where no therapeutic metadata exists.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    /// Attaches metadata to the message.
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_string(&MessageRole::User).unwrap(),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata = MessageMetadata::default();
        assert_eq!(metadata.technique, "supportive");
        assert_eq!(metadata.goal, "Provide support");
        assert_eq!(metadata.progress.emotional_state, "neutral");
        assert_eq!(metadata.progress.risk_level, 0.0);
        assert!(metadata.analysis.is_none());
    }

    #[test]
    fn test_history_record_round_trip() {
        let record = serde_json::json!({
            "role": "assistant",
            "content": "Welcome back.",
            "timestamp": "2024-05-01T10:00:00Z",
            "metadata": {
                "technique": "cbt",
                "goal": "Reframe negative thoughts",
                "progress": { "emotionalState": "calm", "riskLevel": 1 }
            }
        });

        let message: Message = serde_json::from_value(record).unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, "Welcome back.");
        let metadata = message.metadata.unwrap();
        assert_eq!(metadata.technique, "cbt");
        assert_eq!(metadata.progress.risk_level, 1.0);
    }

    #[test]
    fn test_partial_progress_fills_defaults() {
        let record = serde_json::json!({
            "role": "assistant",
            "content": "Hello",
            "timestamp": "2024-05-01T10:00:00Z",
            "metadata": {
                "technique": "supportive",
                "goal": "Provide support",
                "progress": { "riskLevel": 2 }
            }
        });

        let message: Message = serde_json::from_value(record).unwrap();
        let progress = message.metadata.unwrap().progress;
        assert_eq!(progress.emotional_state, "neutral");
        assert_eq!(progress.risk_level, 2.0);
    }
}
