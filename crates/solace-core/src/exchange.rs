//! Assistant exchange payload decoding.
//!
//! The assistant endpoint replies with a JSON object of optional fields, and
//! some deployments wrap that object in a JSON-encoded string requiring one
//! extra decode pass. This module accepts both forms and maps every decoded
//! payload to a fully-defaulted [`Message`] - the reply text falls back
//! through `response`, then `message`, then a fixed supportive prompt, and
//! missing metadata fields take fixed defaults so no message is ever
//! partially populated.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SolaceError};
use crate::message::{
    ConversationAnalysis, Message, MessageMetadata, ProgressSnapshot, GENERIC_SUPPORT_PROMPT,
};

/// A decoded assistant exchange reply. Every field is optional; defaulting
/// happens when the payload is turned into a [`Message`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantPayload {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub metadata: Option<PayloadMetadata>,
    #[serde(default)]
    pub analysis: Option<ConversationAnalysis>,
}

/// Raw metadata block as the exchange endpoint sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    #[serde(default)]
    pub technique: Option<String>,
    #[serde(default)]
    pub current_goal: Option<String>,
    #[serde(default)]
    pub progress: Option<ProgressSnapshot>,
}

impl AssistantPayload {
    /// Decodes a payload from a JSON value, transparently unwrapping the
    /// string-encoded form (a JSON string whose content is itself JSON).
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::ExchangeFormat`] if the value (or the inner
    /// string) is not a decodable payload object.
    pub fn from_value(value: Value) -> Result<Self> {
        let value = match value {
            Value::String(inner) => serde_json::from_str(&inner).map_err(|err| {
                SolaceError::exchange_format(format!(
                    "string-encoded assistant payload is not valid JSON: {err}"
                ))
            })?,
            other => other,
        };

        serde_json::from_value(value).map_err(|err| {
            SolaceError::exchange_format(format!("unrecognized assistant payload shape: {err}"))
        })
    }

    /// Decodes a payload from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::ExchangeFormat`] if the body is not JSON or
    /// does not decode to a payload in either accepted form.
    pub fn from_body(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|err| {
            SolaceError::exchange_format(format!("assistant response body is not JSON: {err}"))
        })?;
        Self::from_value(value)
    }

    /// The reply text after the fallback chain: `response`, then `message`,
    /// then the fixed supportive prompt. Empty and whitespace-only strings
    /// are treated as absent.
    pub fn reply_text(&self) -> &str {
        non_empty(self.response.as_deref())
            .or_else(|| non_empty(self.message.as_deref()))
            .unwrap_or(GENERIC_SUPPORT_PROMPT)
    }

    /// Maps the payload to a fully-defaulted assistant [`Message`],
    /// timestamped now.
    pub fn into_message(self) -> Message {
        let content = self.reply_text().to_string();
        let raw = self.metadata.unwrap_or_default();

        let metadata = MessageMetadata {
            technique: non_empty_owned(raw.technique),
            goal: non_empty_owned(raw.current_goal),
            progress: raw.progress.unwrap_or_default(),
            analysis: self.analysis,
        }
        .normalized();

        Message::assistant(content).with_metadata(metadata)
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

fn non_empty_owned(text: Option<String>) -> String {
    text.filter(|t| !t.trim().is_empty()).unwrap_or_default()
}

impl MessageMetadata {
    /// Replaces empty technique/goal fields with their fixed defaults.
    fn normalized(mut self) -> Self {
        let defaults = MessageMetadata::default();
        if self.technique.is_empty() {
            self.technique = defaults.technique;
        }
        if self.goal.is_empty() {
            self.goal = defaults.goal;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRole;

    #[test]
    fn test_reply_text_fallback_chain() {
        let payload = AssistantPayload::from_body(r#"{"response": "", "message": "Let's talk"}"#)
            .unwrap();
        assert_eq!(payload.reply_text(), "Let's talk");

        let payload = AssistantPayload::from_body(r#"{"response": "Here", "message": "No"}"#)
            .unwrap();
        assert_eq!(payload.reply_text(), "Here");

        let payload = AssistantPayload::from_body("{}").unwrap();
        assert_eq!(payload.reply_text(), GENERIC_SUPPORT_PROMPT);
    }

    #[test]
    fn test_string_encoded_payload_decodes_like_object() {
        let object_form =
            AssistantPayload::from_body(r#"{"response": "Take a breath"}"#).unwrap();

        let string_form = AssistantPayload::from_body(
            r#""{\"response\": \"Take a breath\"}""#,
        )
        .unwrap();

        assert_eq!(object_form.reply_text(), string_form.reply_text());
    }

    #[test]
    fn test_into_message_applies_defaults() {
        let message = AssistantPayload::from_body(r#"{"message": "Hello"}"#)
            .unwrap()
            .into_message();

        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, "Hello");
        let metadata = message.metadata.unwrap();
        assert_eq!(metadata.technique, "supportive");
        assert_eq!(metadata.goal, "Provide support");
        assert_eq!(metadata.progress.emotional_state, "neutral");
        assert_eq!(metadata.progress.risk_level, 0.0);
    }

    #[test]
    fn test_into_message_keeps_reported_metadata() {
        let body = r#"{
            "response": "Let's try reframing that thought.",
            "metadata": {
                "technique": "cbt",
                "currentGoal": "Challenge cognitive distortions",
                "progress": { "emotionalState": "anxious", "riskLevel": 3 }
            },
            "analysis": {
                "emotionalState": "anxious",
                "riskLevel": 3,
                "themes": ["work", "sleep"],
                "recommendedApproach": "cbt",
                "progressIndicators": ["engaged"]
            }
        }"#;

        let message = AssistantPayload::from_body(body).unwrap().into_message();
        let metadata = message.metadata.unwrap();
        assert_eq!(metadata.technique, "cbt");
        assert_eq!(metadata.goal, "Challenge cognitive distortions");
        assert_eq!(metadata.progress.emotional_state, "anxious");
        assert_eq!(metadata.progress.risk_level, 3.0);
        let analysis = metadata.analysis.unwrap();
        assert_eq!(analysis.themes, vec!["work", "sleep"]);
        assert_eq!(analysis.recommended_approach, "cbt");
    }

    #[test]
    fn test_malformed_body_is_a_format_error() {
        let err = AssistantPayload::from_body("not json").unwrap_err();
        assert!(matches!(err, SolaceError::ExchangeFormat(_)));

        // A string that does not contain JSON fails the second decode pass.
        let err = AssistantPayload::from_body(r#""plain text reply""#).unwrap_err();
        assert!(matches!(err, SolaceError::ExchangeFormat(_)));
    }
}
