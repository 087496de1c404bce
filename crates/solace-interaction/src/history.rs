//! HTTP client for the chat history service.
//!
//! A one-shot `GET {base}/api/chat/{session_id}/history` returning the
//! session's prior transcript as an ordered array of message records.
//! Every failure maps to [`SolaceError::HistoryLoad`]; the caller recovers
//! locally with a fallback transcript, so nothing here is ever surfaced.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use solace_core::error::{Result, SolaceError};
use solace_core::message::Message;
use solace_core::service::HistoryService;
use solace_core::session::SessionId;
use solace_infrastructure::ClientConfig;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// History service client over HTTP.
#[derive(Clone)]
pub struct HttpHistoryService {
    client: Client,
    base_url: String,
}

impl HttpHistoryService {
    /// Creates a client for the given base URL with the default deadline.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request deadline.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(timeout)?,
            base_url: crate::normalize_base_url(&base_url.into()),
        })
    }

    /// Creates a client from the stored configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_timeout(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn endpoint(&self, session_id: &SessionId) -> String {
        format!("{}/api/chat/{}/history", self.base_url, session_id)
    }
}

#[async_trait]
impl HistoryService for HttpHistoryService {
    async fn fetch_history(&self, session_id: &SessionId) -> Result<Vec<Message>> {
        let response = self
            .client
            .get(self.endpoint(session_id))
            .send()
            .await
            .map_err(|err| {
                SolaceError::history_load(format!("history request failed: {err}"))
            })?;

        if !response.status().is_success() {
            return Err(SolaceError::history_load(format!(
                "history service returned status {}",
                response.status()
            )));
        }

        let history: Vec<Message> = response.json().await.map_err(|err| {
            SolaceError::history_load(format!("failed to decode history records: {err}"))
        })?;

        tracing::debug!(
            session_id = %session_id,
            messages = history.len(),
            "chat history loaded"
        );

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::message::MessageRole;

    #[test]
    fn test_endpoint_shape() {
        let service = HttpHistoryService::new("http://localhost:3000").unwrap();
        let id = SessionId::new("s1").unwrap();
        assert_eq!(
            service.endpoint(&id),
            "http://localhost:3000/api/chat/s1/history"
        );
    }

    #[test]
    fn test_history_records_decode() {
        let body = r#"[
            {"role": "user", "content": "hi", "timestamp": "2024-05-01T10:00:00Z"},
            {"role": "assistant", "content": "hello", "timestamp": "2024-05-01T10:00:05Z"}
        ]"#;

        let history: Vec<Message> = serde_json::from_str(body).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[1].role, MessageRole::Assistant);
    }
}
