//! HTTP client for the assistant exchange endpoint.
//!
//! One request per user message: `POST {base}/api/chat/{session_id}` with
//! `{"message": text}`. The reply may be a JSON object or a JSON-encoded
//! string; both forms are accepted transparently (the decode lives in
//! `solace_core::exchange`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use solace_core::error::{Result, SolaceError};
use solace_core::exchange::AssistantPayload;
use solace_core::service::AssistantService;
use solace_core::session::SessionId;
use solace_infrastructure::ClientConfig;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Assistant exchange client over HTTP.
#[derive(Clone)]
pub struct HttpAssistantService {
    client: Client,
    base_url: String,
}

impl HttpAssistantService {
    /// Creates a client for the given base URL with the default deadline.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit exchange deadline. A hung remote
    /// call surfaces as a retryable transport error instead of leaving the
    /// pipeline busy indefinitely.
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
        format!("{}/api/chat/{}", self.base_url, session_id)
    }
}

#[async_trait]
impl AssistantService for HttpAssistantService {
    async fn send_message(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> Result<AssistantPayload> {
        let request = ExchangeRequest { message };

        let response = self
            .client
            .post(self.endpoint(session_id))
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                SolaceError::exchange_transport(
                    None,
                    format!("assistant exchange request failed: {err}"),
                    err.is_connect() || err.is_timeout(),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read assistant error body".to_string());
            return Err(map_http_error(status, body));
        }

        let body = response.text().await.map_err(|err| {
            SolaceError::exchange_transport(
                None,
                format!("failed to read assistant response body: {err}"),
                err.is_timeout(),
            )
        })?;

        tracing::debug!(session_id = %session_id, bytes = body.len(), "assistant reply received");

        AssistantPayload::from_body(&body)
    }
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_http_error(status: StatusCode, body: String) -> SolaceError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    SolaceError::exchange_transport(Some(status.as_u16()), message, retryable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        let service = HttpAssistantService::new("http://localhost:3000/").unwrap();
        let id = SessionId::new("abc").unwrap();
        assert_eq!(service.endpoint(&id), "http://localhost:3000/api/chat/abc");
    }

    #[test]
    fn test_http_error_mapping() {
        let err = map_http_error(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error": {"message": "maintenance"}}"#.to_string(),
        );
        match err {
            SolaceError::ExchangeTransport {
                status_code,
                message,
                retryable,
            } => {
                assert_eq!(status_code, Some(503));
                assert_eq!(message, "maintenance");
                assert!(retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = map_http_error(StatusCode::NOT_FOUND, "gone".to_string());
        assert!(!err.is_retryable());
    }
}
