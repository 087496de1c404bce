//! HTTP client for the session-creation service.
//!
//! `POST {base}/api/chat/sessions` mints a new server-side conversation and
//! returns its identity. The minted token is validated before adoption;
//! an unreachable service or an invalid token both map to
//! [`SolaceError::SessionCreation`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use solace_core::error::{Result, SolaceError};
use solace_core::service::SessionService;
use solace_core::session::SessionId;
use solace_infrastructure::ClientConfig;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Session-creation client over HTTP.
#[derive(Clone)]
pub struct HttpSessionService {
    client: Client,
    base_url: String,
}

impl HttpSessionService {
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

    fn endpoint(&self) -> String {
        format!("{}/api/chat/sessions", self.base_url)
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    async fn create_session(&self) -> Result<SessionId> {
        let response = self
            .client
            .post(self.endpoint())
            .send()
            .await
            .map_err(|err| {
                SolaceError::session_creation(format!("session creation request failed: {err}"))
            })?;

        if !response.status().is_success() {
            return Err(SolaceError::session_creation(format!(
                "session service returned status {}",
                response.status()
            )));
        }

        let minted: CreateSessionResponse = response.json().await.map_err(|err| {
            SolaceError::session_creation(format!("failed to decode session identity: {err}"))
        })?;

        let token = minted
            .token()
            .ok_or_else(|| SolaceError::session_creation("session service returned no identity"))?;

        let session_id = SessionId::new(token)?;
        tracing::info!(session_id = %session_id, "new chat session minted");
        Ok(session_id)
    }
}

/// Wire shape of the creation reply. `sessionId` is canonical; `id` is
/// accepted as a fallback field name.
#[derive(Deserialize)]
struct CreateSessionResponse {
    #[serde(rename = "sessionId", default)]
    session_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl CreateSessionResponse {
    fn token(self) -> Option<String> {
        self.session_id.or(self.id)
    }
}
