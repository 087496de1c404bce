//! Remote collaborators for the Solace chat client.
//!
//! HTTP implementations of the core service contracts: the assistant
//! exchange endpoint, the history service, and the session-creation
//! service. All clients share the same base URL from [`ClientConfig`] and
//! carry a request deadline on the underlying `reqwest` client.

pub mod assistant;
pub mod history;
pub mod session;

pub use assistant::HttpAssistantService;
pub use history::HttpHistoryService;
pub use session::HttpSessionService;

use std::time::Duration;

use solace_core::{Result, SolaceError};
use solace_infrastructure::ClientConfig;

/// Builds a reqwest client with the configured exchange deadline.
fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| SolaceError::internal(format!("failed to build HTTP client: {err}")))
}

/// Trims a trailing slash so endpoint paths can be joined uniformly.
fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Constructs all three service clients from one configuration.
pub fn services_from_config(
    config: &ClientConfig,
) -> Result<(HttpAssistantService, HttpHistoryService, HttpSessionService)> {
    Ok((
        HttpAssistantService::from_config(config)?,
        HttpHistoryService::from_config(config)?,
        HttpSessionService::from_config(config)?,
    ))
}
