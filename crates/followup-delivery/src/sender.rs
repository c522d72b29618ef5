//! Follow-up transport: the outbound PATCH that updates the original
//! interaction response.

use crate::{DeliveryError, DeliveryResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// One outbound follow-up call, fully addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowupRequest {
    /// Webhook edit endpoint for the original interaction response.
    pub url: String,
    /// The resolved handler result to publish.
    pub content: String,
}

/// JSON body of the follow-up call.
#[derive(Debug, Serialize)]
struct FollowupBody<'a> {
    content: &'a str,
}

/// Transport seam for issuing follow-up calls.
///
/// The retry loop treats any error as a failed attempt; implementations
/// decide what counts as success. Tests substitute a recording
/// implementation here.
#[async_trait]
pub trait FollowupTransport: Send + Sync {
    /// Execute a single delivery attempt.
    async fn execute(&self, request: &FollowupRequest) -> DeliveryResult<()>;
}

/// reqwest-backed production transport.
///
/// Timeout semantics are the client's defaults; the retry schedule is the
/// only explicit time bound on delivery.
pub struct HttpFollowupSender {
    client: Client,
}

impl HttpFollowupSender {
    /// Create a sender with a default HTTP client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpFollowupSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FollowupTransport for HttpFollowupSender {
    async fn execute(&self, request: &FollowupRequest) -> DeliveryResult<()> {
        debug!(url = %request.url, "sending follow-up");

        let response = self
            .client
            .patch(&request.url)
            .header("Content-Type", "application/json")
            .json(&FollowupBody {
                content: &request.content,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }
        Ok(())
    }
}
