//! Wire types for the interaction protocol.
//!
//! Numeric discriminants follow the platform's v10 API. Only the fields
//! needed to route are decoded; everything else in a payload is ignored.

use serde::{Deserialize, Serialize};

/// Interaction `type`: liveness probe.
pub const INTERACTION_PING: i64 = 1;
/// Interaction `type`: user-invoked application command.
pub const INTERACTION_APPLICATION_COMMAND: i64 = 2;

/// Response `type`: reply to a liveness probe.
pub const RESPONSE_PONG: u8 = 1;
/// Response `type`: immediate message result.
pub const RESPONSE_CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
/// Response `type`: deferred acknowledgment, real result follows later.
pub const RESPONSE_DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE: u8 = 5;

/// Raw decoded payload, before classification.
#[derive(Debug, Deserialize)]
struct RawInteraction {
    #[serde(rename = "type")]
    kind: i64,
    #[serde(default)]
    data: Option<RawCommandData>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCommandData {
    name: String,
}

/// One classified interaction callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Liveness probe; answered with a fixed pong.
    Ping,
    /// User-invoked command, with the token addressing its follow-up.
    ApplicationCommand {
        name: String,
        followup_token: String,
    },
    /// A type this gateway does not route.
    Unknown(i64),
}

impl Interaction {
    /// Classify a raw JSON payload.
    ///
    /// `None` means the payload cannot be routed at all: unparseable JSON,
    /// or a command payload missing the name or token routing needs.
    /// Deeper payload validation is out of scope here.
    pub fn classify(raw_body: &[u8]) -> Option<Interaction> {
        let raw: RawInteraction = serde_json::from_slice(raw_body).ok()?;
        match raw.kind {
            INTERACTION_PING => Some(Interaction::Ping),
            INTERACTION_APPLICATION_COMMAND => {
                let name = raw.data?.name;
                let followup_token = raw.token?;
                Some(Interaction::ApplicationCommand {
                    name,
                    followup_token,
                })
            }
            other => Some(Interaction::Unknown(other)),
        }
    }
}

/// JSON envelope of an interaction response.
#[derive(Debug, Serialize)]
struct ResponseEnvelope {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ResponseData>,
}

#[derive(Debug, Serialize)]
struct ResponseData {
    content: String,
}

/// Body of the one response artifact produced per accepted request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// JSON interaction response envelope.
    Json(serde_json::Value),
    /// Plain-text diagnostic body.
    Text(&'static str),
    /// No body (silently-dropped interaction).
    Empty,
}

/// The response the host writes back for one interaction callback.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: ResponseBody,
}

impl GatewayResponse {
    fn json(status: u16, envelope: ResponseEnvelope) -> Self {
        let value = serde_json::to_value(envelope)
            .expect("response envelope serialization cannot fail");
        Self {
            status,
            body: ResponseBody::Json(value),
        }
    }

    /// `200 {"type": 1}`: reply to an authenticated liveness probe.
    pub fn pong() -> Self {
        Self::json(
            200,
            ResponseEnvelope {
                kind: RESPONSE_PONG,
                data: None,
            },
        )
    }

    /// `200 {"type": 4, "data": {"content": ...}}`: immediate command
    /// result.
    pub fn message(content: String) -> Self {
        Self::json(
            200,
            ResponseEnvelope {
                kind: RESPONSE_CHANNEL_MESSAGE_WITH_SOURCE,
                data: Some(ResponseData { content }),
            },
        )
    }

    /// `200 {"type": 5}`: deferred acknowledgment; the result follows
    /// through the follow-up channel.
    pub fn deferred() -> Self {
        Self::json(
            200,
            ResponseEnvelope {
                kind: RESPONSE_DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE,
                data: None,
            },
        )
    }

    /// `401 Unable to verify`: signature verification failed.
    pub fn unauthorized() -> Self {
        Self {
            status: 401,
            body: ResponseBody::Text("Unable to verify"),
        }
    }

    /// `404 Command handler not found`: authenticated command with no
    /// registered handler.
    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: ResponseBody::Text("Command handler not found"),
        }
    }

    /// `404` with no body: interaction type this gateway does not route.
    pub fn unroutable() -> Self {
        Self {
            status: 404,
            body: ResponseBody::Empty,
        }
    }

    /// `500 Command handler failed`: handler failed inside the
    /// synchronous window.
    pub fn server_error() -> Self {
        Self {
            status: 500,
            body: ResponseBody::Text("Command handler failed"),
        }
    }
}
