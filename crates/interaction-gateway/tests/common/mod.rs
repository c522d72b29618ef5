//! Shared helpers for gateway integration tests.
//!
//! Fabricates signed requests the way the platform does (Ed25519 over
//! `timestamp ++ raw_body`) and records outbound follow-up attempts.

#![allow(dead_code)]

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use followup_delivery::{DeliveryError, DeliveryResult, FollowupRequest, FollowupTransport};
use gateway_config::GatewayConfig;
use interaction_gateway::{InboundRequest, InteractionGateway};
use std::sync::{Arc, Mutex};

/// App id used by every test gateway.
pub const TEST_APP_ID: &str = "app-123";

/// Signs request bodies with a fixed keypair.
pub struct RequestSigner {
    signing_key: SigningKey,
    pub public_key_hex: String,
}

impl RequestSigner {
    pub fn new() -> Self {
        let signing_key = SigningKey::from_bytes(&[42u8; 32]);
        let public_key_hex = hex::encode(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            public_key_hex,
        }
    }

    /// Sign `timestamp ++ raw_body`, hex-encoded.
    pub fn sign(&self, timestamp: &str, raw_body: &[u8]) -> String {
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(raw_body);
        hex::encode(self.signing_key.sign(&message).to_bytes())
    }
}

/// A signed request ready to hand to the gateway.
pub struct SignedRequest {
    pub body: Vec<u8>,
    pub signature: String,
    pub timestamp: String,
}

impl SignedRequest {
    pub fn new(signer: &RequestSigner, body: &serde_json::Value) -> Self {
        let body = serde_json::to_vec(body).unwrap();
        let timestamp = "12345".to_string();
        let signature = signer.sign(&timestamp, &body);
        Self {
            body,
            signature,
            timestamp,
        }
    }

    /// Same body, but signed over a different timestamp than the one sent.
    pub fn with_bad_signature(signer: &RequestSigner, body: &serde_json::Value) -> Self {
        let body = serde_json::to_vec(body).unwrap();
        let timestamp = "12345".to_string();
        let signature = signer.sign("67890", &body);
        Self {
            body,
            signature,
            timestamp,
        }
    }

    pub fn as_inbound(&self) -> InboundRequest<'_> {
        InboundRequest {
            raw_body: &self.body,
            signature: Some(&self.signature),
            timestamp: Some(&self.timestamp),
        }
    }
}

/// Transport that records every attempt and fails the first `fail_first`
/// of them with a 500.
pub struct RecordingTransport {
    fail_first: usize,
    attempts: Mutex<Vec<FollowupRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Self::failing_first(0)
    }

    pub fn failing_first(fail_first: usize) -> Arc<Self> {
        Arc::new(Self {
            fail_first,
            attempts: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> Vec<FollowupRequest> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl FollowupTransport for RecordingTransport {
    async fn execute(&self, request: &FollowupRequest) -> DeliveryResult<()> {
        let mut attempts = self.attempts.lock().unwrap();
        attempts.push(request.clone());
        if attempts.len() <= self.fail_first {
            Err(DeliveryError::Status(500))
        } else {
            Ok(())
        }
    }
}

/// Gateway wired to the signer's key and a recording transport.
pub fn test_gateway(
    signer: &RequestSigner,
    transport: Arc<RecordingTransport>,
) -> InteractionGateway {
    let config = GatewayConfig::new(signer.public_key_hex.clone(), TEST_APP_ID);
    InteractionGateway::with_transport(&config, transport)
}
