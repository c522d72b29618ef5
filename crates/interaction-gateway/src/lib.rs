//! Interaction authentication and dispatch engine.
//!
//! The platform delivers signed HTTP callbacks representing either a
//! liveness probe or a user-invoked command. This crate is the server-side
//! half of that protocol: it authenticates every callback, routes command
//! callbacks to their registered handler, and acknowledges handlers that
//! cannot answer inside the synchronous window immediately while a
//! detached task delivers the real result through the follow-up channel.
//!
//! ## Overview
//!
//! ```text
//! raw request ──► SignatureVerifier ──► classify ──► route
//!                      │ bad                │ unknown      │
//!                      ▼                    ▼              ▼
//!                 401 "Unable          404 (dropped)   CommandRegistry
//!                  to verify"                              │
//!                                                          ▼
//!                                                  FollowupDelivery
//!                                                  immediate / deferred
//! ```
//!
//! Every accepted request yields exactly one [`GatewayResponse`]. The
//! gateway never deduplicates redeliveries; at-least-once semantics are
//! inherited from the platform.
//!
//! ## Example
//!
//! ```ignore
//! use interaction_gateway::InteractionGateway;
//! use command_registry::CommandOutcome;
//! use gateway_config::GatewayConfig;
//!
//! let config = GatewayConfig::from_env()?;
//! let mut gateway = InteractionGateway::new(&config);
//! gateway
//!     .command("greet", || Ok(CommandOutcome::Ready("hello".into())))?
//!     .command("slow", || {
//!         Ok(CommandOutcome::pending(async {
//!             Ok(expensive_work().await)
//!         }))
//!     })?;
//! gateway.activate();
//! // hand `gateway.handle(...)` to the HTTP host
//! ```

mod messages;

pub use messages::{
    GatewayResponse, Interaction, ResponseBody, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING,
    RESPONSE_CHANNEL_MESSAGE_WITH_SOURCE, RESPONSE_DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE,
    RESPONSE_PONG,
};

pub use command_registry::{
    CommandFailure, CommandHandler, CommandOutcome, RegistryError, RegistryResult,
};

use command_registry::CommandRegistry;
use followup_delivery::{
    BackgroundTasks, DeliveryDecision, FollowupContext, FollowupDelivery, FollowupTransport,
    HttpFollowupSender,
};
use gateway_config::GatewayConfig;
use interaction_verify::SignatureVerifier;
use std::sync::Arc;
use tracing::{debug, error};

/// The pieces of one HTTP callback the host hands to the gateway.
///
/// A missing header or unreadable body is handled as a verification
/// failure, not a separate error path.
#[derive(Debug)]
pub struct InboundRequest<'a> {
    /// Raw request body bytes, exactly as received.
    pub raw_body: &'a [u8],
    /// `x-signature-ed25519` header, if present.
    pub signature: Option<&'a str>,
    /// `x-signature-timestamp` header, if present.
    pub timestamp: Option<&'a str>,
}

/// The interaction dispatch engine.
///
/// Wire up commands with [`command`], switch to serving with
/// [`activate`], then call [`handle`] once per inbound callback. After
/// activation the gateway is read-only and can be shared across request
/// tasks behind an `Arc`.
///
/// [`command`]: InteractionGateway::command
/// [`activate`]: InteractionGateway::activate
/// [`handle`]: InteractionGateway::handle
pub struct InteractionGateway {
    verifier: SignatureVerifier,
    registry: CommandRegistry,
    delivery: FollowupDelivery,
    app_id: String,
    api_base_url: String,
}

impl InteractionGateway {
    /// Create a gateway that delivers follow-ups over HTTP.
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpFollowupSender::new()))
    }

    /// Create a gateway over a custom follow-up transport.
    pub fn with_transport(config: &GatewayConfig, transport: Arc<dyn FollowupTransport>) -> Self {
        Self {
            verifier: SignatureVerifier::new(&config.public_key),
            registry: CommandRegistry::new(),
            delivery: FollowupDelivery::new(transport),
            app_id: config.app_id.clone(),
            api_base_url: config.api_base_url.clone(),
        }
    }

    /// Register a command handler. Chainable; fails with
    /// [`RegistryError::RegistrationClosed`] after [`activate`].
    ///
    /// [`activate`]: InteractionGateway::activate
    pub fn command(
        &mut self,
        name: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> RegistryResult<&mut Self> {
        self.registry.register(name, Arc::new(handler))?;
        Ok(self)
    }

    /// Freeze the registry and begin accepting traffic. One-way; calling
    /// it again is a no-op.
    pub fn activate(&mut self) {
        self.registry.freeze();
    }

    /// Whether [`activate`] has been called.
    ///
    /// [`activate`]: InteractionGateway::activate
    pub fn is_active(&self) -> bool {
        self.registry.is_frozen()
    }

    /// Handle to the detached follow-up tasks, so the host can keep the
    /// process alive until pending deliveries finish.
    pub fn background_tasks(&self) -> Arc<BackgroundTasks> {
        self.delivery.background_tasks()
    }

    /// Process one interaction callback into exactly one response.
    ///
    /// Must run inside a tokio runtime: deferred handlers detach their
    /// delivery task here.
    pub fn handle(&self, request: InboundRequest<'_>) -> GatewayResponse {
        let (Some(signature), Some(timestamp)) = (request.signature, request.timestamp) else {
            debug!("missing signature headers");
            return GatewayResponse::unauthorized();
        };
        if !self.verifier.verify(signature, timestamp, request.raw_body) {
            debug!("signature verification failed");
            return GatewayResponse::unauthorized();
        }

        let Some(interaction) = Interaction::classify(request.raw_body) else {
            debug!("unroutable payload, dropping");
            return GatewayResponse::unroutable();
        };

        match interaction {
            Interaction::Ping => GatewayResponse::pong(),
            Interaction::Unknown(kind) => {
                debug!(kind, "unroutable interaction type, dropping");
                GatewayResponse::unroutable()
            }
            Interaction::ApplicationCommand {
                name,
                followup_token,
            } => self.handle_command(&name, followup_token),
        }
    }

    fn handle_command(&self, name: &str, followup_token: String) -> GatewayResponse {
        let Some(handler) = self.registry.lookup(name) else {
            debug!(command = %name, "no handler registered");
            return GatewayResponse::not_found();
        };

        let context = FollowupContext {
            app_id: self.app_id.clone(),
            followup_token,
            api_base_url: self.api_base_url.clone(),
        };

        match self.delivery.deliver(&handler, context) {
            DeliveryDecision::Immediate(content) => {
                debug!(command = %name, "immediate response");
                GatewayResponse::message(content)
            }
            DeliveryDecision::Deferred => {
                debug!(command = %name, "deferred response");
                GatewayResponse::deferred()
            }
            DeliveryDecision::Failed(failure) => {
                error!(command = %name, error = %failure, "handler failed synchronously");
                GatewayResponse::server_error()
            }
        }
    }
}
