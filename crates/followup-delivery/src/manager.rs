//! The deferred delivery manager.
//!
//! Reconciles the platform's synchronous response deadline with handlers
//! whose computation may be long-running: a handler outcome that is ready
//! in-window is returned inline, a pending one is acknowledged with a
//! deferred placeholder while a detached task drives the follow-up push.

use crate::{BackgroundTasks, FollowupRequest, FollowupTransport};
use command_registry::{CommandFailure, CommandFuture, CommandOutcome, Handler};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Delay after each failed delivery attempt, consumed left-to-right.
///
/// Four attempts total. The trailing zero is the final attempt: no further
/// wait, success or failure.
pub const RETRY_SCHEDULE: [Duration; 4] = [
    Duration::from_secs(1),
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::ZERO,
];

/// Everything needed to address the later follow-up call.
///
/// The token is issued by the platform per interaction and forwarded
/// verbatim; it has no other lifecycle here.
#[derive(Debug, Clone)]
pub struct FollowupContext {
    /// Application id in the webhook path.
    pub app_id: String,
    /// Per-interaction token addressing the original response.
    pub followup_token: String,
    /// Platform API base URL.
    pub api_base_url: String,
}

impl FollowupContext {
    /// Webhook edit endpoint for the original interaction response.
    pub fn followup_url(&self) -> String {
        format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.api_base_url, self.app_id, self.followup_token
        )
    }
}

/// What the manager decided for one command interaction.
///
/// This becomes the dispatcher's response: exactly one of these per
/// handled command.
#[derive(Debug)]
pub enum DeliveryDecision {
    /// Handler produced its result inside the synchronous window.
    Immediate(String),
    /// Handler failed synchronously. Surfaced as a server error, never
    /// retried.
    Failed(CommandFailure),
    /// Result arrives later through the follow-up channel; a background
    /// task has been detached to deliver it.
    Deferred,
}

/// Decides immediate vs. deferred and owns the background delivery tasks.
pub struct FollowupDelivery {
    transport: Arc<dyn FollowupTransport>,
    tasks: Arc<BackgroundTasks>,
}

impl FollowupDelivery {
    /// Create a manager over the given transport.
    pub fn new(transport: Arc<dyn FollowupTransport>) -> Self {
        Self {
            transport,
            tasks: Arc::new(BackgroundTasks::new()),
        }
    }

    /// Handle to the detached-task registry, for hosts that need to keep
    /// the process alive until pending deliveries finish.
    pub fn background_tasks(&self) -> Arc<BackgroundTasks> {
        self.tasks.clone()
    }

    /// Invoke `handler` and decide the response path.
    ///
    /// The decision is made once, from the shape of the outcome: a ready
    /// value is returned inline, a pending future is detached. Elapsed
    /// time plays no part.
    pub fn deliver(&self, handler: &Handler, context: FollowupContext) -> DeliveryDecision {
        match handler.invoke() {
            Err(failure) => DeliveryDecision::Failed(failure),
            Ok(CommandOutcome::Ready(content)) => DeliveryDecision::Immediate(content),
            Ok(CommandOutcome::Pending(future)) => {
                debug!(token = %context.followup_token, "deferring response");
                let transport = self.transport.clone();
                self.tasks
                    .spawn(run_followup(transport, context, future));
                DeliveryDecision::Deferred
            }
        }
    }
}

/// Background half of a deferred delivery: await the handler's result,
/// then push it with bounded retries.
///
/// Exhaustion is silent. The synchronous response has already been sent
/// and cannot be amended, so failure here leaves only the absence of the
/// delayed update.
async fn run_followup(
    transport: Arc<dyn FollowupTransport>,
    context: FollowupContext,
    future: CommandFuture,
) {
    let content = match future.await {
        Ok(content) => content,
        Err(failure) => {
            warn!(
                token = %context.followup_token,
                error = %failure,
                "deferred handler failed, dropping follow-up"
            );
            return;
        }
    };

    let request = FollowupRequest {
        url: context.followup_url(),
        content,
    };

    for (attempt, delay) in RETRY_SCHEDULE.iter().enumerate() {
        match transport.execute(&request).await {
            Ok(()) => {
                info!(
                    token = %context.followup_token,
                    attempt = attempt,
                    "follow-up delivered"
                );
                return;
            }
            Err(e) => {
                warn!(
                    token = %context.followup_token,
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "follow-up attempt failed"
                );
                tokio::time::sleep(*delay).await;
            }
        }
    }

    error!(
        token = %context.followup_token,
        attempts = RETRY_SCHEDULE.len(),
        "follow-up delivery abandoned"
    );
}
