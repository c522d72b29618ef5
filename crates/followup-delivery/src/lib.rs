//! Deferred response delivery for the interactions gateway.
//!
//! The platform gives a handler one synchronous window to answer an
//! interaction. Handlers that cannot finish inside that window are
//! acknowledged immediately with a deferred placeholder, and the real
//! result is pushed later through a follow-up webhook call. This crate
//! decides which of the two paths applies and owns the follow-up push:
//!
//! - [`FollowupDelivery`]: inspects the handler outcome shape and either
//!   returns the result inline or detaches a background delivery task
//! - [`HttpFollowupSender`]: the production PATCH transport
//! - [`BackgroundTasks`]: tracked fire-and-forget task spawning, so hosts
//!   can keep the process alive until detached deliveries finish
//!
//! Delivery is best effort: a fixed four-attempt retry schedule, then
//! silence. The synchronous response has already been sent by the time a
//! follow-up fails, so there is nobody left to tell.

mod background;
mod error;
mod manager;
mod sender;

pub use background::BackgroundTasks;
pub use error::{DeliveryError, DeliveryResult};
pub use manager::{DeliveryDecision, FollowupContext, FollowupDelivery, RETRY_SCHEDULE};
pub use sender::{FollowupRequest, FollowupTransport, HttpFollowupSender};
