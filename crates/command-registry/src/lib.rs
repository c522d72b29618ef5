//! Command registration for the interactions gateway.
//!
//! Owns the mapping from command name to handler and its one-way
//! open-then-closed lifecycle: handlers are registered while the gateway is
//! being wired up, the registry freezes the moment the gateway starts
//! accepting traffic, and any registration afterwards is a setup bug
//! surfaced as [`RegistryError::RegistrationClosed`].
//!
//! The [`CommandHandler`] contract also lives here. A handler reports
//! completion as a [`CommandOutcome`]: either the result string is ready
//! within the synchronous response window, or it is pending behind a future
//! that the delivery layer drives to completion in the background.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Errors from command registration.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Registration attempted after the registry was frozen.
    #[error("Command registration is closed, register commands before activation")]
    RegistrationClosed,
}

/// Result type alias using RegistryError.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A command handler failed to produce its result.
#[derive(Error, Debug, Clone)]
#[error("Command handler failed: {0}")]
pub struct CommandFailure(pub String);

impl CommandFailure {
    /// Build a failure from any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }
}

/// Future type for handlers whose result arrives after the synchronous
/// response window.
pub type CommandFuture = Pin<Box<dyn Future<Output = Result<String, CommandFailure>> + Send>>;

/// How a handler reports completion.
///
/// The delivery layer decides immediate-vs-deferred from this shape alone.
/// A handler that resolves instantly but declares itself `Pending` is still
/// treated as deferred; nothing races a timer.
pub enum CommandOutcome {
    /// The result is available within the synchronous response window.
    Ready(String),
    /// The result requires further computation. It is delivered through
    /// the follow-up channel once the future resolves.
    Pending(CommandFuture),
}

impl CommandOutcome {
    /// Wrap a future as a pending outcome.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<String, CommandFailure>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }
}

impl std::fmt::Debug for CommandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(content) => f.debug_tuple("Ready").field(content).finish(),
            Self::Pending(_) => f.debug_tuple("Pending").finish(),
        }
    }
}

/// A registered command callback.
///
/// Handlers take no arguments and produce a result string either
/// immediately or behind a pending future. Implemented for any matching
/// closure, so registration sites stay terse.
pub trait CommandHandler: Send + Sync {
    /// Invoke the handler once for an incoming command interaction.
    ///
    /// An `Err` here is a synchronous handler failure: the caller maps it
    /// to a server error and never retries it.
    fn invoke(&self) -> Result<CommandOutcome, CommandFailure>;
}

impl<F> CommandHandler for F
where
    F: Fn() -> Result<CommandOutcome, CommandFailure> + Send + Sync,
{
    fn invoke(&self) -> Result<CommandOutcome, CommandFailure> {
        (self)()
    }
}

/// Shared handle to a registered handler.
pub type Handler = Arc<dyn CommandHandler>;

/// Registry lifecycle state.
enum RegistryState {
    /// Accepting registrations (gateway not yet live).
    Open(HashMap<String, Handler>),
    /// Read-only (gateway accepting traffic). Lookups need no locking.
    Frozen(Arc<HashMap<String, Handler>>),
}

/// The mapping from command name to handler.
///
/// Mutated only during setup, then frozen exactly once before concurrent
/// request handling begins. Lookups work in both states; registration only
/// while open.
pub struct CommandRegistry {
    state: RegistryState,
}

impl CommandRegistry {
    /// Create an empty, open registry.
    pub fn new() -> Self {
        Self {
            state: RegistryState::Open(HashMap::new()),
        }
    }

    /// Register a handler under `name`.
    ///
    /// Re-registering a name replaces the previous handler (last write
    /// wins). Fails with [`RegistryError::RegistrationClosed`] once the
    /// registry is frozen.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> RegistryResult<()> {
        match &mut self.state {
            RegistryState::Open(handlers) => {
                let name = name.into();
                if handlers.insert(name.clone(), handler).is_some() {
                    tracing::debug!(command = %name, "replaced existing handler");
                }
                Ok(())
            }
            RegistryState::Frozen(_) => Err(RegistryError::RegistrationClosed),
        }
    }

    /// Freeze the registry. One-way transition; calling it again is a
    /// no-op.
    pub fn freeze(&mut self) {
        if let RegistryState::Open(handlers) = &mut self.state {
            let handlers = std::mem::take(handlers);
            tracing::debug!(commands = handlers.len(), "command registry frozen");
            self.state = RegistryState::Frozen(Arc::new(handlers));
        }
    }

    /// Whether the registry has been frozen.
    pub fn is_frozen(&self) -> bool {
        matches!(self.state, RegistryState::Frozen(_))
    }

    /// Look up a handler by command name.
    ///
    /// `None` means the platform invoked a command this process never
    /// wired up. That is a normal outcome, not a defect.
    pub fn lookup(&self, name: &str) -> Option<Handler> {
        let handlers = match &self.state {
            RegistryState::Open(handlers) => handlers,
            RegistryState::Frozen(handlers) => handlers.as_ref(),
        };
        handlers.get(name).cloned()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        match &self.state {
            RegistryState::Open(handlers) => handlers.len(),
            RegistryState::Frozen(handlers) => handlers.len(),
        }
    }

    /// Whether the registry has no commands.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
