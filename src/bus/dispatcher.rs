//! The routing engine - synchronous and asynchronous send paths.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::executor::TaskExecutor;
use crate::handler::{AsyncHandler, HandlerError, SyncHandler};
use crate::message::{Message, MessageId, SyncResult};

/// Error type for synchronous sends.
///
/// Distinguishes "no one can answer this" from "the answerer failed" so
/// callers can react differently to the two.
#[derive(Debug)]
pub enum SendError {
    /// No synchronous handler is registered for the message id. The
    /// caller is blocking for a result it will not get, so this is an
    /// error - unlike the asynchronous no-subscriber case.
    UnsupportedMessage(MessageId),
    /// The handler answered with an error; it propagates unchanged.
    Handler(HandlerError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::UnsupportedMessage(id) => {
                write!(f, "no synchronous handler registered for {}", id)
            }
            SendError::Handler(e) => write!(f, "handler failed: {}", e),
        }
    }
}

impl Error for SendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SendError::Handler(e) => Some(e),
            SendError::UnsupportedMessage(_) => None,
        }
    }
}

impl From<HandlerError> for SendError {
    fn from(err: HandlerError) -> Self {
        SendError::Handler(err)
    }
}

pub(crate) struct SyncRoute {
    pub(crate) name: &'static str,
    pub(crate) handler: Arc<dyn SyncHandler>,
}

pub(crate) struct AsyncRoute {
    pub(crate) name: &'static str,
    pub(crate) handler: Arc<dyn AsyncHandler>,
}

/// The in-process domain message bus.
///
/// Routes messages to handlers by the capability they declared at
/// construction. The bus is stateless with respect to message history;
/// once built it only routes.
///
/// Delivery is best effort and in-memory: nothing is persisted, nothing
/// crosses a process boundary, and no ordering holds between different
/// messages. Asynchronous handlers of one message are *submitted* in
/// registration order but complete in whatever order the worker threads
/// get to them - a consumer needing causal ordering between sub-steps
/// must sequence them inside a single handler.
pub struct DomainBus {
    sync_routes: HashMap<MessageId, SyncRoute>,
    async_routes: HashMap<MessageId, Vec<AsyncRoute>>,
    executor: Arc<dyn TaskExecutor>,
}

impl DomainBus {
    /// Start collecting handlers for a new bus.
    pub fn builder() -> super::BusBuilder {
        super::BusBuilder::new()
    }

    pub(crate) fn new(
        sync_routes: HashMap<MessageId, SyncRoute>,
        async_routes: HashMap<MessageId, Vec<AsyncRoute>>,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        DomainBus {
            sync_routes,
            async_routes,
            executor,
        }
    }

    /// Send a message and block until its single synchronous handler
    /// answers.
    ///
    /// The handler runs inline on the calling thread. Its result is
    /// returned verbatim; its error propagates unchanged inside
    /// [`SendError::Handler`]. When no handler is registered for the id
    /// the call fails with [`SendError::UnsupportedMessage`] and has no
    /// side effects.
    pub fn send_sync(&self, message: Message) -> Result<SyncResult, SendError> {
        let message_id = message.id();
        let route = self
            .sync_routes
            .get(&message_id)
            .ok_or(SendError::UnsupportedMessage(message_id))?;

        tracing::debug!(
            message_id = %message_id,
            handler = route.name,
            "dispatching synchronous message"
        );
        route.handler.receive_sync(&message).map_err(SendError::Handler)
    }

    /// Send a message to every asynchronous handler subscribed to its id,
    /// without waiting for any of them.
    ///
    /// One unit of work per handler is submitted to the execution
    /// substrate, in registration order; the call returns as soon as
    /// submission completes. A handler failure is caught inside its task,
    /// logged with full context and discarded - it never reaches the
    /// producer and never stops sibling handlers.
    ///
    /// Zero subscribers is a valid steady state, not an error: the
    /// message is dropped and a warning is logged.
    pub fn send_async(&self, message: Message) {
        let message_id = message.id();
        let routes = match self.async_routes.get(&message_id) {
            Some(routes) if !routes.is_empty() => routes,
            _ => {
                tracing::warn!(
                    message_id = %message_id,
                    "no asynchronous handler registered, message dropped"
                );
                return;
            }
        };

        let message = Arc::new(message);
        for route in routes {
            let handler = Arc::clone(&route.handler);
            let handler_name = route.name;
            let message = Arc::clone(&message);

            self.executor.execute(Box::new(move || {
                if let Err(error) = handler.receive_async(&message) {
                    tracing::error!(
                        message_id = %message.id(),
                        handler = handler_name,
                        error = %error,
                        snapshot = %message.snapshot(),
                        "asynchronous handler failed, message discarded for this handler"
                    );
                }
            }));
        }
    }

    /// Message ids with a registered synchronous handler.
    pub fn sync_supported(&self) -> Vec<MessageId> {
        self.sync_routes.keys().copied().collect()
    }

    /// Message ids with at least one registered asynchronous handler.
    pub fn async_supported(&self) -> Vec<MessageId> {
        self.async_routes.keys().copied().collect()
    }

    /// Number of asynchronous handlers subscribed to an id.
    pub fn async_handler_count(&self, message_id: MessageId) -> usize {
        self.async_routes
            .get(&message_id)
            .map(|routes| routes.len())
            .unwrap_or(0)
    }
}
