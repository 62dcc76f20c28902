//! Bus construction - building the capability index from handler declarations.

use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::executor::TaskExecutor;
use crate::handler::{AsyncHandler, SyncHandler};
use crate::message::MessageId;

use super::dispatcher::{AsyncRoute, DomainBus, SyncRoute};

/// Error type for bus construction.
///
/// Configuration errors are startup-fatal: a misdeclared handler set must
/// abort initialization before any message is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusConfigError {
    /// Two synchronous handlers declared the same message id. The bus
    /// never silently picks one - a synchronous request has exactly one
    /// answerer or none.
    DuplicateSyncHandler {
        message_id: MessageId,
        first: &'static str,
        second: &'static str,
    },
}

impl fmt::Display for BusConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusConfigError::DuplicateSyncHandler {
                message_id,
                first,
                second,
            } => write!(
                f,
                "duplicate synchronous handler for {}: {} and {}",
                message_id, first, second
            ),
        }
    }
}

impl Error for BusConfigError {}

/// Builder collecting handler instances and producing a [`DomainBus`].
///
/// The host wiring (however handlers are discovered) registers every
/// synchronous- and asynchronous-capable handler here; the builder indexes
/// what it is given and nothing else. Registration order of asynchronous
/// handlers is preserved and becomes the submission order at dispatch.
///
/// ## Example
///
/// ```ignore
/// let executor = Arc::new(ThreadPoolExecutor::new(4));
/// let bus = DomainBus::builder()
///     .sync_handler(SchedulerStatusHandler::new(...))
///     .async_handler(ScanAccessHandler::new(...))
///     .async_handler(AuditTrailHandler::new(...))
///     .build(executor)?;
/// ```
pub struct BusBuilder {
    sync_handlers: Vec<(&'static str, Arc<dyn SyncHandler>)>,
    async_handlers: Vec<(&'static str, Arc<dyn AsyncHandler>)>,
}

impl Default for BusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BusBuilder {
    pub fn new() -> Self {
        BusBuilder {
            sync_handlers: Vec::new(),
            async_handlers: Vec::new(),
        }
    }

    /// Register a synchronous-capable handler.
    ///
    /// Uses builder pattern - returns `self` for chaining.
    pub fn sync_handler<H>(mut self, handler: H) -> Self
    where
        H: SyncHandler + 'static,
    {
        self.sync_handlers.push((type_name::<H>(), Arc::new(handler)));
        self
    }

    /// Register an asynchronous-capable handler.
    ///
    /// Fan-out order for a message follows the order handlers are
    /// registered here; completion order across worker threads is
    /// unspecified.
    pub fn async_handler<H>(mut self, handler: H) -> Self
    where
        H: AsyncHandler + 'static,
    {
        self.async_handlers
            .push((type_name::<H>(), Arc::new(handler)));
        self
    }

    /// Build the routing tables and produce the bus.
    ///
    /// Each handler's `supported()` declaration is evaluated exactly once,
    /// here. The resulting tables are immutable for the process lifetime,
    /// so dispatch never recomputes capabilities and never locks.
    pub fn build(
        self,
        executor: Arc<dyn TaskExecutor>,
    ) -> Result<DomainBus, BusConfigError> {
        let mut sync_routes: HashMap<MessageId, SyncRoute> = HashMap::new();
        for (name, handler) in self.sync_handlers {
            for message_id in declared_ids(handler.supported()) {
                if let Some(existing) = sync_routes.get(&message_id) {
                    return Err(BusConfigError::DuplicateSyncHandler {
                        message_id,
                        first: existing.name,
                        second: name,
                    });
                }
                tracing::info!(
                    message_id = %message_id,
                    handler = name,
                    "registered synchronous handler"
                );
                sync_routes.insert(
                    message_id,
                    SyncRoute {
                        name,
                        handler: Arc::clone(&handler),
                    },
                );
            }
        }

        let mut async_routes: HashMap<MessageId, Vec<AsyncRoute>> = HashMap::new();
        for (name, handler) in self.async_handlers {
            for message_id in declared_ids(handler.supported()) {
                tracing::info!(
                    message_id = %message_id,
                    handler = name,
                    "registered asynchronous handler"
                );
                async_routes.entry(message_id).or_default().push(AsyncRoute {
                    name,
                    handler: Arc::clone(&handler),
                });
            }
        }

        Ok(DomainBus::new(sync_routes, async_routes, executor))
    }
}

/// Collapse a capability declaration to a set, preserving first-seen order.
/// A handler may declare the same id more than once (for example from
/// several of its methods); it is still registered once.
fn declared_ids(declared: Vec<MessageId>) -> Vec<MessageId> {
    let mut seen = HashSet::new();
    declared.into_iter().filter(|id| seen.insert(*id)).collect()
}
