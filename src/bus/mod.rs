//! Domain bus - capability indexing and message dispatch.
//!
//! The bus decouples bounded domains inside one process: producers hand it
//! a [`Message`](crate::Message) and handlers receive it according to what
//! they declared they can serve.
//!
//! ## Architecture
//!
//! ```text
//! Domain service (producer)
//!     │
//!     ├─► send_sync(msg) ──► map A: id → one SyncHandler
//!     │                          │
//!     │                          └─► invoked inline, result returned,
//!     │                              errors propagate to the caller
//!     │
//!     └─► send_async(msg) ─► map B: id → ordered async handlers
//!                                │
//!                                ├─► task per handler ──► TaskExecutor
//!                                │       (failures caught and logged)
//!                                └─► returns immediately
//! ```
//!
//! Both routing tables are built once by [`BusBuilder`] and are read-only
//! afterwards, so the dispatch path takes no locks. There is no dynamic
//! re-registration.

mod builder;
mod dispatcher;

pub use builder::{BusBuilder, BusConfigError};
pub use dispatcher::{DomainBus, SendError};
