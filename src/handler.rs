//! Handler capability traits.
//!
//! A handler declares, through `supported()`, exactly which message ids it
//! serves. The bus evaluates the declaration once, at construction, and
//! builds its routing tables from it - there is no re-registration and no
//! per-dispatch inspection.
//!
//! The two traits encode the two dispatch modes:
//! - [`SyncHandler`]: "I answer this id and return a result" - at most one
//!   per message id, invoked inline on the caller's thread.
//! - [`AsyncHandler`]: "notify me when this id occurs" - any number per
//!   message id, each invoked on the execution substrate with isolated
//!   failure handling.
//!
//! One type may implement both traits; register it once per capability.

use std::error::Error;
use std::fmt;

use crate::message::{CodecError, Message, MessageId, SyncResult};

/// Error type raised by handler implementations.
#[derive(Debug)]
pub enum HandlerError {
    /// Business logic rejected the message (validation, invariant violation).
    Rejected(String),
    /// A referenced entity does not exist.
    NotFound(String),
    /// A payload could not be decoded from the message.
    Data(CodecError),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::NotFound(what) => write!(f, "not found: {}", what),
            HandlerError::Data(e) => write!(f, "message data error: {}", e),
            HandlerError::Other(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Data(e) => Some(e),
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<CodecError> for HandlerError {
    fn from(err: CodecError) -> Self {
        HandlerError::Data(err)
    }
}

/// A handler that answers a message with a result.
///
/// Exactly one sync handler may exist per message id across the whole bus;
/// registering a second one is a construction-time error. The handler runs
/// inline on the sending thread and its errors propagate unchanged to the
/// caller - synchronous dispatch performs no error isolation, because the
/// caller is blocking for the answer and owns recovery.
pub trait SyncHandler: Send + Sync {
    /// The message ids this handler answers.
    ///
    /// Evaluated once when the bus is built. Duplicates collapse to a set.
    fn supported(&self) -> Vec<MessageId>;

    /// Answer a message.
    fn receive_sync(&self, message: &Message) -> Result<SyncResult, HandlerError>;
}

/// A handler notified when a message id occurs.
///
/// Any number of async handlers may subscribe to the same id, including
/// zero. Each invocation runs as its own unit of work on the execution
/// substrate; an `Err` is caught and logged by the bus and never reaches
/// the producer or sibling handlers.
pub trait AsyncHandler: Send + Sync {
    /// The message ids this handler wants delivered.
    ///
    /// Evaluated once when the bus is built. Duplicates collapse to a set.
    fn supported(&self) -> Vec<MessageId>;

    /// Process a delivered message.
    fn receive_async(&self, message: &Message) -> Result<(), HandlerError>;
}
