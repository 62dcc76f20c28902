//! Execution substrate - where asynchronous handler invocations run.
//!
//! The bus never assumes a task runs synchronously with submission; it
//! only requires that submission itself does not block. The substrate is
//! a trait so deployments can swap the pool, and tests can force inline
//! execution.

mod thread_pool;

pub use thread_pool::{PoolStats, ThreadPoolExecutor};

/// A unit of work submitted by the bus: one handler invocation, already
/// wrapped with its failure logging.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Concurrent task-execution facility for fire-and-forget work.
///
/// Implementations must accept tasks without blocking the submitter and
/// must survive tasks that panic - one bad handler may not take the
/// substrate down.
pub trait TaskExecutor: Send + Sync {
    /// Submit a task for execution. Returns immediately.
    fn execute(&self, task: Task);
}

/// Runs every task inline on the submitting thread.
///
/// Useful for deterministic tests and single-threaded embeddings. Offers
/// no panic containment: a panicking task unwinds into the submitter.
pub struct ImmediateExecutor;

impl TaskExecutor for ImmediateExecutor {
    fn execute(&self, task: Task) {
        task();
    }
}
