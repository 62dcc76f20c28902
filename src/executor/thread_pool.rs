//! Fixed-size worker pool for background task execution.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::{Task, TaskExecutor};

/// Statistics aggregated across all workers of a pool.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of tasks pulled from the queue and executed (including
    /// panicked ones).
    pub tasks_run: usize,
    /// Number of tasks that panicked while executing.
    pub tasks_panicked: usize,
}

#[derive(Default)]
struct WorkerStats {
    tasks_run: usize,
    tasks_panicked: usize,
}

/// A pool of worker threads draining a shared task queue.
///
/// Submission goes through an unbounded channel and never blocks the
/// caller; sizing and backpressure policy are configuration concerns of
/// this type, not of the bus routing logic. Workers execute tasks in no
/// particular order relative to each other and catch unwinds, so a
/// panicking task is counted and logged but leaves its worker alive.
///
/// Follows the same spawn/stop/stats pattern as a background worker
/// thread: create the pool, submit work, `shutdown()` to drain the queue,
/// join the workers and collect statistics.
///
/// ## Example
///
/// ```
/// use domainbus::{TaskExecutor, ThreadPoolExecutor};
///
/// let pool = ThreadPoolExecutor::new(4);
/// pool.execute(Box::new(|| {
///     // background work
/// }));
///
/// let stats = pool.shutdown();
/// assert_eq!(stats.tasks_run, 1);
/// ```
pub struct ThreadPoolExecutor {
    sender: Mutex<Option<Sender<Task>>>,
    workers: Mutex<Vec<JoinHandle<WorkerStats>>>,
}

impl ThreadPoolExecutor {
    /// Spawn a pool with the given number of worker threads.
    ///
    /// `workers` is clamped to at least one.
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        let (sender, receiver) = channel::<Task>();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let receiver = Arc::clone(&receiver);
            handles.push(thread::spawn(move || run_worker(receiver)));
        }

        ThreadPoolExecutor {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(handles),
        }
    }

    /// Stop accepting tasks, let the workers drain the queue, join them
    /// and return the aggregated statistics.
    ///
    /// Tasks already submitted still run to completion. Calling
    /// `shutdown()` a second time returns empty statistics.
    pub fn shutdown(&self) -> PoolStats {
        // Dropping the sender disconnects the channel; workers exit once
        // the queue is drained.
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }

        let handles = match self.workers.lock() {
            Ok(mut workers) => std::mem::take(&mut *workers),
            Err(_) => Vec::new(),
        };

        let mut stats = PoolStats::default();
        for handle in handles {
            if let Ok(worker) = handle.join() {
                stats.tasks_run += worker.tasks_run;
                stats.tasks_panicked += worker.tasks_panicked;
            }
        }
        stats
    }
}

impl TaskExecutor for ThreadPoolExecutor {
    fn execute(&self, task: Task) {
        let sender = match self.sender.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };

        match sender {
            Some(sender) => {
                // Unbounded channel: send never blocks. A send error means
                // the workers are gone, which only happens after shutdown.
                if sender.send(task).is_err() {
                    tracing::error!("task submitted after pool shutdown, dropped");
                }
            }
            None => {
                tracing::error!("task submitted after pool shutdown, dropped");
            }
        }
    }
}

fn run_worker(receiver: Arc<Mutex<Receiver<Task>>>) -> WorkerStats {
    let mut stats = WorkerStats::default();
    loop {
        let next = {
            let receiver = match receiver.lock() {
                Ok(guard) => guard,
                Err(_) => break,
            };
            receiver.recv()
        };

        match next {
            Ok(task) => {
                stats.tasks_run += 1;
                if catch_unwind(AssertUnwindSafe(task)).is_err() {
                    stats.tasks_panicked += 1;
                    tracing::error!("task panicked, worker continues");
                }
            }
            // Channel disconnected and drained: pool is shutting down.
            Err(_) => break,
        }
    }
    stats
}
