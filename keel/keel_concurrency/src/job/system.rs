//! Job system: collects tasklets and hands one frame's worth to the pool.
//!
//! Ownership of a tasklet transfers on enqueue; the job system never
//! inspects or re-sequences it. `update_one_frame` is the non-blocking frame
//! advance: it dispatches what has accumulated and returns without waiting
//! for completion.

use crate::pool::{ThreadPool, ThreadPoolError};
use keel_core::id::TaskletId;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// A unit of deferred work submitted to the job system.
pub struct Tasklet {
    id: TaskletId,
    func: Box<dyn FnOnce() + Send + 'static>,
}

impl Tasklet {
    /// Wrap a closure as a tasklet.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id: TaskletId::new(),
            func: Box::new(f),
        }
    }

    /// Identifier of this tasklet.
    pub fn id(&self) -> TaskletId {
        self.id
    }

    fn into_func(self) -> Box<dyn FnOnce() + Send + 'static> {
        self.func
    }
}

impl std::fmt::Debug for Tasklet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tasklet").field("id", &self.id).finish()
    }
}

/// Collects tasklets between frames and drains them onto the worker pool
/// once per frame.
#[derive(Default)]
pub struct JobSystem {
    pending: Mutex<VecDeque<Tasklet>>,
    frame: AtomicU64,
    submitted: AtomicU64,
    dispatched: AtomicU64,
}

impl JobSystem {
    /// Create an empty job system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a tasklet; it runs on a later frame advance.
    ///
    /// Valid at any point in the process lifecycle; tasklets enqueued before
    /// the pool starts simply wait.
    pub fn enqueue_task(&self, task: Tasklet) {
        debug!(tasklet = %task.id(), "Enqueueing tasklet");
        self.submitted.fetch_add(1, Ordering::Relaxed);
        self.pending.lock().push_back(task);
    }

    /// Advance one frame: hand every pending tasklet to `pool` and return
    /// the number dispatched, without waiting for any of them to finish.
    ///
    /// A tasklet the pool refuses (queue full) stays pending for the next
    /// frame; a pool that is shutting down drops the remainder.
    pub fn update_one_frame(&self, pool: &ThreadPool) -> usize {
        let frame = self.frame.fetch_add(1, Ordering::Relaxed) + 1;

        let mut batch: VecDeque<Tasklet> = std::mem::take(&mut *self.pending.lock());
        let mut count = 0usize;

        while let Some(task) = batch.pop_front() {
            // Only the control thread feeds the pool, so a capacity check
            // here cannot race another producer.
            if pool.is_full() {
                warn!(frame, "Worker queue full, deferring remaining tasklets");
                let mut pending = self.pending.lock();
                while let Some(left) = batch.pop_back() {
                    pending.push_front(left);
                }
                pending.push_front(task);
                break;
            }

            let id = task.id();
            match pool.execute(task.into_func()) {
                Ok(()) => count += 1,
                Err(ThreadPoolError::QueueFull) => {
                    warn!(frame, tasklet = %id, "Worker queue filled mid-frame, tasklet dropped");
                }
                Err(err) => {
                    warn!(frame, tasklet = %id, %err, "Dropping tasklet");
                }
            }
        }

        self.dispatched.fetch_add(count as u64, Ordering::Relaxed);
        count
    }

    /// Number of completed frame advances.
    pub fn frame_index(&self) -> u64 {
        self.frame.load(Ordering::Relaxed)
    }

    /// Tasklets accepted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    /// Tasklets handed to the pool so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Tasklets waiting for the next frame advance.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
