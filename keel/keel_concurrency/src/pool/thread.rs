//! Thread pool implementation for parallel execution.
//!
//! The pool is constructed idle and spun up by [`ThreadPool::start`], which
//! is what the orchestrator's `init` calls. Tasks submitted before `start`
//! wait in the queue until workers come up.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Error when operating the thread pool
#[derive(Error, Debug)]
pub enum ThreadPoolError {
    /// The thread pool is shutting down
    #[error("thread pool is shutting down")]
    ShuttingDown,

    /// The task queue is full
    #[error("thread pool queue is full")]
    QueueFull,

    /// `start` was called on a pool that is already running
    #[error("thread pool is already started")]
    AlreadyStarted,
}

/// Configuration for the thread pool
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Maximum size of the task queue
    pub queue_size: usize,

    /// Number of worker threads
    pub workers: usize,

    /// Name prefix for worker threads
    pub thread_name_prefix: String,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            queue_size: 256,
            workers: num_cpus::get(),
            thread_name_prefix: "keel-worker".to_string(),
        }
    }
}

type PoolTask = Box<dyn FnOnce() + Send + 'static>;

/// A worker pool executing submitted closures.
pub struct ThreadPool {
    task_sender: Sender<PoolTask>,

    // Workers clone this at `start`; shutdown is signaled through the flag,
    // not channel disconnection.
    task_receiver: Receiver<PoolTask>,

    workers: Vec<JoinHandle<()>>,

    is_shutting_down: Arc<AtomicBool>,

    completed: Arc<AtomicUsize>,
    panicked: Arc<AtomicUsize>,

    config: ThreadPoolConfig,
}

impl ThreadPool {
    /// Create an idle pool with the given number of workers.
    pub fn new(workers: usize) -> Self {
        Self::with_config(ThreadPoolConfig {
            workers,
            ..Default::default()
        })
    }

    /// Create an idle pool with the specified configuration.
    pub fn with_config(config: ThreadPoolConfig) -> Self {
        let (task_sender, task_receiver) = bounded(config.queue_size);

        Self {
            task_sender,
            task_receiver,
            workers: Vec::new(),
            is_shutting_down: Arc::new(AtomicBool::new(false)),
            completed: Arc::new(AtomicUsize::new(0)),
            panicked: Arc::new(AtomicUsize::new(0)),
            config,
        }
    }

    /// Spawn the worker threads.
    pub fn start(&mut self) -> Result<(), ThreadPoolError> {
        if !self.workers.is_empty() {
            return Err(ThreadPoolError::AlreadyStarted);
        }
        if self.is_shutting_down.load(Ordering::Relaxed) {
            return Err(ThreadPoolError::ShuttingDown);
        }

        info!(
            workers = self.config.workers,
            queue_size = self.config.queue_size,
            "Starting thread pool"
        );

        for id in 0..self.config.workers {
            let thread_name = format!("{}-{}", self.config.thread_name_prefix, id);
            let receiver = self.task_receiver.clone();
            let shutdown_flag = Arc::clone(&self.is_shutting_down);
            let completed = Arc::clone(&self.completed);
            let panicked = Arc::clone(&self.panicked);

            let handle = thread::Builder::new()
                .name(thread_name)
                .spawn(move || {
                    Self::worker_loop(id, receiver, shutdown_flag, completed, panicked);
                })
                .expect("Failed to spawn worker thread");

            self.workers.push(handle);
        }

        Ok(())
    }

    fn worker_loop(
        id: usize,
        receiver: Receiver<PoolTask>,
        shutdown_flag: Arc<AtomicBool>,
        completed: Arc<AtomicUsize>,
        panicked: Arc<AtomicUsize>,
    ) {
        debug!("Worker {}: Starting", id);

        while !shutdown_flag.load(Ordering::Relaxed) {
            // Wait for a task or re-check the shutdown flag every 100ms
            match receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(task) => {
                    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task));

                    match result {
                        Ok(_) => {
                            completed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            error!(
                                "Worker {}: Task panicked: {:?}",
                                id,
                                e.downcast_ref::<&str>().unwrap_or(&"<unknown panic>")
                            );
                            panicked.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
                Err(_) => {
                    if shutdown_flag.load(Ordering::Relaxed) {
                        break;
                    }
                }
            }
        }

        debug!("Worker {}: Shutting down", id);
    }

    /// Submit a task to be executed by the pool.
    pub fn execute<F>(&self, f: F) -> Result<(), ThreadPoolError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_shutting_down.load(Ordering::Relaxed) {
            return Err(ThreadPoolError::ShuttingDown);
        }

        match self.task_sender.try_send(Box::new(f)) {
            Ok(_) => Ok(()),
            Err(TrySendError::Full(_)) => Err(ThreadPoolError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(ThreadPoolError::ShuttingDown),
        }
    }

    /// Signal workers to stop once the queue drains of in-flight work.
    pub fn shutdown(&self) {
        info!("Shutting down thread pool");
        self.is_shutting_down.store(true, Ordering::Relaxed);
    }

    /// Shut down and wait for every worker to finish.
    pub fn shutdown_and_join(&mut self) {
        self.shutdown();

        for worker in self.workers.drain(..) {
            worker.join().unwrap_or_else(|e| {
                error!("Worker thread panicked during shutdown: {:?}", e);
            });
        }

        info!("Thread pool shutdown complete");
    }

    /// Number of worker threads currently running.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Whether `start` has been called.
    pub fn is_started(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Whether the pool has been told to stop.
    pub fn is_shutting_down(&self) -> bool {
        self.is_shutting_down.load(Ordering::Relaxed)
    }

    /// Whether the task queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.task_sender.is_full()
    }

    /// Tasks that ran to completion.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Tasks that panicked while running.
    pub fn panicked(&self) -> usize {
        self.panicked.load(Ordering::Relaxed)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if !self.is_shutting_down.load(Ordering::Relaxed) {
            self.shutdown();
        }
        // Workers exit when they next check the shutdown flag
        debug!("Thread pool dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_execute_runs_tasks() {
        let mut pool = ThreadPool::new(2);
        pool.start().unwrap();

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let counter = counter.clone();
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        thread::sleep(Duration::from_millis(200));
        assert_eq!(counter.load(Ordering::SeqCst), 8);
        assert_eq!(pool.completed(), 8);
        pool.shutdown_and_join();
    }

    #[test]
    fn test_tasks_queued_before_start() {
        let mut pool = ThreadPool::new(1);

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        pool.execute(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        pool.start().unwrap();

        thread::sleep(Duration::from_millis(100));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        pool.shutdown_and_join();
    }

    #[test]
    fn test_panic_does_not_kill_worker() {
        let mut pool = ThreadPool::new(1);
        pool.start().unwrap();

        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();

        pool.execute(|| {
            panic!("This task should panic");
        })
        .unwrap();
        pool.execute(move || {
            flag_clone.store(true, Ordering::SeqCst);
        })
        .unwrap();

        thread::sleep(Duration::from_millis(200));
        assert!(flag.load(Ordering::SeqCst));
        assert_eq!(pool.panicked(), 1);
        pool.shutdown_and_join();
    }

    #[test]
    fn test_double_start() {
        let mut pool = ThreadPool::new(1);
        pool.start().unwrap();
        assert!(matches!(pool.start(), Err(ThreadPoolError::AlreadyStarted)));
        pool.shutdown_and_join();
    }

    #[test]
    fn test_execute_after_shutdown() {
        let mut pool = ThreadPool::new(1);
        pool.start().unwrap();
        pool.shutdown();

        let result = pool.execute(|| {});
        assert!(matches!(result, Err(ThreadPoolError::ShuttingDown)));
        pool.shutdown_and_join();
    }

    #[test]
    fn test_queue_full() {
        let mut pool = ThreadPool::with_config(ThreadPoolConfig {
            queue_size: 1,
            workers: 1,
            thread_name_prefix: "test".to_string(),
        });
        pool.start().unwrap();

        let gate = Arc::new(std::sync::Mutex::new(()));
        let held = gate.lock().unwrap();

        let gate_clone = gate.clone();
        pool.execute(move || {
            let _held = gate_clone.lock().unwrap();
        })
        .unwrap();

        // Wait for the worker to pick up the blocking task
        thread::sleep(Duration::from_millis(50));

        pool.execute(|| {}).unwrap();
        let result = pool.execute(|| {});
        assert!(matches!(result, Err(ThreadPoolError::QueueFull)));

        drop(held);
        pool.shutdown_and_join();
    }
}
