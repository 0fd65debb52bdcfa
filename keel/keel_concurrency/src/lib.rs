//! Keel Concurrency - worker pool and job system
//!
//! This crate provides the two collaborators the bootstrap orchestrator
//! drives each frame: a worker [`ThreadPool`](pool::ThreadPool) started at
//! `init`, and a [`JobSystem`](job::JobSystem) that collects tasklets and
//! hands one frame's worth to the pool per `tick`.

pub mod job;
pub mod pool;

pub use job::{JobSystem, Tasklet};
pub use pool::{ThreadPool, ThreadPoolConfig, ThreadPoolError};
