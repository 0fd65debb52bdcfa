//! Frame-stepped job system.

mod system;

pub use system::{JobSystem, Tasklet};
