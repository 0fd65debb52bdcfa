//! Utility helpers shared across the system.

pub mod path;

pub use path::{formalize, LIST_SEPARATOR};
