//! Lifecycle types for the bootstrap orchestrator.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque platform/application handle recorded at `init`.
///
/// Whatever the platform shell passes in (a window handle wrapper, an app
/// context, a unit value in tests) rides along untyped; the runtime never
/// inspects it.
pub type PlatformHandle = Arc<dyn Any + Send + Sync>;

/// State of the bootstrap orchestrator.
///
/// Transitions run strictly forward: `Uninitialized → Initialized → Running
/// → Deinitialized`, and `Deinitialized` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Created, `init` has not run yet.
    Uninitialized,

    /// `init` has run; worker pool is up, no frame has been ticked.
    Initialized,

    /// At least one `tick` has run.
    Running,

    /// `deinit` has run. Terminal.
    Deinitialized,
}

impl LifecycleState {
    /// Whether the orchestrator has been initialized (any state past
    /// `Uninitialized` that is not terminal).
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Initialized | Self::Running)
    }

    /// Whether this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deinitialized)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Deinitialized => "deinitialized",
        };
        write!(f, "{}", name)
    }
}
