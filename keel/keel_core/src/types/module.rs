//! Module lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a manifest-declared module.
///
/// A module moves `Declared → Loading → Resident` on success, or ends in
/// `Failed`. A failed load is not re-attempted within the same bootstrap
/// pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleState {
    /// Listed in the manifest, not yet handed to the loader.
    Declared,

    /// Currently being loaded.
    Loading,

    /// Loaded and registered in the process-wide registry.
    Resident,

    /// The load attempt failed.
    Failed,
}

impl ModuleState {
    /// Whether this state is final for the current bootstrap pass.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Resident | Self::Failed)
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Declared => "declared",
            Self::Loading => "loading",
            Self::Resident => "resident",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
