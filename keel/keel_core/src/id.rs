//! Strongly-typed identifiers for the Keel runtime.
//!
//! Each identifier type is a thin wrapper around a UUID with a phantom type
//! parameter, so identifiers for different entity kinds cannot be mixed up
//! even though they share the same underlying structure.
//!
//! # Examples
//!
//! ```
//! use keel_core::id::{ModuleId, ArchiveId};
//! use std::str::FromStr;
//!
//! let module_id = ModuleId::new();
//! let archive_id = ArchiveId::new();
//!
//! // Create from string
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let module_id = ModuleId::from_str(id_str).unwrap();
//! assert_eq!(module_id.to_string(), id_str);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
///
/// The phantom type parameter `T` specializes this identifier for a given
/// entity kind; two `Id`s with different markers are different types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: std::marker::PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier (UUID v4).
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Create an identifier from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Create a nil (all zeros) identifier, useful as a sentinel value.
    pub fn nil() -> Self {
        Self {
            uuid: Uuid::nil(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Check if this is a nil identifier.
    pub fn is_nil(&self) -> bool {
        self.uuid == Uuid::nil()
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            uuid: Uuid::parse_str(s)?,
            _marker: std::marker::PhantomData,
        })
    }
}

/// Marker type for modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleMarker;
/// Identifier for a loaded module.
pub type ModuleId = Id<ModuleMarker>;

/// Marker type for archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchiveMarker;
/// Identifier for an archive handle.
pub type ArchiveId = Id<ArchiveMarker>;

/// Marker type for tasklets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskletMarker;
/// Identifier for a unit of deferred work.
pub type TaskletId = Id<TaskletMarker>;
