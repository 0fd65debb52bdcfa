//! Memory-manager handle shared with loaded modules.
//!
//! The handle names the allocation domain a module load participates in and
//! tracks per-domain accounting. Allocator selection itself is a process
//! concern and lives outside this crate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Allocation domains exposed by the memory manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryDomain {
    /// Default domain for long-lived allocations.
    Default,

    /// Per-frame scratch allocations.
    Frame,

    /// Asset and archive payloads.
    Resource,

    /// Runtime bookkeeping.
    Runtime,

    /// Stack-like transient allocations.
    Stack,
}

impl MemoryDomain {
    /// All domains, in a stable order.
    pub const ALL: [MemoryDomain; 5] = [
        MemoryDomain::Default,
        MemoryDomain::Frame,
        MemoryDomain::Resource,
        MemoryDomain::Runtime,
        MemoryDomain::Stack,
    ];

    fn index(&self) -> usize {
        match self {
            Self::Default => 0,
            Self::Frame => 1,
            Self::Resource => 2,
            Self::Runtime => 3,
            Self::Stack => 4,
        }
    }
}

#[derive(Default)]
struct DomainCounters {
    bytes: [AtomicU64; 5],
    allocations: [AtomicU64; 5],
}

/// Cloneable handle to the process allocation domain.
///
/// Passed to every module load so loaded modules account against the same
/// domains as the host.
#[derive(Clone)]
pub struct MemoryManager {
    label: Arc<str>,
    counters: Arc<DomainCounters>,
}

impl MemoryManager {
    /// Create a new memory manager with the given label.
    pub fn new(label: &str) -> Self {
        Self {
            label: Arc::from(label),
            counters: Arc::new(DomainCounters::default()),
        }
    }

    /// The label naming this allocation domain.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Record an allocation of `bytes` against `domain`.
    pub fn record_allocation(&self, domain: MemoryDomain, bytes: u64) {
        let i = domain.index();
        self.counters.bytes[i].fetch_add(bytes, Ordering::Relaxed);
        self.counters.allocations[i].fetch_add(1, Ordering::Relaxed);
    }

    /// Total bytes recorded against `domain`.
    pub fn domain_bytes(&self, domain: MemoryDomain) -> u64 {
        self.counters.bytes[domain.index()].load(Ordering::Relaxed)
    }

    /// Number of allocations recorded against `domain`.
    pub fn domain_allocations(&self, domain: MemoryDomain) -> u64 {
        self.counters.allocations[domain.index()].load(Ordering::Relaxed)
    }

    /// Whether two handles refer to the same allocation domain.
    pub fn same_domain(&self, other: &MemoryManager) -> bool {
        Arc::ptr_eq(&self.counters, &other.counters)
    }
}

impl fmt::Debug for MemoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryManager")
            .field("label", &self.label)
            .finish()
    }
}
