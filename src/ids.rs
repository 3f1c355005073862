//! Id allocation
//!
//! New tables, columns and edges get their ids from an `IdAllocator`. The
//! default allocator draws UUID-v4 values (122 random bits), so two ids
//! created in the same instant collide with probability ~2^-61 per pair.
//! `SequentialIds` is a monotonic counter that never repeats within a process,
//! used where deterministic ids matter.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// What kind of entity an id is minted for. Selects the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Table,
    Column,
    Edge,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Table => "T",
            IdKind::Column => "C",
            IdKind::Edge => "E",
        }
    }
}

pub trait IdAllocator: Send + Sync {
    fn allocate(&self, kind: IdKind) -> String;
}

/// UUID-v4 backed allocator: `T-<uuid>`, `C-<uuid>`, `E-<uuid>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdAllocator for UuidIds {
    fn allocate(&self, kind: IdKind) -> String {
        format!("{}-{}", kind.prefix(), Uuid::new_v4())
    }
}

/// Monotonic counter allocator: `T1`, `C2`, `E3`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdAllocator for SequentialIds {
    fn allocate(&self, kind: IdKind) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{}", kind.prefix(), n)
    }
}
