//! History module
//!
//! Versioned, bounded undo/redo over the lineage document.

pub mod store;

pub use store::{
    document_checksum, HistoryEntry, HistoryEntryMetadata, HistoryManager, HistorySummary,
    DEFAULT_HISTORY_CAPACITY,
};
