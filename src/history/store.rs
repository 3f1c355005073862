//! Bounded undo/redo log
//!
//! Linear history with branch truncation: recording while not at the tip
//! discards the redo branch. Each entry is a full deep snapshot of the
//! document, taken at record time and copied again on restore.

use crate::models::GraphDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Default number of entries kept before the oldest are evicted
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One immutable snapshot of the document
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub data: GraphDocument,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

/// Metadata about an entry (lightweight, used for listing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryMetadata {
    pub index: usize,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub checksum: String,
    pub table_count: usize,
    pub edge_count: usize,
}

impl HistoryEntryMetadata {
    fn from_entry(index: usize, entry: &HistoryEntry) -> Self {
        Self {
            index,
            description: entry.description.clone(),
            timestamp: entry.timestamp,
            checksum: document_checksum(&entry.data),
            table_count: entry.data.tables.len(),
            edge_count: entry.data.lineage.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub entries: Vec<HistoryEntryMetadata>,
    pub current_index: Option<usize>,
    pub capacity: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Compute checksum from document content. Equal documents hash equal.
pub fn document_checksum(document: &GraphDocument) -> String {
    let mut hasher = Sha256::new();
    // Serializing plain data structs cannot fail
    if let Ok(bytes) = serde_json::to_vec(document) {
        hasher.update(&bytes);
    }
    format!("{:x}", hasher.finalize())
}

#[derive(Debug)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    /// `None` only while nothing has been recorded
    current_index: Option<usize>,
    capacity: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_index: None,
            capacity: capacity.max(1),
        }
    }

    /// Snapshot `document` as the new tip. Returns the index of the new entry.
    pub fn record(&mut self, document: &GraphDocument, description: impl Into<String>) -> usize {
        match self.current_index {
            Some(index) => self.entries.truncate(index + 1),
            None => self.entries.clear(),
        }

        self.entries.push(HistoryEntry {
            data: document.snapshot(),
            timestamp: Utc::now(),
            description: description.into(),
        });

        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(0..excess);
        }

        let tip = self.entries.len() - 1;
        self.current_index = Some(tip);
        debug!(
            "Recorded history entry {} '{}' ({} entries)",
            tip,
            self.entries[tip].description,
            self.entries.len()
        );
        tip
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.current_index, Some(index) if index > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.current_index, Some(index) if index + 1 < self.entries.len())
    }

    /// Step back one entry and install a copy of it into `live`.
    /// Returns `false` at the start of history, leaving `live` untouched.
    pub fn undo(&mut self, live: &mut GraphDocument) -> bool {
        let Some(index) = self.current_index.filter(|_| self.can_undo()) else {
            return false;
        };
        let target = index - 1;
        *live = self.entries[target].data.snapshot();
        self.current_index = Some(target);
        true
    }

    /// Step forward one entry and install a copy of it into `live`.
    /// Returns `false` at the tip, leaving `live` untouched.
    pub fn redo(&mut self, live: &mut GraphDocument) -> bool {
        let Some(index) = self.current_index.filter(|_| self.can_redo()) else {
            return false;
        };
        let target = index + 1;
        *live = self.entries[target].data.snapshot();
        self.current_index = Some(target);
        true
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.current_index.and_then(|index| self.entries.get(index))
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries and return to the pristine state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = None;
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(index, entry)| HistoryEntryMetadata::from_entry(index, entry))
                .collect(),
            current_index: self.current_index,
            capacity: self.capacity,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
