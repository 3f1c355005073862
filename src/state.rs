//! Application state management
//!
//! Holds the one lineage session served by this process. The controller sits
//! behind an async mutex held for the whole of each intent, so intents are
//! processed one at a time even while one awaits file I/O.

use crate::config::Settings;
use crate::sync::{Outbox, SyncController};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across all handlers
pub struct AppState {
    /// Lineage session: document, history and outbound renderer messages
    pub controller: Mutex<SyncController<Outbox>>,
}

impl AppState {
    pub fn new(controller: SyncController<Outbox>) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }

    /// Build an empty session configured from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let controller = SyncController::new(Outbox::new())
            .with_history_capacity(settings.lineage.history_capacity)
            .with_import_spacing(settings.lineage.import_spacing);
        Self::new(controller)
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
