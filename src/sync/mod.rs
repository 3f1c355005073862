//! Synchronization module
//!
//! Turns renderer edit intents and import/export commands into history-tracked
//! mutations of the lineage document, and pushes fresh views back out.

pub mod controller;
pub mod csv_import;
pub mod export;
pub mod host;
pub mod persistence;
pub mod protocol;

pub use controller::SyncController;
pub use csv_import::{CsvImporter, ImportRecord};
pub use export::ImageExporter;
pub use host::{LabelPrompt, Outbox, ProvidedLabel, RendererSink};
pub use protocol::{IntentOutcome, NodeGroup, NoticeLevel, OutboundMessage, RendererMessage};
