//! Lineage Flow
//!
//! Table/column lineage graph state with undo/redo history, a renderer view
//! projection and the synchronization layer that applies renderer edit
//! intents to the document.

pub mod config;
pub mod error;
pub mod history;
pub mod ids;
pub mod models;
pub mod projection;
pub mod routes;
pub mod state;
pub mod sync;
