//! Lineage document persistence
//!
//! JSON with top-level `tables`, `lineage` and `config`. Writes go to a
//! sibling temp file first and are renamed into place.

use crate::error::{not_found_error, AppError};
use crate::models::GraphDocument;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read a whole text file, reporting a missing file as not found.
pub async fn read_text(path: &Path) -> Result<String, AppError> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => not_found_error(format!("{} does not exist", path.display())),
        _ => e.into(),
    })
}

pub async fn read_document(path: &Path) -> Result<GraphDocument, AppError> {
    let content = read_text(path).await?;
    let document: GraphDocument = serde_json::from_str(&content)?;
    debug!(
        "Read lineage document {}: {} tables, {} edges",
        path.display(),
        document.tables.len(),
        document.lineage.len()
    );
    Ok(document)
}

pub async fn write_document(path: &Path, document: &GraphDocument) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(document)?;
    let staging = staging_path(path);
    tokio::fs::write(&staging, json).await?;
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    info!("Saved lineage document to {}", path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
