//! Image export
//!
//! The renderer captures the canvas and sends it back as a data URI; the
//! payload is decoded and written verbatim to the chosen path.

use crate::error::{validation_error, AppError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::info;

static DATA_URI_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:(?P<mime>[^;,]*)(?P<params>(?:;[^;,]*)*),").expect("valid data URI pattern")
});

pub struct ImageExporter;

impl ImageExporter {
    /// Decode a data URI (or a bare base64 string) into raw bytes.
    ///
    /// `data:image/png;base64,...` is base64-decoded; a non-base64 data URI
    /// such as `data:image/svg+xml,<svg ...>` is taken as literal text.
    pub fn decode(image_data: &str) -> Result<Vec<u8>, AppError> {
        let image_data = image_data.trim();
        if image_data.is_empty() {
            return Err(validation_error("Image payload is empty"));
        }

        match DATA_URI_PREFIX.captures(image_data) {
            Some(caps) => {
                let prefix_len = caps.get(0).map_or(0, |m| m.end());
                let payload = &image_data[prefix_len..];
                let is_base64 = caps
                    .name("params")
                    .is_some_and(|p| p.as_str().split(';').any(|param| param == "base64"));
                if is_base64 {
                    Ok(STANDARD.decode(payload)?)
                } else {
                    Ok(payload.as_bytes().to_vec())
                }
            }
            None => Ok(STANDARD.decode(image_data)?),
        }
    }

    /// Decode and write the image. Returns the number of bytes written.
    pub async fn export(image_data: &str, path: &Path) -> Result<usize, AppError> {
        let bytes = Self::decode(image_data)?;
        tokio::fs::write(path, &bytes).await?;
        info!("Exported lineage image to {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes.len())
    }
}
