//! Graph model and shared DTOs
//!
//! Contains the canonical lineage document types and the response wrappers
//! used by the API.

pub mod document;
pub mod layout;
pub mod lineage;
pub mod table;

// Re-export commonly used types
pub use document::*;
pub use layout::*;
pub use lineage::*;
pub use table::*;

use serde::Serialize;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}
