//! Lineage session route handlers
//!
//! Each mutating handler runs one controller intent under the session lock and
//! returns the outbound renderer messages it produced.

use crate::error::{validation_error, ApiResult};
use crate::history::HistorySummary;
use crate::models::{GraphDocument, SuccessResponse};
use crate::projection::ViewModel;
use crate::state::SharedState;
use crate::sync::{IntentOutcome, OutboundMessage, ProvidedLabel, RendererMessage};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub message: RendererMessage,
    /// Answer to the label prompt of an `editNodeLabel` message; absent means dismissed
    #[serde(default)]
    pub new_label: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PathRequest {
    #[validate(length(min = 1, message = "A file path is required"))]
    pub path: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SaveRequest {
    #[validate(length(min = 1, message = "File path cannot be empty"))]
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub success: bool,
    #[serde(flatten)]
    pub outcome: IntentOutcome,
    pub messages: Vec<OutboundMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDocument {
    pub path: PathBuf,
}

// ==================== Handlers ====================

/// Current projection of the live document
pub async fn get_view(State(state): State<SharedState>) -> Json<ViewModel> {
    let controller = state.controller.lock().await;
    Json(controller.view())
}

/// The live document
pub async fn get_document(State(state): State<SharedState>) -> Json<GraphDocument> {
    let controller = state.controller.lock().await;
    Json(controller.document().snapshot())
}

/// Undo/redo log overview
pub async fn get_history(State(state): State<SharedState>) -> Json<HistorySummary> {
    let controller = state.controller.lock().await;
    Json(controller.history().summary())
}

/// Deliver one renderer message
pub async fn post_message(
    State(state): State<SharedState>,
    Json(payload): Json<MessageRequest>,
) -> ApiResult<Json<IntentResponse>> {
    debug!("Received renderer message: {}", payload.message.kind());
    let prompt = ProvidedLabel(payload.new_label);

    let mut controller = state.controller.lock().await;
    let result = controller.handle_message(payload.message, &prompt).await;
    let messages = controller.renderer_mut().drain();

    Ok(Json(IntentResponse {
        success: true,
        outcome: result?,
        messages,
    }))
}

/// Import table/column definitions from a CSV file
pub async fn import_csv(
    State(state): State<SharedState>,
    Json(payload): Json<PathRequest>,
) -> ApiResult<Json<IntentResponse>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;
    info!("Importing CSV from {}", payload.path);

    let mut controller = state.controller.lock().await;
    let result = controller.import_csv_file(Path::new(&payload.path)).await;
    let messages = controller.renderer_mut().drain();

    Ok(Json(IntentResponse {
        success: true,
        outcome: result?,
        messages,
    }))
}

/// Save the live document as JSON
pub async fn save_document(
    State(state): State<SharedState>,
    Json(payload): Json<SaveRequest>,
) -> ApiResult<Json<SuccessResponse<SavedDocument>>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let mut controller = state.controller.lock().await;
    let path = controller
        .save_document(payload.path.as_deref().map(Path::new))
        .await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Lineage data saved to {}", path.display()),
        SavedDocument { path },
    )))
}

/// Replace the live document with a saved one
pub async fn load_document(
    State(state): State<SharedState>,
    Json(payload): Json<PathRequest>,
) -> ApiResult<Json<IntentResponse>> {
    payload.validate().map_err(|e| validation_error(e.to_string()))?;
    info!("Loading lineage data from {}", payload.path);

    let mut controller = state.controller.lock().await;
    let result = controller.load_document(Path::new(&payload.path)).await;
    let messages = controller.renderer_mut().drain();

    Ok(Json(IntentResponse {
        success: true,
        outcome: result?,
        messages,
    }))
}
