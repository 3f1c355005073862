//! Renderer protocol
//!
//! Messages exchanged with the front end that draws the lineage graph.
//! Inbound messages are edit intents; outbound messages replace or patch the
//! renderer's view.

use crate::models::{EdgePatch, EdgeStyle, Position};
use crate::projection::ViewModel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Node kind as tagged by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Table,
    Column,
}

impl NodeGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeGroup::Table => "table",
            NodeGroup::Column => "column",
        }
    }
}

/// Edge drawn by the user between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEdge {
    /// Renderer-local id; replaced by a freshly allocated one
    #[serde(default)]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub arrows: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeUpdate {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub style: Option<EdgeStyle>,
    #[serde(default)]
    pub arrows: Option<String>,
}

impl EdgeUpdate {
    pub fn patch(&self) -> EdgePatch {
        EdgePatch {
            description: self.label.clone(),
            color: self.color.clone(),
            style: self.style,
            arrows: self.arrows.clone(),
        }
    }
}

/// Renderer -> core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RendererMessage {
    /// The renderer is up and wants the current view
    Ready,
    NodePositionChanged {
        positions: HashMap<String, Position>,
    },
    #[serde(rename_all = "camelCase")]
    EditNodeLabel {
        node_id: String,
        #[serde(default)]
        current_label: String,
        group: NodeGroup,
    },
    EdgeAdded {
        edge: NewEdge,
    },
    EdgeDeleted {
        edge: EdgeRef,
    },
    EdgeUpdated {
        edge: EdgeUpdate,
    },
    #[serde(rename_all = "camelCase")]
    TableDeleted {
        table_id: String,
    },
    #[serde(rename_all = "camelCase")]
    ExportImage {
        image_data: String,
        path: PathBuf,
    },
    Undo,
    Redo,
}

impl RendererMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            RendererMessage::Ready => "ready",
            RendererMessage::NodePositionChanged { .. } => "nodePositionChanged",
            RendererMessage::EditNodeLabel { .. } => "editNodeLabel",
            RendererMessage::EdgeAdded { .. } => "edgeAdded",
            RendererMessage::EdgeDeleted { .. } => "edgeDeleted",
            RendererMessage::EdgeUpdated { .. } => "edgeUpdated",
            RendererMessage::TableDeleted { .. } => "tableDeleted",
            RendererMessage::ExportImage { .. } => "exportImage",
            RendererMessage::Undo => "undo",
            RendererMessage::Redo => "redo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Core -> renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Replace the renderer's whole node/edge set
    UpdateData(ViewModel),
    /// Patch one label in place ahead of the full replace
    #[serde(rename_all = "camelCase")]
    LabelUpdated { node_id: String, new_label: String },
    /// User-visible message
    Notice { level: NoticeLevel, message: String },
}

/// What an intent did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntentOutcome {
    /// Document mutated, one history entry recorded, view pushed
    Applied { description: String },
    /// Referenced ids were unknown or nothing was there to change
    Ignored,
    /// The user dismissed the prompt
    Abandoned,
    /// The import source held no usable rows
    NothingImported,
    /// The current view was pushed without a mutation
    Published,
    /// Image bytes written to disk
    Exported { path: PathBuf, bytes: usize },
}

impl IntentOutcome {
    pub fn applied(description: impl Into<String>) -> Self {
        IntentOutcome::Applied {
            description: description.into(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, IntentOutcome::Applied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_label_message() {
        let json = r#"{"type":"editNodeLabel","nodeId":"C1","currentLabel":"id","group":"column"}"#;
        let message: RendererMessage = serde_json::from_str(json).unwrap();

        assert_eq!(
            message,
            RendererMessage::EditNodeLabel {
                node_id: "C1".to_string(),
                current_label: "id".to_string(),
                group: NodeGroup::Column,
            }
        );
    }

    #[test]
    fn test_parse_position_and_edge_messages() {
        let moved: RendererMessage = serde_json::from_str(
            r#"{"type":"nodePositionChanged","positions":{"T1":{"x":10,"y":-4.5}}}"#,
        )
        .unwrap();
        match moved {
            RendererMessage::NodePositionChanged { positions } => {
                assert_eq!(positions["T1"], Position::new(10.0, -4.5));
            }
            other => panic!("unexpected message {:?}", other),
        }

        let added: RendererMessage = serde_json::from_str(
            r#"{"type":"edgeAdded","edge":{"id":"tmp","from":"C1","to":"C2","label":null,"arrows":"to"}}"#,
        )
        .unwrap();
        assert_eq!(added.kind(), "edgeAdded");

        let undo: RendererMessage = serde_json::from_str(r#"{"type":"undo"}"#).unwrap();
        assert_eq!(undo, RendererMessage::Undo);
    }

    #[test]
    fn test_outbound_wire_format() {
        let patch = OutboundMessage::LabelUpdated {
            node_id: "T1".to_string(),
            new_label: "orders".to_string(),
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["type"], "labelUpdated");
        assert_eq!(value["nodeId"], "T1");
        assert_eq!(value["newLabel"], "orders");

        let replace = serde_json::to_value(OutboundMessage::UpdateData(ViewModel::default())).unwrap();
        assert_eq!(replace["type"], "updateData");
        assert!(replace["nodes"].as_array().unwrap().is_empty());
    }
}
