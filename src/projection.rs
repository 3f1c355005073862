//! View projection
//!
//! Derives the flattened node/edge list the renderer draws from the canonical
//! document. `project` is a pure function of its input: same document, same
//! view model.

use crate::models::{EdgeStyle, GraphDocument, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Vertical distance between derived column slots under a table
pub const COLUMN_ROW_SPACING: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAxes {
    pub x: bool,
    pub y: bool,
}

impl FixedAxes {
    pub const FREE: FixedAxes = FixedAxes { x: false, y: false };
    pub const PINNED: FixedAxes = FixedAxes { x: true, y: true };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub physics: bool,
    pub fixed: FixedAxes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNode {
    pub id: String,
    pub label: String,
    /// Owning table id
    pub parent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub physics: bool,
    pub fixed: FixedAxes,
}

/// A renderer node, tagged by `group` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "group", rename_all = "lowercase")]
pub enum ViewNode {
    Table(TableNode),
    Column(ColumnNode),
}

impl ViewNode {
    pub fn id(&self) -> &str {
        match self {
            ViewNode::Table(node) => &node.id,
            ViewNode::Column(node) => &node.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ViewNode::Table(node) => &node.label,
            ViewNode::Column(node) => &node.label,
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self, ViewNode::Column(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub style: EdgeStyle,
    pub arrows: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

impl ViewModel {
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn edge(&self, id: &str) -> Option<&ViewEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}

/// Project a document into a renderer view model.
///
/// Nodes come in table order, each table followed by its columns; edges follow
/// lineage order. Edges whose endpoints are not projected column nodes are
/// dangling and left out of the view (they stay in the document).
pub fn project(document: &GraphDocument) -> ViewModel {
    let mut nodes = Vec::with_capacity(document.tables.len() + document.column_count());
    let mut column_ids = HashSet::new();

    for table in &document.tables {
        nodes.push(ViewNode::Table(TableNode {
            id: table.id.clone(),
            label: table.name.clone(),
            position: table.position,
            physics: true,
            fixed: FixedAxes::FREE,
        }));

        for (slot, column) in table.columns.iter().enumerate() {
            let position = column.position.or_else(|| {
                table.position.map(|origin| Position {
                    x: origin.x,
                    y: origin.y + COLUMN_ROW_SPACING * (slot as f64 + 1.0),
                })
            });
            column_ids.insert(column.id.as_str());
            nodes.push(ViewNode::Column(ColumnNode {
                id: column.id.clone(),
                label: column.name.clone(),
                parent: table.id.clone(),
                position,
                physics: false,
                fixed: FixedAxes::PINNED,
            }));
        }
    }

    let edges = document
        .lineage
        .iter()
        .filter(|edge| {
            column_ids.contains(edge.source.as_str()) && column_ids.contains(edge.target.as_str())
        })
        .map(|edge| ViewEdge {
            id: edge.id.clone(),
            from: edge.source.clone(),
            to: edge.target.clone(),
            label: edge.description.clone(),
            color: edge.color.clone(),
            style: edge.style,
            arrows: edge.arrows_or_default().to_string(),
        })
        .collect();

    ViewModel { nodes, edges }
}
