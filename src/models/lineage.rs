//! Lineage edge models

use serde::{Deserialize, Serialize};

/// Arrow style used when an edge does not carry one
pub const DEFAULT_ARROWS: &str = "to";

/// Line style of a lineage edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Directed column-to-column lineage: data in `source` flows into `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageEdge {
    pub id: String,
    /// Source column id
    pub source: String,
    /// Target column id
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrows: Option<String>,
}

impl LineageEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            description: None,
            color: None,
            style: EdgeStyle::Solid,
            arrows: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn arrows_or_default(&self) -> &str {
        self.arrows.as_deref().unwrap_or(DEFAULT_ARROWS)
    }

    pub fn apply(&mut self, patch: EdgePatch) {
        if let Some(description) = patch.description {
            let trimmed = description.trim();
            self.description = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(style) = patch.style {
            self.style = style;
        }
        if let Some(arrows) = patch.arrows {
            self.arrows = Some(arrows);
        }
    }
}

/// Partial update of an edge's display properties. `None` leaves a field as is;
/// a blank description clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePatch {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub style: Option<EdgeStyle>,
    #[serde(default)]
    pub arrows: Option<String>,
}

impl EdgePatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.color.is_none() && self.style.is_none() && self.arrows.is_none()
    }
}
