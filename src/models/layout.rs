//! Layout configuration carried with a lineage document.
//!
//! The engine never interprets these values; they are persisted for the renderer.

use serde::{Deserialize, Serialize};

/// Schema version tag written into new documents
pub const LAYOUT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutDirection {
    #[default]
    Lr,
    Rl,
    Ud,
    Du,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    #[serde(default)]
    pub direction: LayoutDirection,
    #[serde(default = "default_node_spacing")]
    pub node_spacing: f64,
    #[serde(default = "default_level_spacing")]
    pub level_spacing: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::default(),
            node_spacing: default_node_spacing(),
            level_spacing: default_level_spacing(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_layout_version")]
    pub layout_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub layout: LayoutSettings,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout_version: default_layout_version(),
            theme: None,
            layout: LayoutSettings::default(),
        }
    }
}

fn default_layout_version() -> String {
    LAYOUT_VERSION.to_string()
}

fn default_node_spacing() -> f64 {
    100.0
}

fn default_level_spacing() -> f64 {
    200.0
}
