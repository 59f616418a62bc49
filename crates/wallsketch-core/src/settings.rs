//! Editor settings read by the tools on every gesture.

use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// Radius of the endpoint magnet, matching the drawn endpoint circle.
pub const MAGNET_RADIUS: f64 = 15.0;

/// Reach of the axis-alignment magnet for guide lines.
pub const ALIGNMENT_RADIUS: f64 = 20.0;

/// User-facing editor settings. Every field falls back to its default when
/// missing from stored JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Tools respond only to stylus and mouse; touches pan.
    pub stylus_mode: bool,
    /// Dragged endpoints merge onto nearby endpoints.
    pub magnetic_mode: bool,
    /// New walls lock to an axis and align with existing walls.
    pub wall_alignment_mode: bool,
    pub selected_tool: ToolKind,
    /// Endpoint magnet radius in screen units.
    pub magnet_radius: f64,
    /// Alignment magnet radius in screen units.
    pub alignment_radius: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stylus_mode: true,
            magnetic_mode: true,
            wall_alignment_mode: true,
            selected_tool: ToolKind::Wall,
            magnet_radius: MAGNET_RADIUS,
            alignment_radius: ALIGNMENT_RADIUS,
        }
    }
}

impl Settings {
    /// Parse stored settings. Malformed input yields the defaults.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Failed to parse settings, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
