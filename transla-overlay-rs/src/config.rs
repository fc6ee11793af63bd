//! Overlay service configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Unknown keys are ignored.

use crate::gesture::GestureConfig;
use crate::platform::{ForegroundNotification, Icon};
use crate::platform::bridge::{START_AREA_SELECTION, TRANSLATE_FULLSCREEN};
use crate::ui::MenuItem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub gesture: GestureConfig,

    /// Bubble diameter
    pub bubble_size_dp: i32,

    /// Initial gap between the bubble and the screen edge
    pub bubble_margin_dp: i32,

    /// Menu fade in/out duration
    pub fade_duration_ms: u64,

    /// Action buttons below the anchor, top to bottom
    pub menu_actions: Vec<MenuItem>,

    pub notification: ForegroundNotification,

    /// Tracing filter, e.g. `"debug"` or `"transla_overlay_rs=trace"`
    pub log_level: Option<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            bubble_size_dp: 56,
            bubble_margin_dp: 8,
            fade_duration_ms: 200,
            menu_actions: vec![
                MenuItem::action(Icon::Camera, TRANSLATE_FULLSCREEN),
                MenuItem::action(Icon::Crop, START_AREA_SELECTION),
            ],
            notification: ForegroundNotification::default(),
            log_level: None,
        }
    }
}

impl OverlayConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).context("Failed to parse overlay config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }
}
