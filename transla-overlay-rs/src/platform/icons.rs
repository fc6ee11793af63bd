//! Icon glyphs used by overlay surfaces.
//!
//! The core only names icons; the host resolves them to drawables.

use serde::{Deserialize, Serialize};

/// Icon size inside the bubble, in dp.
pub const BUBBLE_ICON_DP: i32 = 24;

/// A glyph shown on the bubble or a menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Idle bubble
    Edit,

    /// Bubble while the mask is shown
    Cancel,

    /// Menu anchor
    SortBySize,

    Camera,
    Crop,
}
