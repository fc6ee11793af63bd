//! Overlay colours and dimensions.

use crate::surface::Color;

/// Colours used by the bubble, menu and mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Bubble while idle (translucent purple)
    pub bubble_idle: Color,

    /// Bubble while the mask is shown
    pub bubble_active: Color,

    pub bubble_icon: Color,

    /// Rounded card behind the menu buttons
    pub menu_background: Color,

    /// Solid circle behind the anchor button
    pub anchor_background: Color,

    pub anchor_icon: Color,

    pub action_icon: Color,

    /// Backdrop of each translated block (40% black)
    pub mask_block: Color,

    pub mask_text: Color,

    pub mask_text_shadow: Color,
}

impl Theme {
    pub fn overlay() -> Self {
        Self {
            bubble_idle: Color(0xAA9C_27B0),
            bubble_active: Color(0xFFD3_2F2F),
            bubble_icon: Color::WHITE,
            menu_background: Color(0xE6D3_E8FD),
            anchor_background: Color(0xFF21_96F3),
            anchor_icon: Color::WHITE,
            action_icon: Color(0xFF55_5555),
            mask_block: Color(0x6600_0000),
            mask_text: Color::WHITE,
            mask_text_shadow: Color::BLACK,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::overlay()
    }
}

/// Dimensions in dp.
pub mod dims {
    pub const BUBBLE_ELEVATION: i32 = 4;
    pub const MENU_PADDING: i32 = 8;
    pub const MENU_CORNER_RADIUS: i32 = 28;
    pub const MENU_ELEVATION: i32 = 4;
    pub const MENU_BUTTON: i32 = 48;
    pub const MENU_BUTTON_PADDING: i32 = 12;
    pub const ANCHOR_MARGIN_BOTTOM: i32 = 12;
    pub const ACTION_MARGIN: i32 = 4;
}
