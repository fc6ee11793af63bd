//! View content carried by overlay surfaces.
//!
//! The core does not draw pixels. It describes what each surface shows and the
//! host's window system renders it. All sizes here are physical pixels except
//! text sizes, which are scale-independent units.

use super::geometry::{Rect, Size};
use crate::platform::Icon;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const TRANSPARENT: Color = Color(0x0000_0000);

    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Content of an overlay surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceContent {
    Bubble(BubbleView),
    Menu(MenuView),
    Mask(MaskView),
}

impl SurfaceContent {
    /// Size the content wants when laid out without constraints.
    ///
    /// This is the hidden measurement pass used when the window system has no
    /// measure-without-attach primitive.
    pub fn intrinsic_size(&self, screen: Size) -> Size {
        match self {
            SurfaceContent::Bubble(bubble) => Size::new(bubble.diameter_px, bubble.diameter_px),
            SurfaceContent::Menu(menu) => menu.intrinsic_size(),
            SurfaceContent::Mask(_) => screen,
        }
    }
}

/// The circular bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleView {
    pub diameter_px: i32,
    pub background: Color,
    pub icon: Icon,
    pub icon_size_px: i32,
    pub icon_tint: Color,
    pub elevation_px: i32,
}

/// The expanded action menu: a vertical stack of buttons on a rounded card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuView {
    pub padding_px: i32,
    pub corner_radius_px: i32,
    pub background: Color,
    pub elevation_px: i32,
    pub buttons: Vec<MenuButtonView>,
}

impl MenuView {
    fn intrinsic_size(&self) -> Size {
        let widest = self.buttons.iter().map(|b| b.size_px).max().unwrap_or(0);
        let stacked: i32 = self
            .buttons
            .iter()
            .map(|b| b.margin_top_px + b.size_px + b.margin_bottom_px)
            .sum();
        Size::new(
            widest + 2 * self.padding_px,
            stacked + 2 * self.padding_px,
        )
    }
}

/// One square button in the menu stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuButtonView {
    pub icon: Icon,
    pub action: String,
    pub anchor: bool,
    pub size_px: i32,
    pub padding_px: i32,
    pub margin_top_px: i32,
    pub margin_bottom_px: i32,
    /// Solid circle behind the icon; `None` for a transparent button
    pub background: Option<Color>,
    pub tint: Color,
}

/// The full-screen translation mask.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaskView {
    pub blocks: Vec<MaskBlockView>,
}

/// A translated region drawn over its original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskBlockView {
    /// Absolute position and size inside the mask
    pub frame: Rect,
    pub background: Color,
    pub text: TextView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextView {
    pub text: String,
    pub color: Color,
    pub size_sp: f32,
    pub shadow: Shadow,
    pub centered: bool,
    pub include_font_padding: bool,
    pub translation_y_px: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub radius: f32,
    pub dx: f32,
    pub dy: f32,
    pub color: Color,
}
