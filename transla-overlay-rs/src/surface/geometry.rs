//! Anchored overlay geometry.
//!
//! Overlay windows are positioned by an offset from an anchor edge rather than
//! by absolute screen coordinates. A surface anchored to the end edge measures
//! `x` from the right side of the screen, so a pointer moving right must shrink
//! `x`. [`Geometry::apply_delta`] owns that sign rule; callers never flip it.

use serde::{Deserialize, Serialize};

/// Horizontal edge that `x` is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAnchor {
    /// `x` is the distance from the left screen edge
    #[default]
    Start,

    /// `x` is the distance from the right screen edge
    End,
}

/// Vertical reference that `y` is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAnchor {
    /// `y` is the distance from the top screen edge
    #[default]
    Top,

    /// `y` is the offset of the surface centre from the screen centre
    Center,

    /// `y` is the distance from the bottom screen edge
    Bottom,
}

/// Anchor specification for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gravity {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Gravity {
    /// `START|TOP`, used by full-screen surfaces.
    pub const TOP_START: Gravity = Gravity {
        horizontal: HorizontalAnchor::Start,
        vertical: VerticalAnchor::Top,
    };

    /// `END|CENTER_VERTICAL`, the bubble's home anchor.
    pub const END_CENTER_VERTICAL: Gravity = Gravity {
        horizontal: HorizontalAnchor::End,
        vertical: VerticalAnchor::Center,
    };

    pub fn is_end(&self) -> bool {
        self.horizontal == HorizontalAnchor::End
    }
}

/// Requested extent of a surface along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Size to content (measured by the window system)
    #[default]
    WrapContent,

    /// Fill the screen along this axis
    MatchParent,

    /// Fixed size in physical pixels
    Px(i32),
}

/// Width and height in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in screen pixels, stored as origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Geometry record of an overlay window: `(gravity, x, y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub gravity: Gravity,
    pub x: i32,
    pub y: i32,
    pub width: Dimension,
    pub height: Dimension,
}

impl Geometry {
    /// A wrap-content surface anchored at `(x, y)`.
    pub fn anchored(gravity: Gravity, x: i32, y: i32) -> Self {
        Self {
            gravity,
            x,
            y,
            width: Dimension::WrapContent,
            height: Dimension::WrapContent,
        }
    }

    /// A surface that covers the whole screen.
    pub fn full_screen() -> Self {
        Self {
            gravity: Gravity::TOP_START,
            x: 0,
            y: 0,
            width: Dimension::MatchParent,
            height: Dimension::MatchParent,
        }
    }

    /// Move the surface by a pointer delta measured from `origin`.
    ///
    /// `origin` is the `(x, y)` the surface had when the gesture began. The
    /// delta is in screen direction (positive `dx` = finger moved right,
    /// positive `dy` = finger moved down) and is mapped onto the anchored
    /// offsets.
    pub fn apply_delta(&mut self, origin: (i32, i32), dx: i32, dy: i32) {
        self.x = match self.gravity.horizontal {
            HorizontalAnchor::End => origin.0 - dx,
            HorizontalAnchor::Start => origin.0 + dx,
        };
        self.y = match self.gravity.vertical {
            VerticalAnchor::Bottom => origin.1 - dy,
            VerticalAnchor::Top | VerticalAnchor::Center => origin.1 + dy,
        };
    }

    /// Resolve this geometry to an absolute rectangle on a screen.
    ///
    /// `content` is the measured size, used for wrap-content axes.
    pub fn screen_rect(&self, content: Size, screen: Size) -> Rect {
        let width = resolve(self.width, content.width, screen.width);
        let height = resolve(self.height, content.height, screen.height);

        let left = match self.gravity.horizontal {
            HorizontalAnchor::Start => self.x,
            HorizontalAnchor::End => screen.width - self.x - width,
        };
        let top = match self.gravity.vertical {
            VerticalAnchor::Top => self.y,
            VerticalAnchor::Center => (screen.height - height) / 2 + self.y,
            VerticalAnchor::Bottom => screen.height - self.y - height,
        };

        Rect::new(left, top, width, height)
    }
}

fn resolve(dimension: Dimension, content: i32, screen: i32) -> i32 {
    match dimension {
        Dimension::WrapContent => content,
        Dimension::MatchParent => screen,
        Dimension::Px(px) => px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_anchor_inverts_horizontal_delta() {
        let mut g = Geometry::anchored(Gravity::END_CENTER_VERTICAL, 8, 0);
        g.apply_delta((8, 0), 100, 0);
        assert_eq!(g.x, -92);
        assert_eq!(g.y, 0);
    }

    #[test]
    fn test_start_anchor_follows_pointer() {
        let mut g = Geometry::anchored(Gravity::TOP_START, 20, 40);
        g.apply_delta((20, 40), 15, -5);
        assert_eq!((g.x, g.y), (35, 35));
    }

    #[test]
    fn test_bottom_anchor_inverts_vertical_delta() {
        let mut g = Geometry::anchored(
            Gravity {
                horizontal: HorizontalAnchor::Start,
                vertical: VerticalAnchor::Bottom,
            },
            0,
            50,
        );
        g.apply_delta((0, 50), 0, 30);
        assert_eq!(g.y, 20);
    }

    #[test]
    fn test_screen_rect_for_end_center_anchor() {
        let g = Geometry::anchored(Gravity::END_CENTER_VERTICAL, 8, 0);
        let rect = g.screen_rect(Size::new(56, 56), Size::new(1080, 1920));
        assert_eq!(rect, Rect::new(1080 - 8 - 56, (1920 - 56) / 2, 56, 56));
    }
}
