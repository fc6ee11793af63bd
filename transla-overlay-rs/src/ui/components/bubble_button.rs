//! The circular bubble view.

use crate::platform::icons::{Icon, BUBBLE_ICON_DP};
use crate::surface::{BubbleView, DisplayMetrics};
use crate::ui::bubble::BubbleState;
use crate::ui::theme::{dims, Theme};

pub struct BubbleButton;

impl BubbleButton {
    /// Build the bubble for a state. Idle is purple with the edit glyph,
    /// active is red with the cancel glyph.
    pub fn build(
        state: BubbleState,
        diameter_dp: i32,
        metrics: &DisplayMetrics,
        theme: &Theme,
    ) -> BubbleView {
        let (background, icon) = match state {
            BubbleState::Idle => (theme.bubble_idle, Icon::Edit),
            BubbleState::OverlayActive => (theme.bubble_active, Icon::Cancel),
        };
        BubbleView {
            diameter_px: metrics.dp_to_px(diameter_dp),
            background,
            icon,
            icon_size_px: metrics.dp_to_px(BUBBLE_ICON_DP),
            icon_tint: theme.bubble_icon,
            elevation_px: metrics.dp_to_px(dims::BUBBLE_ELEVATION),
        }
    }
}
