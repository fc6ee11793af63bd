//! Menu card and its buttons.

use crate::surface::{DisplayMetrics, MenuButtonView, MenuView};
use crate::ui::menu::MenuItem;
use crate::ui::theme::{dims, Theme};

pub struct MenuButton;

impl MenuButton {
    /// Anchor items are a solid circle with a bottom gap; action items are
    /// transparent with a tinted glyph.
    pub fn build(item: &MenuItem, metrics: &DisplayMetrics, theme: &Theme) -> MenuButtonView {
        let (background, tint, margin_top, margin_bottom) = if item.anchor {
            (
                Some(theme.anchor_background),
                theme.anchor_icon,
                0,
                dims::ANCHOR_MARGIN_BOTTOM,
            )
        } else {
            (None, theme.action_icon, dims::ACTION_MARGIN, dims::ACTION_MARGIN)
        };
        MenuButtonView {
            icon: item.icon,
            action: item.action.clone(),
            anchor: item.anchor,
            size_px: metrics.dp_to_px(dims::MENU_BUTTON),
            padding_px: metrics.dp_to_px(dims::MENU_BUTTON_PADDING),
            margin_top_px: metrics.dp_to_px(margin_top),
            margin_bottom_px: metrics.dp_to_px(margin_bottom),
            background,
            tint,
        }
    }
}

pub struct MenuPanel;

impl MenuPanel {
    pub fn build(items: &[MenuItem], metrics: &DisplayMetrics, theme: &Theme) -> MenuView {
        MenuView {
            padding_px: metrics.dp_to_px(dims::MENU_PADDING),
            corner_radius_px: metrics.dp_to_px(dims::MENU_CORNER_RADIUS),
            background: theme.menu_background,
            elevation_px: metrics.dp_to_px(dims::MENU_ELEVATION),
            buttons: items
                .iter()
                .map(|item| MenuButton::build(item, metrics, theme))
                .collect(),
        }
    }
}
