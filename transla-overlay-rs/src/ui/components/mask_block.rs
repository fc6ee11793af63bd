//! A translated block drawn over its source region.

use crate::surface::{MaskBlockView, Shadow, TextView};
use crate::ui::mask::MaskItem;
use crate::ui::theme::Theme;

/// Smallest text size, in sp.
pub const MIN_TEXT_SP: f32 = 14.0;

/// Text size as a share of the block height.
pub const TEXT_HEIGHT_RATIO: f32 = 0.2;

const TEXT_OFFSET_Y_PX: i32 = -4;

pub struct MaskBlock;

impl MaskBlock {
    pub fn build(item: &MaskItem, theme: &Theme) -> MaskBlockView {
        MaskBlockView {
            frame: item.bbox,
            background: theme.mask_block,
            text: TextView {
                text: item.translated_text.clone(),
                color: theme.mask_text,
                size_sp: text_size_sp(item.bbox.height),
                shadow: Shadow {
                    radius: 3.0,
                    dx: 1.0,
                    dy: 1.0,
                    color: theme.mask_text_shadow,
                },
                centered: true,
                include_font_padding: false,
                translation_y_px: TEXT_OFFSET_Y_PX,
            },
        }
    }
}

pub fn text_size_sp(block_height: i32) -> f32 {
    (block_height as f32 * TEXT_HEIGHT_RATIO).max(MIN_TEXT_SP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Rect;

    #[test]
    fn test_text_size_has_floor() {
        assert_eq!(text_size_sp(40), 14.0);
        assert_eq!(text_size_sp(80), 16.0);
        assert_eq!(text_size_sp(200), 40.0);
    }

    #[test]
    fn test_block_fills_bbox() {
        let item = MaskItem {
            bbox: Rect::new(100, 200, 300, 80),
            translated_text: "hello".into(),
            original_text: String::new(),
        };
        let block = MaskBlock::build(&item, &Theme::default());
        assert_eq!(block.frame, Rect::new(100, 200, 300, 80));
        assert_eq!(block.background.alpha(), 0x66);
        assert_eq!(block.text.translation_y_px, -4);
        assert!(!block.text.include_font_padding);
    }
}
