//! View builders for the overlay surfaces.

pub mod bubble_button;
pub mod mask_block;
pub mod menu_button;

pub use bubble_button::BubbleButton;
pub use mask_block::MaskBlock;
pub use menu_button::{MenuButton, MenuPanel};
