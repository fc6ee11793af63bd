//! Overlay controllers.
//!
//! The bubble, the menu that replaces it, and the translation mask, plus the
//! view builders and colours they share.

pub mod bubble;
pub mod components;
pub mod mask;
pub mod menu;
pub mod theme;

pub use bubble::{BubbleAction, BubbleController, BubbleState};
pub use mask::{parse_payload, MaskController, MaskItem, PayloadError};
pub use menu::{MenuCommand, MenuController, MenuItem, MenuState, MenuTouchTarget};
pub use theme::Theme;
