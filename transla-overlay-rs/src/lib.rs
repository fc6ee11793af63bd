//! Transla Overlay - Library
//!
//! Controller core of an on-screen translation overlay: a draggable bubble
//! that opens an action menu, and a full-screen mask that redraws translated
//! text over the regions it was captured from.
//!
//! ## Features
//!
//! - Click, long-press and drag recognition with mirrored end-edge coordinates
//! - Menu that expands from and collapses back onto the bubble's corner
//! - Translation mask with per-region text placement and visibility broadcasts
//! - Host-agnostic window system, action bridge and lifecycle interfaces
//! - In-memory host for tests and the `transla-overlay-sim` replay tool

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod gesture;
pub mod logging;
pub mod platform;
pub mod scheduler;
pub mod surface;
pub mod ui;

pub use app::{CommandReply, HostCommand, OverlayService, TouchInput, TouchTarget};
pub use config::OverlayConfig;
pub use error::{CommandErrorCode, OverlayError};
pub use events::OverlayEvent;
pub use gesture::{GestureConfig, TouchAction, TouchEvent};
pub use platform::{Action, ActionBridge, HeadlessHost, OverlayHost};
pub use surface::{DisplayMetrics, HeadlessWindowSystem, SurfaceId, WindowSystem};
pub use ui::{BubbleState, MenuItem, MenuTouchTarget};
