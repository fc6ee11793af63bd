//! Touch gesture handling for overlay surfaces.
//!
//! [`GestureRecognizer`] turns a touch sequence on one surface into a click,
//! a long-press or a drag. [`AnchorTouchListener`] lets a child button drag
//! its parent surface while keeping its own click.

pub mod anchor;
pub mod recognizer;

pub use anchor::AnchorTouchListener;
pub use recognizer::{GestureContext, GesturePhase, GestureRecognizer};

use serde::{Deserialize, Serialize};

/// Surface a recognizer is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureTarget {
    Bubble,
    Menu,
}

/// Gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Upper bound on the duration of a tap
    pub click_time_max_ms: u64,

    /// Motion separating a tap from a drag, in pixels
    pub drag_tolerance_px: f32,

    /// Dwell time that triggers a long-press
    pub long_press_delay_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            click_time_max_ms: 200,
            drag_tolerance_px: 10.0,
            long_press_delay_ms: 500,
        }
    }
}

impl GestureConfig {
    /// Tap predicate shared by the recognizer and the anchor listener.
    pub fn is_tap(&self, duration_ms: u64, dx: f32, dy: f32) -> bool {
        duration_ms < self.click_time_max_ms && dx.abs() + dy.abs() < self.drag_tolerance_px
    }

    pub fn exceeds_drag_tolerance(&self, dx: f32, dy: f32) -> bool {
        dx.abs() > self.drag_tolerance_px || dy.abs() > self.drag_tolerance_px
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// One pointer event in raw screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub raw_x: f32,
    pub raw_y: f32,
    /// Event time on the host clock
    pub time_ms: u64,
}

impl TouchEvent {
    pub fn new(action: TouchAction, raw_x: f32, raw_y: f32, time_ms: u64) -> Self {
        Self {
            action,
            raw_x,
            raw_y,
            time_ms,
        }
    }

    pub fn down(raw_x: f32, raw_y: f32, time_ms: u64) -> Self {
        Self::new(TouchAction::Down, raw_x, raw_y, time_ms)
    }

    pub fn moved(raw_x: f32, raw_y: f32, time_ms: u64) -> Self {
        Self::new(TouchAction::Move, raw_x, raw_y, time_ms)
    }

    pub fn up(raw_x: f32, raw_y: f32, time_ms: u64) -> Self {
        Self::new(TouchAction::Up, raw_x, raw_y, time_ms)
    }

    pub fn cancel(time_ms: u64) -> Self {
        Self::new(TouchAction::Cancel, 0.0, 0.0, time_ms)
    }
}
