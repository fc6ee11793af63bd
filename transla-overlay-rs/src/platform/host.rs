//! Host services the core depends on besides the window system.

use super::bridge::ActionBridge;
use crate::surface::WindowSystem;
use serde::{Deserialize, Serialize};

/// Answers whether the app may draw over other apps.
pub trait PermissionProbe {
    fn can_draw_overlays(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastDuration {
    Short,
    Long,
}

/// Shows short human-readable messages.
pub trait Toaster {
    fn toast(&mut self, message: &str, duration: ToastDuration);
}

/// Notification posted while the overlay service runs in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForegroundNotification {
    pub channel_id: String,
    pub channel_name: String,
    pub notification_id: i32,
    pub title: String,
    pub text: String,
    /// Post on a low-importance channel without sound
    pub low_priority: bool,
}

impl Default for ForegroundNotification {
    fn default() -> Self {
        Self {
            channel_id: "FloatingBubbleChannel".to_string(),
            channel_name: "Floating Bubble Service".to_string(),
            notification_id: 1001,
            title: "Screen translation".to_string(),
            text: "Translation bubble is running".to_string(),
            low_priority: true,
        }
    }
}

/// Keeps the process resident while overlays are shown.
pub trait LifecycleHost {
    fn start_in_foreground(&mut self, notification: &ForegroundNotification);
    fn stop_foreground(&mut self);
}

/// Everything the overlay service needs from its host.
pub trait OverlayHost: WindowSystem + ActionBridge + PermissionProbe + Toaster + LifecycleHost {}

impl<T> OverlayHost for T where
    T: WindowSystem + ActionBridge + PermissionProbe + Toaster + LifecycleHost
{
}
