//! Interfaces to the host platform.
//!
//! The Action Bridge, Permission Probe, toasts and Lifecycle Host, plus an
//! in-memory host implementing all of them.

pub mod bridge;
pub mod headless;
pub mod host;
pub mod icons;

pub use bridge::{Action, ActionBridge, ActionMessage, ChannelBridge};
pub use headless::HeadlessHost;
pub use host::{
    ForegroundNotification, LifecycleHost, OverlayHost, PermissionProbe, ToastDuration, Toaster,
};
pub use icons::Icon;
