//! Fully in-memory host, used by the simulator and tests.

use super::bridge::{Action, ActionBridge};
use super::host::{ForegroundNotification, LifecycleHost, PermissionProbe, ToastDuration, Toaster};
use crate::surface::{
    DisplayMetrics, HeadlessWindowSystem, Size, SurfaceContent, SurfaceId, SurfaceSpec,
    WindowError, WindowSystem,
};

/// Host that records everything the core asks of it.
#[derive(Debug)]
pub struct HeadlessHost {
    pub window: HeadlessWindowSystem,

    /// Actions emitted on the bridge, oldest first
    pub actions: Vec<Action>,

    pub toasts: Vec<(String, ToastDuration)>,

    /// Value returned by the permission probe
    pub permission: bool,

    /// Notification while in the foreground
    pub foreground: Option<ForegroundNotification>,
}

impl HeadlessHost {
    pub fn new(window: HeadlessWindowSystem) -> Self {
        Self {
            window,
            actions: Vec::new(),
            toasts: Vec::new(),
            permission: true,
            foreground: None,
        }
    }

    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(HeadlessWindowSystem::default())
    }
}

impl WindowSystem for HeadlessHost {
    fn add_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError> {
        self.window.add_surface(id, spec)
    }

    fn update_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError> {
        self.window.update_surface(id, spec)
    }

    fn remove_surface(&mut self, id: SurfaceId) -> Result<(), WindowError> {
        self.window.remove_surface(id)
    }

    fn metrics(&self) -> DisplayMetrics {
        self.window.metrics()
    }

    fn set_metrics(&mut self, metrics: DisplayMetrics) {
        self.window.set_metrics(metrics);
    }

    fn measure(&self, content: &SurfaceContent) -> Size {
        self.window.measure(content)
    }
}

impl ActionBridge for HeadlessHost {
    fn emit(&mut self, action: Action) {
        tracing::debug!(action = action.method(), "Emitting action");
        self.actions.push(action);
    }
}

impl PermissionProbe for HeadlessHost {
    fn can_draw_overlays(&self) -> bool {
        self.permission
    }
}

impl Toaster for HeadlessHost {
    fn toast(&mut self, message: &str, duration: ToastDuration) {
        self.toasts.push((message.to_string(), duration));
    }
}

impl LifecycleHost for HeadlessHost {
    fn start_in_foreground(&mut self, notification: &ForegroundNotification) {
        self.foreground = Some(notification.clone());
    }

    fn stop_foreground(&mut self) {
        self.foreground = None;
    }
}
