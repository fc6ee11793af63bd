//! Overlay surfaces and the window system they live in.
//!
//! A [`Surface`] is either detached or attached. While attached, every change
//! to its geometry, content, visibility or alpha is pushed through
//! [`WindowSystem::update_surface`]. Mutating a detached surface only changes
//! the local record; the window system is never touched.

pub mod animation;
pub mod content;
pub mod geometry;
pub mod headless;
pub mod window;

pub use animation::{Animator, Fade, FadeEnd, FadeFrame};
pub use content::{
    BubbleView, Color, MaskBlockView, MaskView, MenuButtonView, MenuView, Shadow, SurfaceContent,
    TextView,
};
pub use geometry::{Dimension, Geometry, Gravity, HorizontalAnchor, Rect, Size, VerticalAnchor};
pub use headless::{HeadlessWindowSystem, WindowOp};
pub use window::{
    CutoutMode, DisplayMetrics, LayerType, LayoutParams, PixelFormat, SurfaceId, SurfaceSpec,
    WindowError, WindowFlags, WindowSystem,
};

use std::fmt;

/// Which controller owns a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    Bubble,
    Menu,
    Mask,
}

impl fmt::Display for SurfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceRole::Bubble => write!(f, "bubble"),
            SurfaceRole::Menu => write!(f, "menu"),
            SurfaceRole::Mask => write!(f, "mask"),
        }
    }
}

/// A top-level overlay window and its last known state.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    role: SurfaceRole,
    layout: LayoutParams,
    content: SurfaceContent,
    alpha: f32,
    visible: bool,
    attached: bool,
}

impl Surface {
    /// Create a detached, visible, opaque surface.
    pub fn new(
        id: SurfaceId,
        role: SurfaceRole,
        layout: LayoutParams,
        content: SurfaceContent,
    ) -> Self {
        Self {
            id,
            role,
            layout,
            content,
            alpha: 1.0,
            visible: true,
            attached: false,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn role(&self) -> SurfaceRole {
        self.role
    }

    pub fn layout(&self) -> &LayoutParams {
        &self.layout
    }

    pub fn geometry(&self) -> &Geometry {
        &self.layout.geometry
    }

    pub fn content(&self) -> &SurfaceContent {
        &self.content
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn spec(&self) -> SurfaceSpec {
        SurfaceSpec {
            layout: self.layout,
            content: self.content.clone(),
            alpha: self.alpha,
            visible: self.visible,
        }
    }

    /// Add the surface to the window system.
    pub fn attach(&mut self, window: &mut dyn WindowSystem) -> Result<(), WindowError> {
        if self.attached {
            return Err(WindowError::AlreadyAttached(self.id));
        }
        window.add_surface(self.id, &self.spec())?;
        self.attached = true;
        tracing::info!(surface = %self.id, role = %self.role, "Surface attached");
        Ok(())
    }

    /// Remove the surface from the window system.
    ///
    /// Detaching a detached surface is a no-op. Window system errors are
    /// logged and absorbed; the surface is considered detached afterwards.
    /// Returns whether the surface was attached.
    pub fn detach(&mut self, window: &mut dyn WindowSystem) -> bool {
        if !self.attached {
            tracing::debug!(surface = %self.id, "Detach ignored, surface not attached");
            return false;
        }
        self.attached = false;
        if let Err(e) = window.remove_surface(self.id) {
            tracing::warn!(surface = %self.id, error = %e, "Failed to remove surface");
        } else {
            tracing::info!(surface = %self.id, role = %self.role, "Surface detached");
        }
        true
    }

    /// Detach and re-attach, raising the surface above its same-layer peers.
    pub fn reattach(&mut self, window: &mut dyn WindowSystem) -> Result<(), WindowError> {
        if !self.attached {
            return Err(WindowError::NotAttached(self.id));
        }
        self.detach(window);
        self.attach(window)
    }

    pub fn set_geometry(&mut self, geometry: Geometry, window: &mut dyn WindowSystem) {
        self.layout.geometry = geometry;
        self.push(window);
    }

    pub fn set_layout(&mut self, layout: LayoutParams, window: &mut dyn WindowSystem) {
        self.layout = layout;
        self.push(window);
    }

    pub fn set_content(&mut self, content: SurfaceContent, window: &mut dyn WindowSystem) {
        self.content = content;
        self.push(window);
    }

    pub fn set_visible(&mut self, visible: bool, window: &mut dyn WindowSystem) {
        if self.visible != visible {
            self.visible = visible;
            self.push(window);
        }
    }

    pub fn set_alpha(&mut self, alpha: f32, window: &mut dyn WindowSystem) {
        let alpha = alpha.clamp(0.0, 1.0);
        if (self.alpha - alpha).abs() > f32::EPSILON {
            self.alpha = alpha;
            self.push(window);
        }
    }

    fn push(&mut self, window: &mut dyn WindowSystem) {
        if !self.attached {
            tracing::debug!(surface = %self.id, "Update discarded, surface not attached");
            return;
        }
        if let Err(e) = window.update_surface(self.id, &self.spec()) {
            tracing::warn!(surface = %self.id, error = %e, "Failed to update surface");
        }
    }
}
