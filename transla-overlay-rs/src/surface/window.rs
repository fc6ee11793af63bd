//! Overlay window system interface.
//!
//! The host owns the real top-level windows. The core asks it to add, update
//! and remove surfaces and reads display metrics from it.

use super::content::SurfaceContent;
use super::geometry::{Geometry, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;
use thiserror::Error;

/// Identifier of an overlay surface, stable for the surface's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    pub const BUBBLE: SurfaceId = SurfaceId(1);
    pub const MASK: SurfaceId = SurfaceId(2);
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Window layer used for overlay surfaces. Differs by OS version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerType {
    /// `TYPE_APPLICATION_OVERLAY`, API 26 and later
    ApplicationOverlay,

    /// `TYPE_PHONE`, before API 26
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    #[default]
    Translucent,
    Opaque,
}

/// How a surface is laid out around a display cutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoutMode {
    #[default]
    Default,
    ShortEdges,
}

/// Window flag set. Values match Android's `WindowManager.LayoutParams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowFlags(u32);

impl WindowFlags {
    pub const NOT_FOCUSABLE: WindowFlags = WindowFlags(0x0000_0008);
    pub const LAYOUT_IN_SCREEN: WindowFlags = WindowFlags(0x0000_0100);
    pub const LAYOUT_NO_LIMITS: WindowFlags = WindowFlags(0x0000_0200);
    pub const FULLSCREEN: WindowFlags = WindowFlags(0x0000_0400);

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: WindowFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for WindowFlags {
    type Output = WindowFlags;

    fn bitor(self, rhs: WindowFlags) -> WindowFlags {
        WindowFlags(self.0 | rhs.0)
    }
}

/// Window-level parameters of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub geometry: Geometry,
    pub flags: WindowFlags,
    pub format: PixelFormat,
    pub layer: LayerType,
    pub cutout: CutoutMode,
}

impl LayoutParams {
    /// Wrap-content, not focusable, translucent.
    pub fn floating(geometry: Geometry, layer: LayerType) -> Self {
        Self {
            geometry,
            flags: WindowFlags::NOT_FOCUSABLE,
            format: PixelFormat::Translucent,
            layer,
            cutout: CutoutMode::Default,
        }
    }
}

/// Everything the window system needs to show a surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceSpec {
    pub layout: LayoutParams,
    pub content: SurfaceContent,
    pub alpha: f32,
    pub visible: bool,
}

/// Display metrics reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    /// Physical pixels per density-independent pixel
    pub density: f32,
    pub width_px: i32,
    pub height_px: i32,
    /// OS API level, used to pick the layer type and cutout support
    pub api_level: u32,
}

impl DisplayMetrics {
    pub fn dp_to_px(&self, dp: i32) -> i32 {
        (dp as f32 * self.density).round() as i32
    }

    pub fn screen_size(&self) -> Size {
        Size::new(self.width_px, self.height_px)
    }
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            density: 1.0,
            width_px: 1080,
            height_px: 1920,
            api_level: 33,
        }
    }
}

/// Window system error types.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WindowError {
    #[error("{0} is already attached")]
    AlreadyAttached(SurfaceId),

    #[error("{0} is not attached")]
    NotAttached(SurfaceId),

    #[error("window system refused {id}: {reason}")]
    Refused { id: SurfaceId, reason: String },
}

/// Adds, updates and removes top-level overlay surfaces.
pub trait WindowSystem {
    /// Attach a surface. Fails if it is already attached or the host refuses it.
    fn add_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError>;

    /// Push new layout or content for an attached surface.
    fn update_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError>;

    /// Detach a surface.
    fn remove_surface(&mut self, id: SurfaceId) -> Result<(), WindowError>;

    fn metrics(&self) -> DisplayMetrics;

    /// The host reported new display metrics (rotation, density change).
    fn set_metrics(&mut self, metrics: DisplayMetrics);

    /// Measure content before it is attached.
    fn measure(&self, content: &SurfaceContent) -> Size {
        content.intrinsic_size(self.metrics().screen_size())
    }

    /// Layer type for overlay surfaces on this OS version.
    fn overlay_layer(&self) -> LayerType {
        if self.metrics().api_level >= 26 {
            LayerType::ApplicationOverlay
        } else {
            LayerType::Phone
        }
    }

    /// Whether the OS distinguishes display cutout modes.
    fn supports_cutout_modes(&self) -> bool {
        self.metrics().api_level >= 28
    }
}
