//! In-memory window system.
//!
//! Keeps a Z-ordered stack of attached surfaces and a log of every operation.
//! Used by the simulator binary and by tests.

use super::content::SurfaceContent;
use super::geometry::{Rect, Size};
use super::window::{DisplayMetrics, SurfaceId, SurfaceSpec, WindowError, WindowSystem};
use std::collections::HashMap;

/// An operation performed on the headless window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOp {
    Add(SurfaceId),
    Update(SurfaceId),
    Remove(SurfaceId),
}

#[derive(Debug, Default)]
pub struct HeadlessWindowSystem {
    metrics: DisplayMetrics,
    /// Bottom to top
    stack: Vec<SurfaceId>,
    specs: HashMap<SurfaceId, SurfaceSpec>,
    ops: Vec<WindowOp>,
    /// One-shot refusal, optionally limited to one surface
    refuse_add: Option<(Option<SurfaceId>, String)>,
    menu_size: Option<Size>,
}

impl HeadlessWindowSystem {
    pub fn new(metrics: DisplayMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Report a fixed size when measuring menu content.
    pub fn with_menu_size(mut self, size: Size) -> Self {
        self.menu_size = Some(size);
        self
    }

    /// Make the next `add_surface` fail with `reason`.
    pub fn refuse_next_add(&mut self, reason: impl Into<String>) {
        self.refuse_add = Some((None, reason.into()));
    }

    /// Make the next `add_surface` of `id` fail with `reason`. Other surfaces
    /// attach normally.
    pub fn refuse_next_add_of(&mut self, id: SurfaceId, reason: impl Into<String>) {
        self.refuse_add = Some((Some(id), reason.into()));
    }

    pub fn is_attached(&self, id: SurfaceId) -> bool {
        self.specs.contains_key(&id)
    }

    pub fn spec(&self, id: SurfaceId) -> Option<&SurfaceSpec> {
        self.specs.get(&id)
    }

    /// Attached surfaces, bottom to top.
    pub fn z_order(&self) -> &[SurfaceId] {
        &self.stack
    }

    pub fn topmost(&self) -> Option<SurfaceId> {
        self.stack.last().copied()
    }

    pub fn attached_count(&self) -> usize {
        self.stack.len()
    }

    pub fn ops(&self) -> &[WindowOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<WindowOp> {
        std::mem::take(&mut self.ops)
    }

    /// Where an attached surface sits on screen.
    pub fn screen_rect(&self, id: SurfaceId) -> Option<Rect> {
        let spec = self.specs.get(&id)?;
        let measured = self.measure(&spec.content);
        Some(
            spec.layout
                .geometry
                .screen_rect(measured, self.metrics.screen_size()),
        )
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn add_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError> {
        if self.specs.contains_key(&id) {
            return Err(WindowError::AlreadyAttached(id));
        }
        let refused = matches!(&self.refuse_add, Some((target, _)) if target.map_or(true, |t| t == id));
        if refused {
            if let Some((_, reason)) = self.refuse_add.take() {
                return Err(WindowError::Refused { id, reason });
            }
        }
        self.specs.insert(id, spec.clone());
        self.stack.push(id);
        self.ops.push(WindowOp::Add(id));
        Ok(())
    }

    fn update_surface(&mut self, id: SurfaceId, spec: &SurfaceSpec) -> Result<(), WindowError> {
        let slot = self.specs.get_mut(&id).ok_or(WindowError::NotAttached(id))?;
        *slot = spec.clone();
        self.ops.push(WindowOp::Update(id));
        Ok(())
    }

    fn remove_surface(&mut self, id: SurfaceId) -> Result<(), WindowError> {
        self.specs.remove(&id).ok_or(WindowError::NotAttached(id))?;
        self.stack.retain(|s| *s != id);
        self.ops.push(WindowOp::Remove(id));
        Ok(())
    }

    fn metrics(&self) -> DisplayMetrics {
        self.metrics
    }

    fn set_metrics(&mut self, metrics: DisplayMetrics) {
        self.metrics = metrics;
    }

    fn measure(&self, content: &SurfaceContent) -> Size {
        match (content, self.menu_size) {
            (SurfaceContent::Menu(_), Some(size)) => size,
            _ => content.intrinsic_size(self.metrics.screen_size()),
        }
    }
}
