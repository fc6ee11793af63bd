//! Alpha fades driven by the host's frame clock.

use super::window::SurfaceId;

/// What happens to a surface when its fade completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeEnd {
    /// Leave the surface as it is
    Keep,

    /// Detach the surface. A no-op if it was already detached another way.
    Detach,
}

/// A linear alpha animation on one surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub surface: SurfaceId,
    pub from: f32,
    pub to: f32,
    pub started_at_ms: u64,
    pub duration_ms: u64,
    pub end: FadeEnd,
}

impl Fade {
    pub fn new(surface: SurfaceId, from: f32, to: f32, now_ms: u64, duration_ms: u64) -> Self {
        Self {
            surface,
            from,
            to,
            started_at_ms: now_ms,
            duration_ms,
            end: FadeEnd::Keep,
        }
    }

    pub fn then(mut self, end: FadeEnd) -> Self {
        self.end = end;
        self
    }

    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms >= self.started_at_ms.saturating_add(self.duration_ms)
    }

    pub fn alpha_at(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 || self.is_finished(now_ms) {
            return self.to;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f32;
        let t = elapsed / self.duration_ms as f32;
        self.from + (self.to - self.from) * t
    }
}

/// One frame of output from [`Animator::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeFrame {
    pub surface: SurfaceId,
    pub alpha: f32,
    /// Set on the last frame of a fade
    pub finished: Option<FadeEnd>,
}

/// Running fades, at most one per surface.
#[derive(Debug, Default)]
pub struct Animator {
    fades: Vec<Fade>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fade. A fade already running on the same surface is dropped
    /// without running its end action.
    pub fn start(&mut self, fade: Fade) {
        self.fades.retain(|f| f.surface != fade.surface);
        self.fades.push(fade);
    }

    pub fn cancel(&mut self, surface: SurfaceId) {
        self.fades.retain(|f| f.surface != surface);
    }

    pub fn clear(&mut self) {
        self.fades.clear();
    }

    pub fn is_animating(&self, surface: SurfaceId) -> bool {
        self.fades.iter().any(|f| f.surface == surface)
    }

    pub fn is_idle(&self) -> bool {
        self.fades.is_empty()
    }

    /// Sample every running fade at `now_ms` and retire the finished ones.
    pub fn advance(&mut self, now_ms: u64) -> Vec<FadeFrame> {
        let frames: Vec<FadeFrame> = self
            .fades
            .iter()
            .map(|fade| FadeFrame {
                surface: fade.surface,
                alpha: fade.alpha_at(now_ms),
                finished: fade.is_finished(now_ms).then_some(fade.end),
            })
            .collect();
        self.fades.retain(|f| !f.is_finished(now_ms));
        frames
    }
}
