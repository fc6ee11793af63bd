//! The draggable bubble: the user's entry point to translation actions.
//!
//! The controller owns the bubble surface, its last known anchor geometry and
//! the gesture binding for the current [`BubbleState`]. Dragging works in both
//! states; click and long-click change with the state.

use crate::error::OverlayError;
use crate::gesture::{GestureConfig, GestureRecognizer, GestureTarget, TouchEvent};
use crate::scheduler::{Scheduler, TimerId};
use crate::surface::{
    Geometry, Gravity, LayoutParams, Surface, SurfaceContent, SurfaceId, SurfaceRole,
    WindowSystem,
};
use crate::ui::components::BubbleButton;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BubbleState {
    #[default]
    Idle,

    /// The translation mask is shown
    OverlayActive,
}

/// What a bubble gesture asks the service to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleAction {
    OpenMenu,
    TranslateFullscreen,
    TeardownMask,
}

impl BubbleState {
    /// `(click, long_click)` bound while in this state.
    pub fn bindings(&self) -> (Option<BubbleAction>, Option<BubbleAction>) {
        match self {
            BubbleState::Idle => (
                Some(BubbleAction::OpenMenu),
                Some(BubbleAction::TranslateFullscreen),
            ),
            BubbleState::OverlayActive => (Some(BubbleAction::TeardownMask), None),
        }
    }
}

pub struct BubbleController {
    theme: Theme,
    diameter_dp: i32,
    margin_dp: i32,
    state: BubbleState,
    /// Kept after `hide` so the next `show` reuses its geometry
    surface: Option<Surface>,
    gesture: GestureRecognizer<BubbleAction>,
}

impl BubbleController {
    pub fn new(gesture: GestureConfig, diameter_dp: i32, margin_dp: i32, theme: Theme) -> Self {
        let (click, long_click) = BubbleState::Idle.bindings();
        Self {
            theme,
            diameter_dp,
            margin_dp,
            state: BubbleState::Idle,
            surface: None,
            gesture: GestureRecognizer::new(gesture, GestureTarget::Bubble, click, long_click),
        }
    }

    pub fn state(&self) -> BubbleState {
        self.state
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }

    pub fn is_attached(&self) -> bool {
        self.surface.as_ref().is_some_and(Surface::is_attached)
    }

    pub fn is_visible(&self) -> bool {
        self.surface
            .as_ref()
            .is_some_and(|s| s.is_attached() && s.is_visible())
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.surface.as_ref().map(|s| *s.geometry())
    }

    /// Bubble diameter in physical pixels.
    pub fn diameter_px(&self, window: &dyn WindowSystem) -> i32 {
        window.metrics().dp_to_px(self.diameter_dp)
    }

    /// Create and attach the bubble, or re-attach a hidden one at its last
    /// geometry. A no-op while attached.
    pub fn show(&mut self, window: &mut dyn WindowSystem) -> Result<(), OverlayError> {
        if self.is_attached() {
            tracing::debug!("Bubble already shown");
            return Ok(());
        }

        let content = self.content(window);
        match self.surface.as_mut() {
            Some(surface) => surface.set_content(content, window),
            None => {
                let margin = window.metrics().dp_to_px(self.margin_dp);
                let layout = LayoutParams::floating(
                    Geometry::anchored(Gravity::END_CENTER_VERTICAL, margin, 0),
                    window.overlay_layer(),
                );
                self.surface = Some(Surface::new(
                    SurfaceId::BUBBLE,
                    SurfaceRole::Bubble,
                    layout,
                    content,
                ));
            }
        }
        if let Some(surface) = self.surface.as_mut() {
            surface
                .attach(window)
                .map_err(|e| OverlayError::attach(SurfaceId::BUBBLE, e))?;
        }
        tracing::info!(state = ?self.state, "Bubble shown");
        Ok(())
    }

    /// Detach the bubble, keeping its geometry for the next `show`.
    pub fn hide(&mut self, window: &mut dyn WindowSystem, scheduler: &mut Scheduler) {
        self.gesture.reset(scheduler);
        if let Some(surface) = self.surface.as_mut() {
            surface.detach(window);
        }
    }

    /// Hide or reveal the bubble without detaching it.
    pub fn set_visible(&mut self, visible: bool, window: &mut dyn WindowSystem) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_visible(visible, window);
        }
    }

    pub fn set_geometry(&mut self, geometry: Geometry, window: &mut dyn WindowSystem) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_geometry(geometry, window);
        }
    }

    /// Swap appearance and gesture bindings.
    pub fn set_state(&mut self, state: BubbleState, window: &mut dyn WindowSystem) {
        if self.state == state {
            return;
        }
        tracing::debug!(from = ?self.state, to = ?state, "Bubble state changed");
        self.state = state;
        let (click, long_click) = state.bindings();
        self.gesture.bind(click, long_click);
        let content = self.content(window);
        if let Some(surface) = self.surface.as_mut() {
            surface.set_content(content, window);
        }
    }

    /// Rebuild the bubble view, e.g. after a density change.
    pub fn refresh(&mut self, window: &mut dyn WindowSystem) {
        let content = self.content(window);
        if let Some(surface) = self.surface.as_mut() {
            surface.set_content(content, window);
        }
    }

    /// Re-attach the bubble so it is drawn above other overlay surfaces.
    pub fn bring_to_front(&mut self, window: &mut dyn WindowSystem) -> Result<(), OverlayError> {
        match self.surface.as_mut() {
            Some(surface) if surface.is_attached() => surface
                .reattach(window)
                .map_err(|e| OverlayError::attach(SurfaceId::BUBBLE, e)),
            _ => Ok(()),
        }
    }

    pub fn handle_touch(
        &mut self,
        event: &TouchEvent,
        window: &mut dyn WindowSystem,
        scheduler: &mut Scheduler,
    ) -> Option<BubbleAction> {
        let surface = self.surface.as_mut().filter(|s| s.is_attached())?;
        self.gesture.on_touch(event, surface, window, scheduler)
    }

    pub fn on_long_press_timeout(&mut self, timer: TimerId) -> Option<BubbleAction> {
        self.gesture.on_long_press_timeout(timer)
    }

    /// Drop the bubble entirely.
    pub fn destroy(&mut self, window: &mut dyn WindowSystem, scheduler: &mut Scheduler) {
        self.gesture.reset(scheduler);
        if let Some(mut surface) = self.surface.take() {
            surface.detach(window);
        }
        self.state = BubbleState::Idle;
        let (click, long_click) = BubbleState::Idle.bindings();
        self.gesture.bind(click, long_click);
    }

    fn content(&self, window: &dyn WindowSystem) -> SurfaceContent {
        SurfaceContent::Bubble(BubbleButton::build(
            self.state,
            self.diameter_dp,
            &window.metrics(),
            &self.theme,
        ))
    }
}
