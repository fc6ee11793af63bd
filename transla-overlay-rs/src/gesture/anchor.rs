//! Composite listener for a button that both taps and drags its parent.
//!
//! DOWN and MOVE go verbatim to the parent's recognizer so its context tracks
//! the pointer. On UP the listener evaluates its own tap predicate against the
//! point where the press started on the button, then forwards the UP.

use super::recognizer::GestureRecognizer;
use super::{GestureConfig, TouchAction, TouchEvent};
use crate::scheduler::Scheduler;
use crate::surface::{Surface, WindowSystem};

#[derive(Debug, Clone, Copy)]
struct Press {
    pointer_x: f32,
    pointer_y: f32,
    time_ms: u64,
}

#[derive(Debug, Default)]
pub struct AnchorTouchListener {
    config: GestureConfig,
    press: Option<Press>,
}

impl AnchorTouchListener {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
        }
    }

    /// Handle one event on the anchor. Returns true when the sequence ended as
    /// a tap on the anchor itself.
    pub fn on_touch<A: Clone>(
        &mut self,
        event: &TouchEvent,
        parent: &mut GestureRecognizer<A>,
        surface: &mut Surface,
        window: &mut dyn WindowSystem,
        scheduler: &mut Scheduler,
    ) -> bool {
        let mut clicked = false;
        match event.action {
            TouchAction::Down => {
                self.press = Some(Press {
                    pointer_x: event.raw_x,
                    pointer_y: event.raw_y,
                    time_ms: event.time_ms,
                });
            }
            TouchAction::Up => {
                if let Some(press) = self.press.take() {
                    let duration = event.time_ms.saturating_sub(press.time_ms);
                    clicked = self.config.is_tap(
                        duration,
                        event.raw_x - press.pointer_x,
                        event.raw_y - press.pointer_y,
                    );
                }
            }
            TouchAction::Cancel => self.press = None,
            TouchAction::Move => {}
        }

        // The parent's own click result is ignored; the menu drag has no click.
        let _ = parent.on_touch(event, surface, window, scheduler);
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureTarget;
    use crate::surface::{
        Geometry, Gravity, HeadlessWindowSystem, LayerType, LayoutParams, MenuView,
        SurfaceContent, SurfaceId, SurfaceRole, Color,
    };

    fn menu_surface() -> Surface {
        Surface::new(
            SurfaceId(16),
            SurfaceRole::Menu,
            LayoutParams::floating(
                Geometry::anchored(Gravity::END_CENTER_VERTICAL, -16, 62),
                LayerType::ApplicationOverlay,
            ),
            SurfaceContent::Menu(MenuView {
                padding_px: 8,
                corner_radius_px: 28,
                background: Color::WHITE,
                elevation_px: 4,
                buttons: Vec::new(),
            }),
        )
    }

    fn rig() -> (
        AnchorTouchListener,
        GestureRecognizer<()>,
        Surface,
        HeadlessWindowSystem,
        Scheduler,
    ) {
        let mut window = HeadlessWindowSystem::default();
        let mut surface = menu_surface();
        surface.attach(&mut window).unwrap();
        (
            AnchorTouchListener::new(GestureConfig::default()),
            GestureRecognizer::new(GestureConfig::default(), GestureTarget::Menu, None, None),
            surface,
            window,
            Scheduler::new(),
        )
    }

    #[test]
    fn test_tap_on_anchor_clicks_and_ends_parent_sequence() {
        let (mut anchor, mut drag, mut surface, mut window, mut scheduler) = rig();
        assert!(!anchor.on_touch(
            &TouchEvent::down(990.0, 900.0, 0),
            &mut drag,
            &mut surface,
            &mut window,
            &mut scheduler
        ));
        assert!(drag.context().is_some());
        assert!(anchor.on_touch(
            &TouchEvent::up(992.0, 901.0, 120),
            &mut drag,
            &mut surface,
            &mut window,
            &mut scheduler
        ));
        assert!(drag.context().is_none());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_drag_from_anchor_moves_parent_without_click() {
        let (mut anchor, mut drag, mut surface, mut window, mut scheduler) = rig();
        anchor.on_touch(
            &TouchEvent::down(990.0, 900.0, 0),
            &mut drag,
            &mut surface,
            &mut window,
            &mut scheduler,
        );
        anchor.on_touch(
            &TouchEvent::moved(990.0, 950.0, 60),
            &mut drag,
            &mut surface,
            &mut window,
            &mut scheduler,
        );
        assert_eq!(surface.geometry().y, 112);
        assert!(!anchor.on_touch(
            &TouchEvent::up(990.0, 950.0, 90),
            &mut drag,
            &mut surface,
            &mut window,
            &mut scheduler
        ));
        assert!(!drag.is_dragging());
    }
}
