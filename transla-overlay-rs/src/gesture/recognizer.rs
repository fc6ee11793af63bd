//! Click / long-press / drag state machine.

use super::{GestureConfig, GestureTarget, TouchAction, TouchEvent};
use crate::scheduler::{Scheduler, Task, TimerId};
use crate::surface::{Surface, WindowSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Pressed,
    Dragging,
    /// A bound long-click fired; the rest of the sequence is ignored
    Consumed,
}

/// Snapshot taken on DOWN, dropped on UP or CANCEL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureContext {
    pub initial_surface_x: i32,
    pub initial_surface_y: i32,
    pub initial_pointer_x: f32,
    pub initial_pointer_y: f32,
    pub start_time_ms: u64,
    pub long_press_fired: bool,
}

/// Classifies a touch sequence on one surface.
///
/// `A` is the action the owner wants back on click or long-click. Either
/// binding may be `None`; dragging works regardless.
#[derive(Debug)]
pub struct GestureRecognizer<A> {
    config: GestureConfig,
    target: GestureTarget,
    on_click: Option<A>,
    on_long_click: Option<A>,
    phase: GesturePhase,
    context: Option<GestureContext>,
    long_press_timer: Option<TimerId>,
}

impl<A: Clone> GestureRecognizer<A> {
    pub fn new(
        config: GestureConfig,
        target: GestureTarget,
        on_click: Option<A>,
        on_long_click: Option<A>,
    ) -> Self {
        Self {
            config,
            target,
            on_click,
            on_long_click,
            phase: GesturePhase::Idle,
            context: None,
            long_press_timer: None,
        }
    }

    /// Replace the click and long-click bindings. A sequence in progress keeps
    /// its context.
    pub fn bind(&mut self, on_click: Option<A>, on_long_click: Option<A>) {
        self.on_click = on_click;
        self.on_long_click = on_long_click;
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn context(&self) -> Option<&GestureContext> {
        self.context.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    /// Feed one touch event. Returns the click action when the sequence ends
    /// as a tap.
    pub fn on_touch(
        &mut self,
        event: &TouchEvent,
        surface: &mut Surface,
        window: &mut dyn WindowSystem,
        scheduler: &mut Scheduler,
    ) -> Option<A> {
        match event.action {
            TouchAction::Down => {
                self.cancel_long_press(scheduler);
                let geometry = surface.geometry();
                self.context = Some(GestureContext {
                    initial_surface_x: geometry.x,
                    initial_surface_y: geometry.y,
                    initial_pointer_x: event.raw_x,
                    initial_pointer_y: event.raw_y,
                    start_time_ms: event.time_ms,
                    long_press_fired: false,
                });
                let due = event.time_ms + self.config.long_press_delay_ms;
                self.long_press_timer = Some(scheduler.schedule_at(due, Task::LongPress(self.target)));
                self.phase = GesturePhase::Pressed;
                tracing::debug!(gesture = ?self.target, "Gesture pressed");
                None
            }
            TouchAction::Move => {
                self.on_move(event, surface, window, scheduler);
                None
            }
            TouchAction::Up => self.on_up(event, scheduler),
            TouchAction::Cancel => {
                self.reset(scheduler);
                None
            }
        }
    }

    fn on_move(
        &mut self,
        event: &TouchEvent,
        surface: &mut Surface,
        window: &mut dyn WindowSystem,
        scheduler: &mut Scheduler,
    ) {
        let Some(ctx) = self.context else {
            return;
        };
        let dx = event.raw_x - ctx.initial_pointer_x;
        let dy = event.raw_y - ctx.initial_pointer_y;

        match self.phase {
            GesturePhase::Pressed if self.config.exceeds_drag_tolerance(dx, dy) => {
                self.cancel_long_press(scheduler);
                self.phase = GesturePhase::Dragging;
                tracing::debug!(gesture = ?self.target, "Gesture dragging");
            }
            GesturePhase::Dragging => {}
            _ => return,
        }

        let mut geometry = *surface.geometry();
        geometry.apply_delta(
            (ctx.initial_surface_x, ctx.initial_surface_y),
            dx as i32,
            dy as i32,
        );
        surface.set_geometry(geometry, window);
    }

    fn on_up(&mut self, event: &TouchEvent, scheduler: &mut Scheduler) -> Option<A> {
        let phase = self.phase;
        let ctx = self.context;
        self.reset(scheduler);

        let ctx = ctx?;
        if phase != GesturePhase::Pressed || ctx.long_press_fired {
            return None;
        }
        let duration = event.time_ms.saturating_sub(ctx.start_time_ms);
        let dx = event.raw_x - ctx.initial_pointer_x;
        let dy = event.raw_y - ctx.initial_pointer_y;
        if self.config.is_tap(duration, dx, dy) {
            tracing::debug!(gesture = ?self.target, duration, "Gesture click");
            self.on_click.clone()
        } else {
            None
        }
    }

    /// The deferred long-press came due. Ignored unless `timer` is the one
    /// this recognizer armed.
    pub fn on_long_press_timeout(&mut self, timer: TimerId) -> Option<A> {
        if self.long_press_timer != Some(timer) {
            return None;
        }
        self.long_press_timer = None;
        let ctx = self.context.as_mut()?;
        if self.phase != GesturePhase::Pressed {
            return None;
        }
        ctx.long_press_fired = true;
        let action = self.on_long_click.clone();
        if action.is_some() {
            self.phase = GesturePhase::Consumed;
            tracing::debug!(gesture = ?self.target, "Gesture long-press");
        }
        action
    }

    /// Drop any sequence in progress.
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        self.cancel_long_press(scheduler);
        self.context = None;
        self.phase = GesturePhase::Idle;
    }

    fn cancel_long_press(&mut self, scheduler: &mut Scheduler) {
        if let Some(timer) = self.long_press_timer.take() {
            scheduler.cancel(timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Icon;
    use crate::surface::{
        BubbleView, Color, Geometry, Gravity, HeadlessWindowSystem, LayerType, LayoutParams,
        SurfaceContent, SurfaceId, SurfaceRole, WindowOp,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Hit {
        Click,
        LongClick,
    }

    fn bubble() -> Surface {
        Surface::new(
            SurfaceId::BUBBLE,
            SurfaceRole::Bubble,
            LayoutParams::floating(
                Geometry::anchored(Gravity::END_CENTER_VERTICAL, 8, 0),
                LayerType::ApplicationOverlay,
            ),
            SurfaceContent::Bubble(BubbleView {
                diameter_px: 56,
                background: Color::BLACK,
                icon: Icon::Edit,
                icon_size_px: 24,
                icon_tint: Color::WHITE,
                elevation_px: 4,
            }),
        )
    }

    struct Rig {
        recognizer: GestureRecognizer<Hit>,
        surface: Surface,
        window: HeadlessWindowSystem,
        scheduler: Scheduler,
    }

    impl Rig {
        fn new(on_long_click: Option<Hit>) -> Self {
            let mut window = HeadlessWindowSystem::default();
            let mut surface = bubble();
            surface.attach(&mut window).unwrap();
            window.take_ops();
            Self {
                recognizer: GestureRecognizer::new(
                    GestureConfig::default(),
                    GestureTarget::Bubble,
                    Some(Hit::Click),
                    on_long_click,
                ),
                surface,
                window,
                scheduler: Scheduler::new(),
            }
        }

        fn touch(&mut self, event: TouchEvent) -> Option<Hit> {
            self.recognizer.on_touch(
                &event,
                &mut self.surface,
                &mut self.window,
                &mut self.scheduler,
            )
        }

        fn tick(&mut self, now: u64) -> Vec<Hit> {
            self.scheduler
                .take_due(now)
                .into_iter()
                .filter_map(|(id, _)| self.recognizer.on_long_press_timeout(id))
                .collect()
        }
    }

    #[test]
    fn test_quick_tap_clicks() {
        let mut rig = Rig::new(Some(Hit::LongClick));
        assert_eq!(rig.touch(TouchEvent::down(1000.0, 500.0, 0)), None);
        assert_eq!(rig.touch(TouchEvent::up(1001.0, 501.0, 150)), Some(Hit::Click));
        assert_eq!(rig.scheduler.pending(), 0);
        assert!(rig.window.ops().is_empty());
    }

    #[test]
    fn test_slow_tap_does_not_click() {
        let mut rig = Rig::new(None);
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        assert_eq!(rig.touch(TouchEvent::up(1000.0, 500.0, 250)), None);
    }

    #[test]
    fn test_long_press_fires_once_and_suppresses_click() {
        let mut rig = Rig::new(Some(Hit::LongClick));
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        assert!(rig.tick(499).is_empty());
        assert_eq!(rig.tick(500), vec![Hit::LongClick]);
        assert_eq!(rig.touch(TouchEvent::up(1000.0, 500.0, 600)), None);
    }

    #[test]
    fn test_long_press_consumes_later_moves() {
        let mut rig = Rig::new(Some(Hit::LongClick));
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        rig.tick(500);
        rig.touch(TouchEvent::moved(1000.0, 700.0, 600));
        assert_eq!(rig.surface.geometry().y, 0);
        assert!(rig.window.ops().is_empty());
    }

    #[test]
    fn test_drag_moves_surface_and_cancels_long_press() {
        let mut rig = Rig::new(Some(Hit::LongClick));
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        rig.touch(TouchEvent::moved(1000.0, 600.0, 100));
        assert!(rig.recognizer.is_dragging());
        assert_eq!(rig.surface.geometry().y, 100);
        assert_eq!(rig.window.ops(), &[WindowOp::Update(SurfaceId::BUBBLE)]);

        assert!(rig.tick(1000).is_empty());
        assert_eq!(rig.touch(TouchEvent::up(1000.0, 600.0, 150)), None);
    }

    #[test]
    fn test_drag_under_end_gravity_inverts_x() {
        let mut rig = Rig::new(None);
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        rig.touch(TouchEvent::moved(1100.0, 500.0, 50));
        assert_eq!(rig.surface.geometry().x, 8 - 100);
    }

    #[test]
    fn test_small_motion_is_not_a_drag() {
        let mut rig = Rig::new(None);
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        rig.touch(TouchEvent::moved(1004.0, 504.0, 30));
        assert_eq!(rig.recognizer.phase(), GesturePhase::Pressed);
        assert!(rig.window.ops().is_empty());
        assert_eq!(rig.touch(TouchEvent::up(1004.0, 504.0, 60)), Some(Hit::Click));
    }

    #[test]
    fn test_drag_back_to_origin_never_clicks() {
        let mut rig = Rig::new(None);
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        rig.touch(TouchEvent::moved(1000.0, 530.0, 40));
        rig.touch(TouchEvent::moved(1000.0, 500.0, 80));
        assert_eq!(rig.touch(TouchEvent::up(1000.0, 500.0, 100)), None);
    }

    #[test]
    fn test_cancel_resets() {
        let mut rig = Rig::new(Some(Hit::LongClick));
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        rig.touch(TouchEvent::cancel(100));
        assert_eq!(rig.recognizer.phase(), GesturePhase::Idle);
        assert!(rig.tick(600).is_empty());
    }

    #[test]
    fn test_drag_on_detached_surface_is_discarded() {
        let mut rig = Rig::new(None);
        rig.surface.detach(&mut rig.window);
        rig.window.take_ops();
        rig.touch(TouchEvent::down(1000.0, 500.0, 0));
        rig.touch(TouchEvent::moved(1000.0, 600.0, 50));
        assert!(rig.window.ops().is_empty());
    }
}
