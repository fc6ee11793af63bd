//! The expanded action menu.
//!
//! Tapping the idle bubble replaces it with a vertical stack of buttons whose
//! top-left corner sits where the bubble's was. The first button is the
//! anchor: tapping it collapses the menu, dragging it drags the whole menu.
//! The menu surface is rebuilt on every expansion.

use crate::error::OverlayError;
use crate::gesture::{
    AnchorTouchListener, GestureConfig, GestureRecognizer, GestureTarget, TouchAction,
    TouchEvent,
};
use crate::platform::Icon;
use crate::scheduler::{Scheduler, TimerId};
use crate::surface::{
    Animator, Fade, FadeEnd, Geometry, HorizontalAnchor, LayoutParams, Size, Surface,
    SurfaceContent, SurfaceId, SurfaceRole, VerticalAnchor, WindowSystem,
};
use crate::ui::bubble::BubbleController;
use crate::ui::components::MenuPanel;
use crate::ui::theme::Theme;
use serde::{Deserialize, Serialize};

/// Action name of the anchor button.
pub const COLLAPSE_ACTION: &str = "collapse";

/// First id handed to menu surfaces. Each expansion takes the next one.
const FIRST_MENU_SURFACE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Collapsed,
    Expanded,
}

/// One button in the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub icon: Icon,
    pub action: String,
    #[serde(default)]
    pub anchor: bool,
}

impl MenuItem {
    pub fn anchor() -> Self {
        Self {
            icon: Icon::SortBySize,
            action: COLLAPSE_ACTION.to_string(),
            anchor: true,
        }
    }

    pub fn action(icon: Icon, action: impl Into<String>) -> Self {
        Self {
            icon,
            action: action.into(),
            anchor: false,
        }
    }
}

/// Where on the menu a touch landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuTouchTarget {
    Background,
    /// Button by position; 0 is the anchor
    Item(usize),
}

/// What a menu gesture asks the service to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Collapse,
    /// Emit the named action, then collapse
    Dispatch(String),
}

/// Menu geometry whose top-left coincides with the bubble's.
pub fn aligned_menu_geometry(bubble: &Geometry, bubble_size: i32, menu: Size) -> Geometry {
    let mut geometry = Geometry::anchored(bubble.gravity, bubble.x, bubble.y);
    geometry.x = match bubble.gravity.horizontal {
        HorizontalAnchor::End => bubble.x + bubble_size - menu.width,
        HorizontalAnchor::Start => bubble.x,
    };
    geometry.y = match bubble.gravity.vertical {
        VerticalAnchor::Center => bubble.y - bubble_size / 2 + menu.height / 2,
        VerticalAnchor::Top => bubble.y,
        VerticalAnchor::Bottom => bubble.y + bubble_size - menu.height,
    };
    geometry
}

/// Bubble geometry whose top-left coincides with the menu's. Inverse of
/// [`aligned_menu_geometry`].
pub fn aligned_bubble_geometry(
    bubble: &Geometry,
    bubble_size: i32,
    menu: &Geometry,
    menu_size: Size,
) -> Geometry {
    let mut geometry = *bubble;
    geometry.gravity = menu.gravity;
    geometry.x = match menu.gravity.horizontal {
        HorizontalAnchor::End => menu.x + menu_size.width - bubble_size,
        HorizontalAnchor::Start => menu.x,
    };
    geometry.y = match menu.gravity.vertical {
        VerticalAnchor::Center => menu.y - menu_size.height / 2 + bubble_size / 2,
        VerticalAnchor::Top => menu.y,
        VerticalAnchor::Bottom => menu.y + menu_size.height - bubble_size,
    };
    geometry
}

/// Plain click on an action button.
#[derive(Debug, Clone, Copy)]
struct ButtonPress {
    item: usize,
    pointer: (f32, f32),
}

pub struct MenuController {
    gesture: GestureConfig,
    theme: Theme,
    /// Anchor first, then the action items
    items: Vec<MenuItem>,
    fade_ms: u64,
    next_surface: u32,
    surface: Option<Surface>,
    measured: Size,
    drag: GestureRecognizer<()>,
    anchor: AnchorTouchListener,
    press: Option<ButtonPress>,
    /// Collapsed menus still fading out
    retiring: Vec<Surface>,
}

impl MenuController {
    pub fn new(gesture: GestureConfig, actions: &[MenuItem], fade_ms: u64, theme: Theme) -> Self {
        let mut items = vec![MenuItem::anchor()];
        items.extend(actions.iter().filter(|item| !item.anchor).cloned());
        Self {
            gesture,
            theme,
            items,
            fade_ms,
            next_surface: FIRST_MENU_SURFACE,
            surface: None,
            measured: Size::default(),
            drag: GestureRecognizer::new(gesture, GestureTarget::Menu, None, None),
            anchor: AnchorTouchListener::new(gesture),
            press: None,
            retiring: Vec::new(),
        }
    }

    pub fn state(&self) -> MenuState {
        if self.surface.is_some() {
            MenuState::Expanded
        } else {
            MenuState::Collapsed
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.state() == MenuState::Expanded
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Size measured before the current menu was attached.
    pub fn measured_size(&self) -> Size {
        self.measured
    }

    /// The live menu or a menu still fading out.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surface
            .iter_mut()
            .chain(self.retiring.iter_mut())
            .find(|s| s.id() == id)
    }

    /// Replace the bubble with the menu. Returns the new surface id, or
    /// `None` when the menu is already expanded or the bubble is not shown.
    pub fn expand(
        &mut self,
        bubble: &mut BubbleController,
        window: &mut dyn WindowSystem,
        animator: &mut Animator,
        now_ms: u64,
    ) -> Result<Option<SurfaceId>, OverlayError> {
        if self.is_expanded() {
            tracing::debug!("Menu already expanded");
            return Ok(None);
        }
        let Some(bubble_geometry) = bubble.geometry().filter(|_| bubble.is_attached()) else {
            tracing::debug!("Menu expand ignored, bubble not shown");
            return Ok(None);
        };
        let bubble_size = bubble.diameter_px(window);

        bubble.set_visible(false, window);

        let metrics = window.metrics();
        let content = SurfaceContent::Menu(MenuPanel::build(&self.items, &metrics, &self.theme));
        let measured = window.measure(&content);
        let geometry = aligned_menu_geometry(&bubble_geometry, bubble_size, measured);

        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        let mut surface = Surface::new(
            id,
            SurfaceRole::Menu,
            LayoutParams::floating(geometry, window.overlay_layer()),
            content,
        );
        surface.set_alpha(0.0, window);
        if let Err(e) = surface.attach(window) {
            bubble.set_visible(true, window);
            return Err(OverlayError::attach(id, e));
        }

        animator.start(Fade::new(id, 0.0, 1.0, now_ms, self.fade_ms));
        tracing::info!(
            surface = %id,
            x = geometry.x,
            y = geometry.y,
            width = measured.width,
            height = measured.height,
            "Menu expanded"
        );
        self.measured = measured;
        self.surface = Some(surface);
        Ok(Some(id))
    }

    /// Fade the menu out and bring the bubble back where the menu's top-left
    /// now is. Returns false when nothing was expanded.
    pub fn collapse(
        &mut self,
        bubble: &mut BubbleController,
        window: &mut dyn WindowSystem,
        scheduler: &mut Scheduler,
        animator: &mut Animator,
        now_ms: u64,
    ) -> bool {
        let Some(menu) = self.surface.take() else {
            tracing::debug!("Menu collapse ignored, not expanded");
            return false;
        };
        self.drag.reset(scheduler);
        self.press = None;

        let menu_geometry = *menu.geometry();
        let bubble_size = bubble.diameter_px(window);
        if let Some(current) = bubble.geometry() {
            let restored =
                aligned_bubble_geometry(&current, bubble_size, &menu_geometry, self.measured);
            bubble.set_geometry(restored, window);
        }

        animator.start(
            Fade::new(menu.id(), menu.alpha(), 0.0, now_ms, self.fade_ms).then(FadeEnd::Detach),
        );
        tracing::info!(surface = %menu.id(), "Menu collapsed");
        self.retiring.push(menu);

        if let Some(surface) = bubble.surface_mut() {
            surface.set_alpha(0.0, window);
            animator.start(Fade::new(surface.id(), 0.0, 1.0, now_ms, self.fade_ms));
        }
        bubble.set_visible(true, window);
        true
    }

    /// A fade-out finished. Detaching a menu that is already gone is a no-op.
    pub fn finish_fade(&mut self, id: SurfaceId, window: &mut dyn WindowSystem) {
        if let Some(pos) = self.retiring.iter().position(|s| s.id() == id) {
            let mut surface = self.retiring.remove(pos);
            surface.detach(window);
        }
    }

    pub fn handle_touch(
        &mut self,
        target: MenuTouchTarget,
        event: &TouchEvent,
        window: &mut dyn WindowSystem,
        scheduler: &mut Scheduler,
    ) -> Option<MenuCommand> {
        let surface = self.surface.as_mut()?;
        match target {
            MenuTouchTarget::Background => {
                let _ = self.drag.on_touch(event, surface, window, scheduler);
                None
            }
            MenuTouchTarget::Item(0) => self
                .anchor
                .on_touch(event, &mut self.drag, surface, window, scheduler)
                .then_some(MenuCommand::Collapse),
            MenuTouchTarget::Item(index) => {
                let item = self.items.get(index)?;
                match event.action {
                    TouchAction::Down => {
                        self.press = Some(ButtonPress {
                            item: index,
                            pointer: (event.raw_x, event.raw_y),
                        });
                        None
                    }
                    TouchAction::Up => {
                        let press = self.press.take().filter(|p| p.item == index)?;
                        let dx = event.raw_x - press.pointer.0;
                        let dy = event.raw_y - press.pointer.1;
                        let slop = self.gesture.drag_tolerance_px;
                        (dx.abs() + dy.abs() < slop)
                            .then(|| MenuCommand::Dispatch(item.action.clone()))
                    }
                    TouchAction::Cancel => {
                        self.press = None;
                        None
                    }
                    TouchAction::Move => None,
                }
            }
        }
    }

    pub fn on_long_press_timeout(&mut self, timer: TimerId) {
        let _ = self.drag.on_long_press_timeout(timer);
    }

    /// Detach the live menu and every retiring one at once.
    pub fn teardown(
        &mut self,
        window: &mut dyn WindowSystem,
        scheduler: &mut Scheduler,
        animator: &mut Animator,
    ) {
        self.drag.reset(scheduler);
        self.press = None;
        for mut surface in self.surface.take().into_iter().chain(self.retiring.drain(..)) {
            animator.cancel(surface.id());
            surface.detach(window);
        }
    }
}
