//! The overlay service: owns the controllers and routes host input to them.
//!
//! Everything runs on the host's event thread. The host calls in with
//! commands, touch events and clock ticks; each call is one turn, after which
//! pending overlay events have been delivered to the bubble.

use crate::config::OverlayConfig;
use crate::error::{CommandErrorCode, OverlayError};
use crate::events::{EventBus, OverlayEvent};
use crate::gesture::{GestureTarget, TouchEvent};
use crate::platform::{Action, OverlayHost, ToastDuration};
use crate::scheduler::{Scheduler, Task};
use crate::surface::{Animator, DisplayMetrics, FadeEnd, Surface, SurfaceId, SurfaceRole};
use crate::ui::{
    BubbleAction, BubbleController, BubbleState, MaskController, MenuCommand, MenuController,
    MenuTouchTarget, Theme,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Toast for menu actions the host does not know.
pub const UNKNOWN_ACTION_TOAST: &str = "Not implemented yet";

/// Frame interval requested while a fade is running.
const FRAME_MS: u64 = 16;

/// Commands the host application sends to the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "snake_case")]
pub enum HostCommand {
    CheckOverlayPermission,
    ShowFloatingBubble,
    HideFloatingBubble,
    ShowTranslationOverlay {
        #[serde(rename = "translationData")]
        translation_data: String,
    },
    HideTranslationOverlay,
    UpdateDisplayMetrics(DisplayMetrics),
}

impl HostCommand {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to decode host command")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyError {
    pub code: CommandErrorCode,
    pub message: String,
}

/// Reply to a [`HostCommand`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl CommandReply {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            value: None,
        }
    }

    pub fn value(value: serde_json::Value) -> Self {
        Self {
            value: Some(value),
            ..Self::ok()
        }
    }

    pub fn error(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(ReplyError {
                code,
                message: message.into(),
            }),
            value: None,
        }
    }

    fn from_result(result: Result<(), OverlayError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::error(CommandErrorCode::from(&e), e.to_string()),
        }
    }
}

/// Which surface a touch landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "surface", content = "part", rename_all = "snake_case")]
pub enum TouchTarget {
    Bubble,
    Menu(MenuTouchTarget),
    Mask,
}

/// A touch event addressed to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchInput {
    pub target: TouchTarget,
    pub event: TouchEvent,
}

pub struct OverlayService<H: OverlayHost> {
    host: H,
    config: OverlayConfig,
    scheduler: Scheduler,
    animator: Animator,
    bus: EventBus,
    bubble: BubbleController,
    menu: MenuController,
    mask: MaskController,
    /// Between `start` and `stop`, the host keeps the process in the foreground
    running: bool,
    now_ms: u64,
}

impl<H: OverlayHost> OverlayService<H> {
    pub fn new(host: H, config: OverlayConfig) -> Self {
        let theme = Theme::default();
        let bus = EventBus::new();
        Self {
            bubble: BubbleController::new(
                config.gesture,
                config.bubble_size_dp,
                config.bubble_margin_dp,
                theme,
            ),
            menu: MenuController::new(
                config.gesture,
                &config.menu_actions,
                config.fade_duration_ms,
                theme,
            ),
            mask: MaskController::new(bus.publisher(), theme),
            host,
            config,
            scheduler: Scheduler::new(),
            animator: Animator::new(),
            bus,
            running: false,
            now_ms: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn bubble(&self) -> &BubbleController {
        &self.bubble
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn mask(&self) -> &MaskController {
        &self.mask
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Enter the foreground and show the bubble.
    pub fn start(&mut self, now_ms: u64) -> Result<(), OverlayError> {
        self.advance_clock(now_ms);
        if !self.host.can_draw_overlays() {
            let err = OverlayError::PermissionDenied {
                surface: SurfaceRole::Bubble,
            };
            self.report(&err);
            self.stop();
            return Err(err);
        }
        if !self.running {
            self.host.start_in_foreground(&self.config.notification);
            self.running = true;
            tracing::info!("Overlay service started");
        }
        if let Err(e) = self.bubble.show(&mut self.host) {
            self.report(&e);
            self.stop();
            return Err(e);
        }
        self.pump_events();
        Ok(())
    }

    /// Tear every surface down and leave the foreground.
    pub fn stop(&mut self) {
        if self.mask.hide(&mut self.host) {
            self.host.emit(Action::MaskClosed);
        }
        self.menu
            .teardown(&mut self.host, &mut self.scheduler, &mut self.animator);
        self.bubble.destroy(&mut self.host, &mut self.scheduler);
        self.animator.clear();
        self.scheduler.clear();
        self.pump_events();
        if self.running {
            self.host.stop_foreground();
            self.running = false;
            tracing::info!("Overlay service stopped");
        }
    }

    /// Show the translation mask, or refresh it in place.
    pub fn show_mask(&mut self, payload: &str, now_ms: u64) -> Result<(), OverlayError> {
        self.advance_clock(now_ms);
        if !self.host.can_draw_overlays() {
            let err = OverlayError::PermissionDenied {
                surface: SurfaceRole::Mask,
            };
            self.report(&err);
            return Err(err);
        }
        let result = self.mask.show(payload, &mut self.host);
        match &result {
            Err(e @ OverlayError::AttachFailed { .. }) => {
                self.report(e);
                self.stop();
            }
            Err(e) => self.report(e),
            Ok(()) => {}
        }
        self.pump_events();
        result
    }

    /// Tear the mask down. Returns whether it was shown.
    pub fn hide_mask(&mut self, now_ms: u64) -> bool {
        self.advance_clock(now_ms);
        let hidden = self.mask.hide(&mut self.host);
        self.pump_events();
        hidden
    }

    pub fn handle_command(&mut self, command: HostCommand, now_ms: u64) -> CommandReply {
        tracing::debug!(?command, "Host command");
        match command {
            HostCommand::CheckOverlayPermission => {
                CommandReply::value(serde_json::Value::Bool(self.host.can_draw_overlays()))
            }
            HostCommand::ShowFloatingBubble => CommandReply::from_result(self.start(now_ms)),
            HostCommand::HideFloatingBubble => {
                self.advance_clock(now_ms);
                self.stop();
                CommandReply::ok()
            }
            HostCommand::ShowTranslationOverlay { translation_data } => {
                CommandReply::from_result(self.show_mask(&translation_data, now_ms))
            }
            HostCommand::HideTranslationOverlay => {
                self.hide_mask(now_ms);
                CommandReply::ok()
            }
            HostCommand::UpdateDisplayMetrics(metrics) => {
                self.advance_clock(now_ms);
                self.host.set_metrics(metrics);
                self.bubble.refresh(&mut self.host);
                CommandReply::ok()
            }
        }
    }

    /// Decode and run a JSON command. Undecodable input gets `INVALID_ARGS`.
    pub fn handle_command_json(&mut self, json: &str, now_ms: u64) -> CommandReply {
        match HostCommand::from_json(json) {
            Ok(command) => self.handle_command(command, now_ms),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "Rejected host command");
                CommandReply::error(CommandErrorCode::InvalidArgs, format!("{e:#}"))
            }
        }
    }

    /// Route a touch event. Long-presses that came due before the event run
    /// first.
    pub fn handle_touch(&mut self, target: TouchTarget, event: TouchEvent) {
        self.advance_clock(event.time_ms);
        self.run_timers();

        match target {
            TouchTarget::Bubble => {
                if let Some(action) =
                    self.bubble
                        .handle_touch(&event, &mut self.host, &mut self.scheduler)
                {
                    self.on_bubble_action(action);
                }
            }
            TouchTarget::Menu(part) => {
                let command =
                    self.menu
                        .handle_touch(part, &event, &mut self.host, &mut self.scheduler);
                if let Some(command) = command {
                    self.on_menu_command(command);
                }
            }
            TouchTarget::Mask => tracing::trace!("Touch on mask ignored"),
        }
        self.pump_events();
    }

    /// Advance the clock: fire due long-presses and step fades. Returns when
    /// the host should call again, if anything is pending.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        self.advance_clock(now_ms);
        self.run_timers();

        for frame in self.animator.advance(self.now_ms) {
            if let Some(surface) = find_surface(&mut self.bubble, &mut self.menu, frame.surface) {
                surface.set_alpha(frame.alpha, &mut self.host);
            }
            if frame.finished == Some(FadeEnd::Detach) {
                self.menu.finish_fade(frame.surface, &mut self.host);
            }
        }
        self.pump_events();

        let frame = (!self.animator.is_idle()).then_some(self.now_ms + FRAME_MS);
        match (self.scheduler.next_deadline(), frame) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Deliver pending overlay events to the bubble.
    pub fn pump_events(&mut self) {
        for event in self.bus.drain() {
            match event {
                OverlayEvent::OverlayShown => {
                    self.bubble
                        .set_state(BubbleState::OverlayActive, &mut self.host);
                    self.menu.collapse(
                        &mut self.bubble,
                        &mut self.host,
                        &mut self.scheduler,
                        &mut self.animator,
                        self.now_ms,
                    );
                    if let Err(e) = self.bubble.bring_to_front(&mut self.host) {
                        // Without the bubble the mask cannot be dismissed.
                        self.report(&e);
                        self.stop();
                        return;
                    }
                }
                OverlayEvent::OverlayHidden => {
                    self.bubble.set_state(BubbleState::Idle, &mut self.host);
                }
            }
        }
    }

    fn run_timers(&mut self) {
        for (timer, task) in self.scheduler.take_due(self.now_ms) {
            match task {
                Task::LongPress(GestureTarget::Bubble) => {
                    if let Some(action) = self.bubble.on_long_press_timeout(timer) {
                        self.on_bubble_action(action);
                    }
                }
                Task::LongPress(GestureTarget::Menu) => self.menu.on_long_press_timeout(timer),
            }
        }
    }

    fn on_bubble_action(&mut self, action: BubbleAction) {
        tracing::debug!(?action, "Bubble action");
        match action {
            BubbleAction::OpenMenu => {
                let expanded = self.menu.expand(
                    &mut self.bubble,
                    &mut self.host,
                    &mut self.animator,
                    self.now_ms,
                );
                if let Err(e) = expanded {
                    self.report(&e);
                }
            }
            BubbleAction::TranslateFullscreen => self.host.emit(Action::TranslateFullscreen),
            BubbleAction::TeardownMask => {
                self.mask.hide(&mut self.host);
            }
        }
    }

    fn on_menu_command(&mut self, command: MenuCommand) {
        if let MenuCommand::Dispatch(name) = &command {
            match Action::from_menu_action(name) {
                Some(action) => self.host.emit(action),
                None => {
                    tracing::warn!(action = %name, "Unknown menu action");
                    self.host.toast(UNKNOWN_ACTION_TOAST, ToastDuration::Short);
                }
            }
        }
        self.menu.collapse(
            &mut self.bubble,
            &mut self.host,
            &mut self.scheduler,
            &mut self.animator,
            self.now_ms,
        );
    }

    /// Send a user-visible failure to the bridge and as a toast.
    fn report(&mut self, err: &OverlayError) {
        tracing::error!(error = %err, "Overlay failure");
        let message = err.to_string();
        let action = match err {
            OverlayError::PermissionDenied { .. } => Action::OverlayPermissionDenied(message.clone()),
            _ => Action::OverlayError(message.clone()),
        };
        self.host.emit(action);
        self.host.toast(&message, ToastDuration::Long);
    }

    fn advance_clock(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

fn find_surface<'a>(
    bubble: &'a mut BubbleController,
    menu: &'a mut MenuController,
    id: SurfaceId,
) -> Option<&'a mut Surface> {
    if id == SurfaceId::BUBBLE {
        bubble.surface_mut()
    } else {
        menu.surface_mut(id)
    }
}
