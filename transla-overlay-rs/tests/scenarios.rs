//! End-to-end sessions against the in-memory host.

use transla_overlay_rs::platform::{Icon, ToastDuration};
use transla_overlay_rs::surface::{Gravity, Size, SurfaceContent, WindowOp};
use transla_overlay_rs::ui::Theme;
use transla_overlay_rs::{
    Action, BubbleState, CommandErrorCode, HeadlessHost, HeadlessWindowSystem, HostCommand,
    OverlayConfig, OverlayService, SurfaceId, TouchEvent, TouchTarget,
};

const S5_PAYLOAD: &str =
    r#"{"items":[{"bbox":{"l":100,"t":200,"w":300,"h":80},"translatedText":"hello"}]}"#;

fn started() -> OverlayService<HeadlessHost> {
    let window = HeadlessWindowSystem::default().with_menu_size(Size::new(80, 180));
    let mut service = OverlayService::new(HeadlessHost::new(window), OverlayConfig::default());
    service.start(0).unwrap();
    service
}

fn bubble_xy(service: &OverlayService<HeadlessHost>) -> (i32, i32) {
    let geometry = service
        .host()
        .window
        .spec(SurfaceId::BUBBLE)
        .unwrap()
        .layout
        .geometry;
    (geometry.x, geometry.y)
}

fn tap_bubble(service: &mut OverlayService<HeadlessHost>, t: u64) {
    service.handle_touch(TouchTarget::Bubble, TouchEvent::down(1000.0, 500.0, t));
    service.handle_touch(TouchTarget::Bubble, TouchEvent::up(1001.0, 501.0, t + 150));
}

#[test]
fn test_start_places_bubble_on_end_edge() {
    let service = started();
    let spec = service.host().window.spec(SurfaceId::BUBBLE).unwrap();
    assert_eq!(spec.layout.geometry.gravity, Gravity::END_CENTER_VERTICAL);
    assert_eq!(bubble_xy(&service), (8, 0));
    assert!(spec.visible);
    assert!(service.host().foreground.is_some());
}

#[test]
fn test_tap_shows_menu() {
    let mut service = started();
    tap_bubble(&mut service, 0);

    let menu = service.menu().surface().unwrap().id();
    let window = &service.host().window;
    assert!(window.is_attached(menu));
    assert_eq!(service.menu().measured_size(), Size::new(80, 180));
    let geometry = window.spec(menu).unwrap().layout.geometry;
    assert_eq!(geometry.gravity, Gravity::END_CENTER_VERTICAL);
    assert_eq!((geometry.x, geometry.y), (-16, 62));
    assert!(!window.spec(SurfaceId::BUBBLE).unwrap().visible);
    assert!(service.host().actions.is_empty());
}

#[test]
fn test_long_press_triggers_fullscreen_action() {
    let mut service = started();
    service.handle_touch(TouchTarget::Bubble, TouchEvent::down(1000.0, 500.0, 0));
    service.tick(500);
    assert_eq!(service.host().actions, vec![Action::TranslateFullscreen]);

    service.handle_touch(TouchTarget::Bubble, TouchEvent::up(1000.0, 500.0, 600));
    assert_eq!(service.host().actions, vec![Action::TranslateFullscreen]);
    assert!(!service.menu().is_expanded());
}

#[test]
fn test_long_press_fires_before_late_up() {
    let mut service = started();
    service.handle_touch(TouchTarget::Bubble, TouchEvent::down(1000.0, 500.0, 0));
    // No tick in between: the up at 600 still sees the long-press first.
    service.handle_touch(TouchTarget::Bubble, TouchEvent::up(1000.0, 500.0, 600));
    assert_eq!(service.host().actions, vec![Action::TranslateFullscreen]);
    assert!(!service.menu().is_expanded());
}

#[test]
fn test_drag_disables_click() {
    let mut service = started();
    service.handle_touch(TouchTarget::Bubble, TouchEvent::down(1000.0, 500.0, 0));
    service.handle_touch(TouchTarget::Bubble, TouchEvent::moved(1000.0, 600.0, 100));
    service.handle_touch(TouchTarget::Bubble, TouchEvent::up(1000.0, 600.0, 150));
    service.tick(1000);

    assert_eq!(bubble_xy(&service), (8, 100));
    assert!(!service.menu().is_expanded());
    assert!(service.host().actions.is_empty());
}

#[test]
fn test_drag_under_end_gravity_inverts_x() {
    let mut service = started();
    service.handle_touch(TouchTarget::Bubble, TouchEvent::down(1000.0, 500.0, 0));
    service.handle_touch(TouchTarget::Bubble, TouchEvent::moved(1100.0, 500.0, 50));
    assert_eq!(bubble_xy(&service), (8 - 100, 0));

    let rect = service.host().window.screen_rect(SurfaceId::BUBBLE).unwrap();
    assert_eq!(rect.right(), 1080 + 92);
}

#[test]
fn test_mask_show_then_bubble_tap_hides_it() {
    let mut service = started();
    let reply = service.handle_command(
        HostCommand::ShowTranslationOverlay {
            translation_data: S5_PAYLOAD.into(),
        },
        10,
    );
    assert!(reply.success);

    let theme = Theme::default();
    assert_eq!(service.bubble().state(), BubbleState::OverlayActive);
    let window = &service.host().window;
    assert!(window.is_attached(SurfaceId::MASK));
    assert_eq!(window.z_order(), &[SurfaceId::MASK, SurfaceId::BUBBLE]);
    match &window.spec(SurfaceId::BUBBLE).unwrap().content {
        SurfaceContent::Bubble(view) => {
            assert_eq!(view.background, theme.bubble_active);
            assert_eq!(view.icon, Icon::Cancel);
        }
        other => panic!("unexpected bubble content {other:?}"),
    }

    tap_bubble(&mut service, 100);
    assert!(service.host().actions.is_empty());
    assert!(!service.host().window.is_attached(SurfaceId::MASK));
    assert_eq!(service.bubble().state(), BubbleState::Idle);
    assert!(!service.menu().is_expanded());
}

#[test]
fn test_malformed_payload_reports_error() {
    let mut service = started();
    let reply = service.handle_command(
        HostCommand::ShowTranslationOverlay {
            translation_data: BAD_MASK.into(),
        },
        10,
    );
    assert!(!reply.success);
    assert_eq!(reply.error.unwrap().code, CommandErrorCode::PayloadInvalid);

    let host = service.host();
    assert_eq!(host.actions.len(), 1);
    assert_eq!(host.actions[0].method(), "overlay_error");
    assert!(!host.window.is_attached(SurfaceId::MASK));
    assert_eq!(service.bubble().state(), BubbleState::Idle);
    assert_eq!(host.toasts.len(), 1);
    assert_eq!(host.toasts[0].1, ToastDuration::Long);
}

#[test]
fn test_menu_action_dispatches_and_collapses() {
    let mut service = started();
    tap_bubble(&mut service, 0);
    let menu = service.menu().surface().unwrap().id();

    // Items: anchor, camera, crop.
    let crop = TouchTarget::Menu(transla_overlay_rs::MenuTouchTarget::Item(2));
    service.handle_touch(crop, TouchEvent::down(900.0, 700.0, 400));
    service.handle_touch(crop, TouchEvent::up(902.0, 701.0, 450));
    assert_eq!(service.host().actions, vec![Action::StartAreaSelection]);
    assert!(!service.menu().is_expanded());
    assert!(service.host().window.spec(SurfaceId::BUBBLE).unwrap().visible);
    assert_eq!(bubble_xy(&service), (8, 0));

    // The menu stays attached until its fade-out completes.
    assert!(service.host().window.is_attached(menu));
    service.tick(700);
    assert!(!service.host().window.is_attached(menu));
    assert_eq!(
        service.host().window.spec(SurfaceId::BUBBLE).unwrap().alpha,
        1.0
    );
}

#[test]
fn test_anchor_tap_collapses_menu() {
    let mut service = started();
    tap_bubble(&mut service, 0);
    let anchor = TouchTarget::Menu(transla_overlay_rs::MenuTouchTarget::Item(0));
    service.handle_touch(anchor, TouchEvent::down(950.0, 600.0, 300));
    service.handle_touch(anchor, TouchEvent::up(951.0, 600.0, 380));
    assert!(!service.menu().is_expanded());
    assert!(service.host().actions.is_empty());
}

#[test]
fn test_anchor_drag_moves_menu_and_bubble_follows() {
    let mut service = started();
    tap_bubble(&mut service, 0);
    let menu = service.menu().surface().unwrap().id();
    let anchor = TouchTarget::Menu(transla_overlay_rs::MenuTouchTarget::Item(0));
    service.handle_touch(anchor, TouchEvent::down(950.0, 600.0, 300));
    service.handle_touch(anchor, TouchEvent::moved(950.0, 650.0, 350));
    service.handle_touch(anchor, TouchEvent::up(950.0, 650.0, 400));

    assert!(service.menu().is_expanded());
    let geometry = service.host().window.spec(menu).unwrap().layout.geometry;
    assert_eq!((geometry.x, geometry.y), (-16, 112));

    service.handle_touch(anchor, TouchEvent::down(950.0, 650.0, 500));
    service.handle_touch(anchor, TouchEvent::up(950.0, 650.0, 550));
    assert!(!service.menu().is_expanded());
    assert_eq!(bubble_xy(&service), (8, 50));
}

#[test]
fn test_unknown_menu_action_shows_toast() {
    let window = HeadlessWindowSystem::default().with_menu_size(Size::new(80, 180));
    let mut config = OverlayConfig::default();
    config
        .menu_actions
        .push(transla_overlay_rs::MenuItem::action(Icon::Edit, "share"));
    let mut service = OverlayService::new(HeadlessHost::new(window), config);
    service.start(0).unwrap();
    tap_bubble(&mut service, 0);

    let share = TouchTarget::Menu(transla_overlay_rs::MenuTouchTarget::Item(3));
    service.handle_touch(share, TouchEvent::down(900.0, 700.0, 400));
    service.handle_touch(share, TouchEvent::up(900.0, 700.0, 450));
    assert!(service.host().actions.is_empty());
    assert_eq!(
        service.host().toasts,
        vec![(
            transla_overlay_rs::app::UNKNOWN_ACTION_TOAST.to_string(),
            ToastDuration::Short
        )]
    );
    assert!(!service.menu().is_expanded());
}

#[test]
fn test_mask_collapses_open_menu() {
    let mut service = started();
    tap_bubble(&mut service, 0);
    assert!(service.menu().is_expanded());

    service.show_mask(S5_PAYLOAD, 300).unwrap();
    assert!(!service.menu().is_expanded());
    let window = &service.host().window;
    assert!(window.spec(SurfaceId::BUBBLE).unwrap().visible);
    assert_eq!(window.topmost(), Some(SurfaceId::BUBBLE));
}

#[test]
fn test_mask_refresh_keeps_single_surface() {
    let mut service = started();
    service.show_mask(S5_PAYLOAD, 10).unwrap();
    service.host_mut().window.take_ops();

    service
        .show_mask(
            r#"{"items":[{"bbox":{"l":0,"t":0,"w":10,"h":10},"translatedText":"a"},{"bbox":{"l":20,"t":0,"w":10,"h":10},"translatedText":"b"}]}"#,
            20,
        )
        .unwrap();
    assert_eq!(service.mask().items().len(), 2);
    assert_eq!(
        service.host().window.ops(),
        &[WindowOp::Update(SurfaceId::MASK)]
    );
}

#[test]
fn test_host_hide_does_not_report_mask_closed() {
    let mut service = started();
    service.show_mask(S5_PAYLOAD, 10).unwrap();
    let reply = service.handle_command(HostCommand::HideTranslationOverlay, 20);
    assert!(reply.success);
    assert_eq!(service.bubble().state(), BubbleState::Idle);
    assert!(service.host().actions.is_empty());
}

#[test]
fn test_stop_with_mask_reports_mask_closed() {
    let mut service = started();
    service.show_mask(S5_PAYLOAD, 10).unwrap();
    service.handle_command(HostCommand::HideFloatingBubble, 20);

    let host = service.host();
    assert_eq!(host.actions, vec![Action::MaskClosed]);
    assert_eq!(host.window.attached_count(), 0);
    assert!(host.foreground.is_none());
    assert!(!service.is_running());
}

#[test]
fn test_permission_denied_on_start() {
    let mut host = HeadlessHost::default();
    host.permission = false;
    let mut service = OverlayService::new(host, OverlayConfig::default());

    let reply = service.handle_command(HostCommand::ShowFloatingBubble, 0);
    assert_eq!(reply.error.unwrap().code, CommandErrorCode::PermissionDenied);
    let host = service.host();
    assert_eq!(host.actions.len(), 1);
    assert_eq!(host.actions[0].method(), "overlay_permission_denied");
    assert_eq!(host.window.attached_count(), 0);
    assert!(host.foreground.is_none());
}

#[test]
fn test_attach_failure_stops_service() {
    let mut service = OverlayService::new(HeadlessHost::default(), OverlayConfig::default());
    service.host_mut().window.refuse_next_add("token expired");

    let reply = service.handle_command(HostCommand::ShowFloatingBubble, 0);
    assert_eq!(reply.error.unwrap().code, CommandErrorCode::StartFailed);
    assert_eq!(service.host().actions[0].method(), "overlay_error");
    assert!(!service.is_running());
    assert!(service.host().foreground.is_none());
}

#[test]
fn test_permission_revoked_while_running_stops_service() {
    let mut service = started();
    service.host_mut().permission = false;

    let reply = service.handle_command(HostCommand::ShowFloatingBubble, 50);
    assert_eq!(reply.error.unwrap().code, CommandErrorCode::PermissionDenied);
    let host = service.host();
    assert_eq!(host.actions.len(), 1);
    assert_eq!(host.actions[0].method(), "overlay_permission_denied");
    assert_eq!(host.window.attached_count(), 0);
    assert!(host.foreground.is_none());
    assert!(!service.is_running());
    assert!(!service.bubble().is_attached());
}

#[test]
fn test_permission_denied_on_mask_show() {
    let mut service = started();
    service.host_mut().permission = false;

    let reply = service.handle_command(
        HostCommand::ShowTranslationOverlay {
            translation_data: S5_PAYLOAD.into(),
        },
        10,
    );
    assert_eq!(reply.error.unwrap().code, CommandErrorCode::PermissionDenied);
    let host = service.host();
    assert_eq!(host.actions.len(), 1);
    assert_eq!(host.actions[0].method(), "overlay_permission_denied");
    assert_eq!(host.toasts.len(), 1);
    assert_eq!(host.toasts[0].1, ToastDuration::Long);
    assert!(!host.window.is_attached(SurfaceId::MASK));
    assert_eq!(service.bubble().state(), BubbleState::Idle);
}

#[test]
fn test_bubble_raise_failure_stops_service() {
    let mut service = started();
    service
        .host_mut()
        .window
        .refuse_next_add_of(SurfaceId::BUBBLE, "window leaked");

    // The mask attaches, then raising the bubble above it fails.
    service.show_mask(S5_PAYLOAD, 10).unwrap();

    let host = service.host();
    let methods: Vec<&str> = host.actions.iter().map(|a| a.method()).collect();
    assert_eq!(methods, vec!["overlay_error", "mask_closed"]);
    assert_eq!(host.window.attached_count(), 0);
    assert!(host.foreground.is_none());
    assert!(!service.is_running());
    assert_eq!(service.bubble().state(), BubbleState::Idle);
}

#[test]
fn test_mask_attach_failure_stops_service() {
    let mut service = started();
    service
        .host_mut()
        .window
        .refuse_next_add_of(SurfaceId::MASK, "bad token");

    let reply = service.handle_command(
        HostCommand::ShowTranslationOverlay {
            translation_data: S5_PAYLOAD.into(),
        },
        10,
    );
    assert_eq!(reply.error.unwrap().code, CommandErrorCode::StartFailed);
    let host = service.host();
    assert_eq!(host.actions.len(), 1);
    assert_eq!(host.actions[0].method(), "overlay_error");
    assert_eq!(host.window.attached_count(), 0);
    assert!(!service.is_running());
}

#[test]
fn test_menu_attach_failure_keeps_bubble_visible() {
    let mut service = started();
    service.host_mut().window.refuse_next_add("menu refused");
    tap_bubble(&mut service, 0);

    assert!(!service.menu().is_expanded());
    let host = service.host();
    assert_eq!(host.actions.len(), 1);
    assert_eq!(host.actions[0].method(), "overlay_error");
    assert_eq!(host.toasts[0].1, ToastDuration::Long);
    assert_eq!(host.window.z_order(), &[SurfaceId::BUBBLE]);
    assert!(host.window.spec(SurfaceId::BUBBLE).unwrap().visible);
    assert!(service.is_running());

    // The next tap expands normally.
    tap_bubble(&mut service, 1000);
    assert!(service.menu().is_expanded());
}

#[test]
fn test_json_commands_round_the_service() {
    let mut service = OverlayService::new(HeadlessHost::default(), OverlayConfig::default());
    let reply = service.handle_command_json(r#"{"method":"check_overlay_permission"}"#, 0);
    assert_eq!(reply.value, Some(serde_json::Value::Bool(true)));

    let reply = service.handle_command_json(r#"{"method":"show_floating_bubble"}"#, 0);
    assert!(reply.success);
    assert!(service.bubble().is_attached());

    let reply = service.handle_command_json(r#"{"method":"show_translation_overlay"}"#, 5);
    assert_eq!(reply.error.unwrap().code, CommandErrorCode::InvalidArgs);
}

/// Host assembled from parts, with actions delivered over a channel.
struct ChannelHost {
    window: HeadlessWindowSystem,
    bridge: transla_overlay_rs::platform::ChannelBridge,
}

mod channel_host {
    use super::ChannelHost;
    use transla_overlay_rs::platform::{
        ForegroundNotification, LifecycleHost, PermissionProbe, ToastDuration, Toaster,
    };
    use transla_overlay_rs::surface::{SurfaceSpec, WindowError};
    use transla_overlay_rs::{Action, ActionBridge, DisplayMetrics, SurfaceId, WindowSystem};

    impl WindowSystem for ChannelHost {
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
    }

    impl ActionBridge for ChannelHost {
        fn emit(&mut self, action: Action) {
            self.bridge.emit(action);
        }
    }

    impl PermissionProbe for ChannelHost {
        fn can_draw_overlays(&self) -> bool {
            true
        }
    }

    impl Toaster for ChannelHost {
        fn toast(&mut self, _message: &str, _duration: ToastDuration) {}
    }

    impl LifecycleHost for ChannelHost {
        fn start_in_foreground(&mut self, _notification: &ForegroundNotification) {}
        fn stop_foreground(&mut self) {}
    }
}

#[test]
fn test_actions_over_channel_bridge() {
    let (bridge, actions) = transla_overlay_rs::platform::ChannelBridge::new();
    let host = ChannelHost {
        window: HeadlessWindowSystem::default(),
        bridge,
    };
    let mut service = OverlayService::new(host, OverlayConfig::default());
    service.start(0).unwrap();

    service.handle_touch(TouchTarget::Bubble, TouchEvent::down(1000.0, 500.0, 0));
    service.tick(500);
    service.show_mask(BAD_MASK, 600).unwrap_err();
    service.show_mask(S5_PAYLOAD, 700).unwrap();
    service.stop();

    let methods: Vec<&str> = actions.try_iter().map(|a| a.method()).collect();
    assert_eq!(
        methods,
        vec!["translate_fullscreen", "overlay_error", "mask_closed"]
    );
}

const BAD_MASK: &str = r#"{"items":[{"bbox":{"l":0,"t":0,"w":0}}]}"#;
