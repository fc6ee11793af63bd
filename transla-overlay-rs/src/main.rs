//! Replays a scripted overlay session against the in-memory host.
//!
//! ```text
//! transla-overlay-sim demos/session.json
//! ```
//!
//! The script sets up the host and lists timed steps. Each step runs a host
//! command or a touch (or nothing), then advances the clock to its time. The
//! window operations, bridge actions and command replies are printed as JSON
//! lines.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use transla_overlay_rs::platform::ToastDuration;
use transla_overlay_rs::surface::{Size, WindowOp};
use transla_overlay_rs::{
    logging, DisplayMetrics, HeadlessHost, HeadlessWindowSystem, HostCommand, OverlayConfig,
    OverlayService, TouchAction, TouchEvent, TouchTarget,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    #[serde(default)]
    config: OverlayConfig,
    #[serde(default = "granted")]
    permission: bool,
    #[serde(default)]
    metrics: DisplayMetrics,
    /// Fixed menu size reported by the window system
    menu_size: Option<Size>,
    steps: Vec<Step>,
}

fn granted() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Step {
    at: u64,
    command: Option<HostCommand>,
    touch: Option<ScriptTouch>,
}

#[derive(Debug, Deserialize)]
struct ScriptTouch {
    target: TouchTarget,
    action: TouchAction,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Output<'a> {
    Reply {
        at: u64,
        reply: &'a transla_overlay_rs::CommandReply,
    },
    Window {
        at: u64,
        op: &'static str,
        surface: u32,
    },
    Action {
        at: u64,
        method: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<&'a str>,
    },
    Toast {
        at: u64,
        message: &'a str,
        long: bool,
    },
}

fn main() -> Result<()> {
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: transla-overlay-sim <script.json>"),
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
    let script: Script =
        serde_json::from_str(&text).with_context(|| format!("Invalid script {path}"))?;

    logging::init(script.config.log_level.as_deref());
    tracing::info!(steps = script.steps.len(), "Replaying {}", path);

    let mut window = HeadlessWindowSystem::new(script.metrics);
    if let Some(size) = script.menu_size {
        window = window.with_menu_size(size);
    }
    let mut host = HeadlessHost::new(window);
    host.permission = script.permission;
    let mut service = OverlayService::new(host, script.config);

    for step in script.steps {
        if step.command.is_some() && step.touch.is_some() {
            bail!("step at {} has both a command and a touch", step.at);
        }
        if let Some(command) = step.command {
            let reply = service.handle_command(command, step.at);
            print(&Output::Reply {
                at: step.at,
                reply: &reply,
            })?;
        }
        if let Some(touch) = step.touch {
            let event = TouchEvent::new(touch.action, touch.x, touch.y, step.at);
            service.handle_touch(touch.target, event);
        }
        service.tick(step.at);
        flush(&mut service, step.at)?;
    }

    service.stop();
    let at = service.now_ms();
    flush(&mut service, at)
}

fn flush(service: &mut OverlayService<HeadlessHost>, at: u64) -> Result<()> {
    let host = service.host_mut();
    for op in host.window.take_ops() {
        let (op, surface) = match op {
            WindowOp::Add(id) => ("add", id.0),
            WindowOp::Update(id) => ("update", id.0),
            WindowOp::Remove(id) => ("remove", id.0),
        };
        print(&Output::Window { at, op, surface })?;
    }
    for action in host.take_actions() {
        print(&Output::Action {
            at,
            method: action.method(),
            payload: action.payload(),
        })?;
    }
    for (message, duration) in std::mem::take(&mut host.toasts) {
        print(&Output::Toast {
            at,
            message: &message,
            long: duration == ToastDuration::Long,
        })?;
    }
    Ok(())
}

fn print(output: &Output<'_>) -> Result<()> {
    println!("{}", serde_json::to_string(output)?);
    Ok(())
}
