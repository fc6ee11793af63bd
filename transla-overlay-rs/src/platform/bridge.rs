//! Action Bridge: the one-way channel from the core to the host application.

use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};

pub const TRANSLATE_FULLSCREEN: &str = "translate_fullscreen";
pub const START_AREA_SELECTION: &str = "start_area_selection";
pub const MASK_CLOSED: &str = "mask_closed";
pub const OVERLAY_PERMISSION_DENIED: &str = "overlay_permission_denied";
pub const OVERLAY_ERROR: &str = "overlay_error";

/// A named action reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// User long-pressed the bubble or chose the full-screen action
    TranslateFullscreen,

    /// User chose area selection from the menu
    StartAreaSelection,

    /// The mask was torn down without the host asking for it
    MaskClosed,

    /// An overlay surface could not be created without permission
    OverlayPermissionDenied(String),

    /// A surface failed to attach or a payload failed to parse
    OverlayError(String),
}

impl Action {
    /// Method name on the bridge.
    pub fn method(&self) -> &'static str {
        match self {
            Action::TranslateFullscreen => TRANSLATE_FULLSCREEN,
            Action::StartAreaSelection => START_AREA_SELECTION,
            Action::MaskClosed => MASK_CLOSED,
            Action::OverlayPermissionDenied(_) => OVERLAY_PERMISSION_DENIED,
            Action::OverlayError(_) => OVERLAY_ERROR,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Action::OverlayPermissionDenied(message) | Action::OverlayError(message) => {
                Some(message)
            }
            _ => None,
        }
    }

    /// Map a menu button's action name to a known action.
    pub fn from_menu_action(name: &str) -> Option<Action> {
        match name {
            TRANSLATE_FULLSCREEN => Some(Action::TranslateFullscreen),
            START_AREA_SELECTION => Some(Action::StartAreaSelection),
            _ => None,
        }
    }

    pub fn to_message(&self) -> ActionMessage {
        ActionMessage {
            method: self.method().to_string(),
            payload: self.payload().map(str::to_string),
        }
    }
}

/// Wire form of an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionMessage {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Receives actions emitted by the core.
pub trait ActionBridge {
    fn emit(&mut self, action: Action);
}

/// Bridge backed by an mpsc channel.
pub struct ChannelBridge {
    sender: Sender<Action>,
}

impl ChannelBridge {
    /// Create a bridge and the receiver the host drains.
    pub fn new() -> (Self, Receiver<Action>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl ActionBridge for ChannelBridge {
    fn emit(&mut self, action: Action) {
        tracing::debug!(action = action.method(), "Emitting action");
        if self.sender.send(action).is_err() {
            tracing::warn!("Action receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_skips_empty_payload() {
        let json = serde_json::to_string(&Action::TranslateFullscreen.to_message()).unwrap();
        assert_eq!(json, r#"{"method":"translate_fullscreen"}"#);

        let json =
            serde_json::to_string(&Action::OverlayError("bad".into()).to_message()).unwrap();
        assert_eq!(json, r#"{"method":"overlay_error","payload":"bad"}"#);
    }

    #[test]
    fn test_menu_action_lookup() {
        assert_eq!(
            Action::from_menu_action("start_area_selection"),
            Some(Action::StartAreaSelection)
        );
        assert_eq!(Action::from_menu_action("share"), None);
    }

    #[test]
    fn test_channel_bridge_delivers_in_order() {
        let (mut bridge, rx) = ChannelBridge::new();
        bridge.emit(Action::TranslateFullscreen);
        bridge.emit(Action::MaskClosed);
        let got: Vec<Action> = rx.try_iter().collect();
        assert_eq!(got, vec![Action::TranslateFullscreen, Action::MaskClosed]);
    }
}
