//! The full-screen translation mask.
//!
//! Parses the host's translation payload, places one translated block over
//! each source region and broadcasts its visibility on the event bus.

use crate::error::OverlayError;
use crate::events::{EventPublisher, OverlayEvent};
use crate::surface::{
    CutoutMode, Geometry, LayoutParams, MaskView, Rect, Surface, SurfaceContent, SurfaceId,
    SurfaceRole, WindowFlags, WindowSystem,
};
use crate::ui::components::MaskBlock;
use crate::ui::theme::Theme;
use serde_json::{Map, Value};
use thiserror::Error;

/// A translated region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskItem {
    /// Source region in screen pixels
    pub bbox: Rect,
    pub translated_text: String,
    pub original_text: String,
}

/// Mask payload error types.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not an object")]
    NotAnObject,

    #[error("`items` is not an array")]
    ItemsNotArray,

    #[error("item {index}: malformed bbox: {reason}")]
    MalformedBbox { index: usize, reason: String },

    #[error("item {index}: translatedText is not a string")]
    InvalidText { index: usize },
}

/// Parse a payload of the form `{"items": [{"bbox": {..}, "translatedText": ..}]}`.
///
/// Items without `bbox` or `translatedText` are skipped. A `bbox` that is
/// present but malformed fails the whole payload.
pub fn parse_payload(json: &str) -> Result<Vec<MaskItem>, PayloadError> {
    let root: Value = serde_json::from_str(json)?;
    let root = root.as_object().ok_or(PayloadError::NotAnObject)?;
    let items = match root.get("items") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(PayloadError::ItemsNotArray),
    };

    let mut parsed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(item) = item.as_object() else {
            tracing::warn!(index, "Skipping mask item that is not an object");
            continue;
        };
        let Some(bbox) = item.get("bbox") else {
            tracing::warn!(index, "Skipping mask item without bbox");
            continue;
        };
        let bbox = parse_bbox(index, bbox)?;
        let translated_text = match item.get("translatedText") {
            None => {
                tracing::warn!(index, "Skipping mask item without translatedText");
                continue;
            }
            Some(Value::String(text)) => text.clone(),
            Some(_) => return Err(PayloadError::InvalidText { index }),
        };
        let original_text = item
            .get("originalText")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        parsed.push(MaskItem {
            bbox,
            translated_text,
            original_text,
        });
    }
    Ok(parsed)
}

fn parse_bbox(index: usize, value: &Value) -> Result<Rect, PayloadError> {
    let malformed = |reason: String| PayloadError::MalformedBbox { index, reason };
    let bbox = value
        .as_object()
        .ok_or_else(|| malformed("not an object".to_string()))?;
    let field = |bbox: &Map<String, Value>, key: &str| -> Result<i32, PayloadError> {
        let value = bbox
            .get(key)
            .ok_or_else(|| malformed(format!("missing `{key}`")))?;
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| malformed(format!("`{key}` is not an integer")))
    };

    let left = field(bbox, "l")?;
    let top = field(bbox, "t")?;
    let width = field(bbox, "w")?;
    let height = field(bbox, "h")?;
    if width < 0 || height < 0 {
        return Err(malformed("negative size".to_string()));
    }
    Ok(Rect::new(left, top, width, height))
}

pub struct MaskController {
    theme: Theme,
    items: Vec<MaskItem>,
    surface: Option<Surface>,
    publisher: EventPublisher,
}

impl MaskController {
    pub fn new(publisher: EventPublisher, theme: Theme) -> Self {
        Self {
            theme,
            items: Vec::new(),
            surface: None,
            publisher,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.surface.as_ref().is_some_and(Surface::is_attached)
    }

    pub fn items(&self) -> &[MaskItem] {
        &self.items
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Show the mask for `payload`, or replace the items of a mask already
    /// shown. Nothing is attached when parsing fails.
    pub fn show(&mut self, payload: &str, window: &mut dyn WindowSystem) -> Result<(), OverlayError> {
        let items = parse_payload(payload)?;
        let content = SurfaceContent::Mask(MaskView {
            blocks: items
                .iter()
                .map(|item| MaskBlock::build(item, &self.theme))
                .collect(),
        });

        if let Some(surface) = self.surface.as_mut().filter(|s| s.is_attached()) {
            surface.set_content(content, window);
            tracing::info!(items = items.len(), "Mask refreshed");
            self.items = items;
            return Ok(());
        }

        let mut layout = LayoutParams::floating(Geometry::full_screen(), window.overlay_layer());
        layout.flags = WindowFlags::NOT_FOCUSABLE
            | WindowFlags::LAYOUT_IN_SCREEN
            | WindowFlags::LAYOUT_NO_LIMITS
            | WindowFlags::FULLSCREEN;
        if window.supports_cutout_modes() {
            layout.cutout = CutoutMode::ShortEdges;
        }

        let mut surface = Surface::new(SurfaceId::MASK, SurfaceRole::Mask, layout, content);
        surface
            .attach(window)
            .map_err(|e| OverlayError::attach(SurfaceId::MASK, e))?;
        tracing::info!(items = items.len(), "Mask shown");
        self.items = items;
        self.surface = Some(surface);
        self.publisher.publish(OverlayEvent::OverlayShown);
        Ok(())
    }

    /// Tear the mask down. Returns whether it was attached.
    pub fn hide(&mut self, window: &mut dyn WindowSystem) -> bool {
        let Some(mut surface) = self.surface.take() else {
            return false;
        };
        self.items.clear();
        let was_attached = surface.detach(window);
        if was_attached {
            tracing::info!("Mask hidden");
            self.publisher.publish(OverlayEvent::OverlayHidden);
        }
        was_attached
    }
}
