//! Error types for the overlay core.

use crate::surface::{SurfaceId, SurfaceRole, WindowError};
use crate::ui::mask::PayloadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced to the user through the Action Bridge.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("overlay permission not granted, cannot show the {surface}")]
    PermissionDenied { surface: SurfaceRole },

    #[error("failed to attach {surface}: {source}")]
    AttachFailed {
        surface: SurfaceId,
        #[source]
        source: WindowError,
    },

    #[error("invalid translation payload: {0}")]
    Payload(#[from] PayloadError),
}

impl OverlayError {
    pub fn attach(surface: SurfaceId, source: WindowError) -> Self {
        OverlayError::AttachFailed { surface, source }
    }
}

/// Error codes returned to the host in command replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    PermissionDenied,
    InvalidArgs,
    StartFailed,
    PayloadInvalid,
}

impl From<&OverlayError> for CommandErrorCode {
    fn from(err: &OverlayError) -> Self {
        match err {
            OverlayError::PermissionDenied { .. } => CommandErrorCode::PermissionDenied,
            OverlayError::AttachFailed { .. } => CommandErrorCode::StartFailed,
            OverlayError::Payload(_) => CommandErrorCode::PayloadInvalid,
        }
    }
}
