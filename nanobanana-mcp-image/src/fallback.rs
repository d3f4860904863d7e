//! Model fallback policy.
//!
//! A generation starts in [`FallbackState::Primary`] on the requested model.
//! When the pro model answers with a quota, access or billing status, the call
//! moves to [`FallbackState::Retried`] on the flash model. Nothing retries
//! after that.

use nanobanana_mcp_common::models::ImageModel;

/// HTTP statuses that trigger a retry on the fallback model.
///
/// - 429: rate limited / quota exhausted
/// - 403: model not enabled for this key
/// - 402: billing required
pub const RETRYABLE_STATUS_CODES: &[u16] = &[429, 403, 402];

/// Whether a failed status is eligible for fallback.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}

/// Where a single generation is in the fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    /// First attempt, on the caller's model.
    Primary(ImageModel),
    /// Second attempt after the requested model was refused.
    Retried {
        /// Model the caller asked for
        requested: ImageModel,
        /// Model actually used for this attempt
        model: ImageModel,
    },
}

impl FallbackState {
    /// Start a generation on `model`.
    pub fn new(model: ImageModel) -> Self {
        FallbackState::Primary(model)
    }

    /// Model to call in this state.
    pub fn model(&self) -> ImageModel {
        match *self {
            FallbackState::Primary(model) => model,
            FallbackState::Retried { model, .. } => model,
        }
    }

    /// Model the caller originally requested.
    pub fn requested(&self) -> ImageModel {
        match *self {
            FallbackState::Primary(model) => model,
            FallbackState::Retried { requested, .. } => requested,
        }
    }

    /// True once the fallback model has been substituted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, FallbackState::Retried { .. })
    }

    /// Next state after the current attempt failed with `status`.
    ///
    /// Returns `None` when the failure is terminal.
    pub fn on_failure(self, status: u16) -> Option<FallbackState> {
        match self {
            FallbackState::Primary(model) if model.is_pro() && is_retryable_status(status) => {
                model.fallback().map(|fallback| FallbackState::Retried {
                    requested: model,
                    model: fallback,
                })
            }
            _ => None,
        }
    }
}
