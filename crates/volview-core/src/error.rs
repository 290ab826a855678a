//! Error types for volview.

use thiserror::Error;

use crate::renderer::Capability;

/// The main error type for volview operations.
#[derive(Error, Debug)]
pub enum VolviewError {
    /// A renderer call failed.
    #[error("renderer error: {0}")]
    Backend(#[from] BackendError),

    /// A value supplied by the caller is outside the accepted range.
    #[error("invalid value for {what}: {value}")]
    InvalidValue { what: &'static str, value: String },

    /// No application data directory could be resolved for this platform.
    #[error("no application data directory available")]
    NoDataDir,

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for volview operations.
pub type Result<T> = std::result::Result<T, VolviewError>;

/// Errors reported by a [`Renderer`](crate::Renderer) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend does not provide this capability.
    #[error("capability not supported by this backend: {0}")]
    Unsupported(Capability),

    /// No volume is loaded, so the call has nothing to act on.
    #[error("no volume loaded")]
    NoVolume,

    /// An offscreen render target could not be created.
    #[error("offscreen target unavailable: {0}")]
    OffscreenUnavailable(String),

    /// The backend failed while executing the call.
    #[error("{capability} failed: {message}")]
    Failed {
        capability: Capability,
        message: String,
    },
}

impl BackendError {
    /// Creates a [`BackendError::Failed`] for the given capability.
    pub fn failed(capability: Capability, message: impl Into<String>) -> Self {
        Self::Failed {
            capability,
            message: message.into(),
        }
    }

    /// Returns whether this error only signals an absent capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// A specialized Result type for renderer calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;
