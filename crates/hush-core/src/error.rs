//! Error types for hush-core.
//!
//! Only construction can fail: bad configuration or missing authorization.
//! Overruns and underruns on the audio path are flow-control policy and
//! never surface here.

use thiserror::Error;

/// Error type for hush-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    #[error("Invalid PCM float range [{min}, {max}]: bounds must be finite, non-zero and equidistant from zero")]
    InvalidClampRange { min: f32, max: f32 },

    #[error("Invalid latency profile for {mode:?}: {reason}")]
    InvalidLatency {
        mode: crate::LatencyMode,
        reason: String,
    },

    #[error("Not authorized: license status is {status:?}")]
    NotAuthorized { status: crate::AuthStatus },
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
