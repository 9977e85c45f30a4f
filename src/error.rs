//! Centralized error type for the hush umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] hush_core::Error),

    #[error("Authorization: {0}")]
    Auth(#[from] hush_core::AuthError),

    #[cfg(feature = "denoise")]
    #[error("Denoise: {0}")]
    Denoise(#[from] hush_denoise::Error),
}

impl Error {
    /// Status reported when pipeline creation was refused for lack of a
    /// license, `None` for every other failure.
    pub fn not_authorized(&self) -> Option<hush_core::AuthStatus> {
        match self {
            Error::Core(hush_core::Error::NotAuthorized { status }) => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
