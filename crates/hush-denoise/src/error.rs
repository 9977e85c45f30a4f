//! Error types for hush-denoise

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported sample rate {0} Hz (expected 8000..=192000)")]
    UnsupportedSampleRate(u32),

    #[error("Resampler setup failed: {0}")]
    Resampler(String),

    #[error("Resampling failed: {0}")]
    Resample(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rubato::ResamplerConstructionError> for Error {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        Error::Resampler(e.to_string())
    }
}

impl From<rubato::ResampleError> for Error {
    fn from(e: rubato::ResampleError) -> Self {
        Error::Resample(e.to_string())
    }
}
