//! RNNoise noise suppression effect for the hush pipeline.
//!
//! [`RnnoiseEffect`] implements [`hush_core::Effect`]. It is the default
//! effect a `hush::Factory` builds into every pipeline.
//!
//! ```ignore
//! use hush_denoise::RnnoiseEffect;
//!
//! let effect = RnnoiseEffect::new(16000)?;
//! let pipeline = hush_core::Pipeline::new(config, Box::new(effect), &auth)?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod mix;
pub use mix::{blend, PowerRamp};

pub mod rate;
pub use rate::RateConverter;

mod rnnoise;
pub use rnnoise::{
    RnnoiseEffect, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, MODEL_FRAME, MODEL_SAMPLE_RATE,
};
