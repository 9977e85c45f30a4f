//! Real-time noise suppression pipeline core.
//!
//! Decouples an audio producer and an audio consumer running at independent
//! rates: frames pushed by one side pass through an [`Effect`] in 10 ms
//! batches, wait in a lock-free ring, and are pulled by the other side under
//! a [`LatencyMode`]-driven priming policy.
//!
//! # Primary API
//!
//! - [`Pipeline`]: push / pull / process / flush and runtime properties
//! - [`PipelineConfig`]: format, float clamp range, latency table
//! - [`AuthorizationContext`]: license gate required to build a pipeline
//! - [`Effect`]: the transform plugged into a pipeline
//!
//! # Example
//!
//! ```ignore
//! use hush_core::*;
//!
//! let auth = AuthorizationContext::new(Box::new(my_backend));
//! auth.authorize(&Credentials::key("..."))?;
//!
//! let config = PipelineConfig::with_format(SampleFormat::SignedInt16, 48000);
//! let pipeline = Pipeline::new(config, Box::new(Passthrough), &auth)?;
//!
//! let written = pipeline.process(Some(&input), Some(&mut output));
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod auth;
pub use auth::{AuthBackend, AuthError, AuthResult, AuthStatus, AuthorizationContext, Credentials};

mod format;
pub use format::{AudioFormat, SampleFormat};

mod codec;
pub use codec::SampleCodec;

mod config;
pub use config::PipelineConfig;

pub mod latency;
pub use latency::{
    AtomicLatencyMode, LatencyMode, LatencyPolicy, LatencyProfile, LatencyTable, WINDOW_MS,
};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicUnitFloat};

mod params;
pub use params::{EffectParams, EffectSnapshot};

pub mod ring;
pub use ring::{RingBuffer, RingReader, RingWriter};

mod effect;
pub use effect::{Effect, Passthrough};

mod stats;
pub use stats::{PipelineMetrics, PipelineStats};

mod pipeline;
pub use pipeline::{Pipeline, PipelineEvent, PipelineState};

/// Synchronization re-exports shared across the workspace.
pub mod compat;
