//! # Hush - Real-time Noise Suppression Pipeline
//!
//! Buffers audio between a producer and a consumer running at independent
//! rates and runs noise suppression over the stream on the way through.
//!
//! ## Architecture
//!
//! Hush is an umbrella crate that coordinates:
//! - **hush-core** - Pipeline runtime (ring buffer, latency policy, push/pull state machine, authorization gate)
//! - **hush-denoise** - RNNoise effect with sample rate conversion
//!
//! ## Quick Start
//!
//! ```ignore
//! use hush::prelude::*;
//!
//! let backend = OfflineKeyBackend::new().with_key("secret", LicenseGrant::perpetual());
//! let auth = AuthorizationContext::shared(Box::new(backend));
//! auth.authorize(&Credentials::key("secret"))?;
//!
//! let factory = Factory::new(auth.clone());
//! let pipeline = factory.new_pipeline(
//!     PipelineConfig::with_format(SampleFormat::SignedInt16, 16000)
//!         .with_latency_mode(LatencyMode::Streaming),
//! )?;
//!
//! // Audio thread(s)
//! pipeline.push(&captured);
//! let written = pipeline.pull(&mut playback);
//!
//! // End of stream
//! while pipeline.flush(Some(&mut tail)) == tail.len() / 2 {}
//!
//! auth.teardown();
//! ```
//!
//! ## Feature Flags
//!
//! - `denoise` (default) - RNNoise as the factory's default effect

/// Re-export of hush-core for direct access
pub use hush_core as core;

pub use hush_core::{
    // Format and configuration
    AudioFormat,
    // Authorization
    AuthBackend,
    AuthError,
    AuthResult,
    AuthStatus,
    AuthorizationContext,
    Credentials,
    // Effects
    Effect,
    EffectParams,
    LatencyMode,
    LatencyPolicy,
    LatencyProfile,
    LatencyTable,
    Passthrough,
    // Pipeline
    Pipeline,
    PipelineConfig,
    PipelineMetrics,
    PipelineState,
    SampleFormat,
};

#[cfg(feature = "denoise")]
pub use hush_denoise as denoise;

#[cfg(feature = "denoise")]
pub use hush_denoise::RnnoiseEffect;

mod error;
pub use error::{Error, Result};

mod factory;
pub use factory::Factory;

mod license;
pub use license::{LicenseGrant, OfflineKeyBackend};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Error, Factory, LicenseGrant, OfflineKeyBackend, Result};

    pub use crate::{
        AudioFormat, AuthStatus, AuthorizationContext, Credentials, Effect, LatencyMode,
        Passthrough, Pipeline, PipelineConfig, PipelineMetrics, PipelineState, SampleFormat,
    };

    #[cfg(feature = "denoise")]
    pub use crate::RnnoiseEffect;
}
