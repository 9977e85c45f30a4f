//! Entry point for creating pipelines.

use crate::Result;
use hush_core::{AuthorizationContext, Effect, Pipeline, PipelineConfig};
use std::sync::Arc;

/// Creates pipelines on behalf of an authorized host.
///
/// A factory is cheap: it only holds the shared [`AuthorizationContext`],
/// which must report an active license whenever a pipeline is created.
/// Pipelines already created keep running after the context is torn down.
///
/// # Example
///
/// ```ignore
/// use hush::prelude::*;
///
/// let backend = OfflineKeyBackend::new().with_key("secret", LicenseGrant::perpetual());
/// let auth = AuthorizationContext::shared(Box::new(backend));
/// auth.authorize(&Credentials::key("secret"))?;
///
/// let factory = Factory::new(auth);
/// let pipeline = factory.new_pipeline(PipelineConfig::with_format(SampleFormat::Float32, 48000))?;
/// ```
#[derive(Debug, Clone)]
pub struct Factory {
    auth: Arc<AuthorizationContext>,
}

impl Factory {
    pub fn new(auth: Arc<AuthorizationContext>) -> Self {
        Self { auth }
    }

    pub fn authorization(&self) -> &AuthorizationContext {
        &self.auth
    }

    /// Create a pipeline running the default noise suppression effect.
    pub fn new_pipeline(&self, config: PipelineConfig) -> Result<Pipeline> {
        self.check_authorized()?;
        config.validate()?;

        let effect = default_effect(&config)?;
        self.new_pipeline_with_effect(config, effect)
    }

    /// Create a pipeline running `effect`.
    pub fn new_pipeline_with_effect(
        &self,
        config: PipelineConfig,
        effect: Box<dyn Effect>,
    ) -> Result<Pipeline> {
        Ok(Pipeline::new(config, effect, &self.auth)?)
    }

    fn check_authorized(&self) -> Result<()> {
        if self.auth.is_active() {
            return Ok(());
        }
        let status = self.auth.status();
        tracing::debug!("Refusing pipeline creation: license status {:?}", status);
        Err(hush_core::Error::NotAuthorized { status }.into())
    }
}

#[cfg(feature = "denoise")]
fn default_effect(config: &PipelineConfig) -> Result<Box<dyn Effect>> {
    let effect = hush_denoise::RnnoiseEffect::new(config.input_format.sample_rate)?;
    Ok(Box::new(effect))
}

#[cfg(not(feature = "denoise"))]
fn default_effect(_config: &PipelineConfig) -> Result<Box<dyn Effect>> {
    Ok(Box::new(hush_core::Passthrough))
}
