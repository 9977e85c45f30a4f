//! Authorization gate for pipeline creation.
//!
//! An [`AuthorizationContext`] is created once per process (or per host
//! subsystem) with an [`AuthBackend`], authorized explicitly, handed to
//! whatever creates pipelines, and torn down explicitly. Pipelines can only
//! be constructed while the context reports [`AuthStatus::Active`]. An
//! already-running pipeline is never interrupted by a later status change.

use crate::compat::Arc;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of an authorization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AuthStatus {
    /// The attempt itself failed (e.g. no network).
    Error = 0,
    /// The SDK may be used.
    Active = 1,
    /// No license, a revoked license, or no authorization yet.
    Inactive = 2,
    /// The license has expired.
    Expired = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub status: AuthStatus,
}

impl AuthResult {
    pub const fn new(status: AuthStatus) -> Self {
        Self { status }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == AuthStatus::Active
    }
}

/// What the caller presents to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Online check for a customer, optionally against a custom server.
    CustomerId {
        id: String,
        api_url: Option<String>,
    },
    /// Offline check with a secret key.
    Key(String),
}

impl Credentials {
    pub fn customer(id: impl Into<String>) -> Self {
        Credentials::CustomerId {
            id: id.into(),
            api_url: None,
        }
    }

    pub fn customer_with_server(id: impl Into<String>, api_url: impl Into<String>) -> Self {
        Credentials::CustomerId {
            id: id.into(),
            api_url: Some(api_url.into()),
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Credentials::Key(key.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            Credentials::CustomerId { .. } => "customer-id",
            Credentials::Key(_) => "key",
        }
    }
}

/// Errors raised while authorizing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Credentials of kind '{0}' are not supported by this backend")]
    Unsupported(&'static str),

    #[error("Malformed credentials: {0}")]
    InvalidCredentials(String),

    #[error("Authorization backend failed: {0}")]
    Backend(String),
}

/// License check implementation.
pub trait AuthBackend: Send + Sync {
    fn authorize(&self, credentials: &Credentials) -> Result<AuthStatus, AuthError>;
}

/// Process-scoped authorization state.
pub struct AuthorizationContext {
    backend: Box<dyn AuthBackend>,
    result: ArcSwap<AuthResult>,
}

impl AuthorizationContext {
    /// Starts out [`AuthStatus::Inactive`].
    pub fn new(backend: Box<dyn AuthBackend>) -> Self {
        Self {
            backend,
            result: ArcSwap::from_pointee(AuthResult::new(AuthStatus::Inactive)),
        }
    }

    pub fn shared(backend: Box<dyn AuthBackend>) -> Arc<Self> {
        Arc::new(Self::new(backend))
    }

    /// Run the backend and record its outcome. A backend error records
    /// [`AuthStatus::Error`] and is returned to the caller.
    pub fn authorize(&self, credentials: &Credentials) -> Result<AuthResult, AuthError> {
        match self.backend.authorize(credentials) {
            Ok(status) => {
                let result = AuthResult::new(status);
                self.result.store(Arc::new(result));
                tracing::debug!("Authorization via {}: {:?}", credentials.kind(), status);
                Ok(result)
            }
            Err(e) => {
                self.result.store(Arc::new(AuthResult::new(AuthStatus::Error)));
                tracing::warn!("Authorization via {} failed: {}", credentials.kind(), e);
                Err(e)
            }
        }
    }

    #[inline]
    pub fn status(&self) -> AuthStatus {
        self.result.load().status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status() == AuthStatus::Active
    }

    /// Forget the recorded outcome. New pipelines are refused until the next
    /// successful [`authorize`](Self::authorize).
    pub fn teardown(&self) {
        self.result.store(Arc::new(AuthResult::new(AuthStatus::Inactive)));
        tracing::debug!("Authorization context torn down");
    }
}

impl core::fmt::Debug for AuthorizationContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthorizationContext")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
