//! Offline license keys.
//!
//! [`OfflineKeyBackend`] checks secret keys against grants issued ahead of
//! time. It never contacts a server, so customer-id credentials are refused.

use hush_core::{AuthBackend, AuthError, AuthStatus, Credentials};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::SystemTime;

/// Terms attached to one issued key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseGrant {
    /// `None` never expires.
    pub expires_at: Option<SystemTime>,
    pub revoked: bool,
}

impl LicenseGrant {
    pub fn perpetual() -> Self {
        Self::default()
    }

    pub fn until(expires_at: SystemTime) -> Self {
        Self {
            expires_at: Some(expires_at),
            revoked: false,
        }
    }

    /// Status of this grant at `now`.
    pub fn status_at(&self, now: SystemTime) -> AuthStatus {
        if self.revoked {
            return AuthStatus::Inactive;
        }
        match self.expires_at {
            Some(expires_at) if now >= expires_at => AuthStatus::Expired,
            _ => AuthStatus::Active,
        }
    }
}

/// Key registry.
#[derive(Debug, Default)]
pub struct OfflineKeyBackend {
    grants: RwLock<HashMap<String, LicenseGrant>>,
}

impl OfflineKeyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key`, replacing any earlier grant for it.
    pub fn issue(&self, key: impl Into<String>, grant: LicenseGrant) {
        self.grants.write().insert(key.into(), grant);
    }

    pub fn with_key(self, key: impl Into<String>, grant: LicenseGrant) -> Self {
        self.issue(key, grant);
        self
    }

    /// Returns `false` if `key` was never issued.
    pub fn revoke(&self, key: &str) -> bool {
        match self.grants.write().get_mut(key) {
            Some(grant) => {
                grant.revoked = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.grants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.read().is_empty()
    }
}

impl AuthBackend for OfflineKeyBackend {
    fn authorize(&self, credentials: &Credentials) -> Result<AuthStatus, AuthError> {
        let key = match credentials {
            Credentials::Key(key) => key,
            Credentials::CustomerId { .. } => return Err(AuthError::Unsupported("customer-id")),
        };
        if key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("empty key".into()));
        }

        let status = self
            .grants
            .read()
            .get(key.as_str())
            .map_or(AuthStatus::Inactive, |grant| grant.status_at(SystemTime::now()));
        Ok(status)
    }
}
