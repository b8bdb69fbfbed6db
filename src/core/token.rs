use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::models::service_time;
use crate::error::{Result, ScanError};

/// Session credential issued by the service login endpoint.
///
/// Handles share it through an `Arc`; this crate only checks it and never
/// refreshes it.
#[derive(Clone, Deserialize)]
pub struct LoginToken {
    pub access_token: String,
    #[serde(rename = ".issued", deserialize_with = "service_time::deserialize")]
    pub issued: DateTime<Utc>,
    #[serde(rename = ".expires", deserialize_with = "service_time::deserialize")]
    pub expires: DateTime<Utc>,
}

impl LoginToken {
    /// Token issued now.
    pub fn new(access_token: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            issued: Utc::now(),
            expires,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_empty() || self.expires <= now
    }

    /// Fails with `AuthorizationExpired` if the token can no longer be used.
    pub fn validate(&self) -> Result<()> {
        self.validate_at(Utc::now())
    }

    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired_at(now) {
            return Err(ScanError::AuthorizationExpired {
                expired_at: self.expires,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for LoginToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginToken")
            .field("access_token", &"<redacted>")
            .field("issued", &self.issued)
            .field("expires", &self.expires)
            .finish()
    }
}
