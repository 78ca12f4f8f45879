//! Long-lived credentials and the short-lived bearer token they buy.

use std::fmt;

use crate::errors::{OutpostResult, SyncError};

pub const ADMISSION_NO_ENV: &str = "OUTPOST_ADMISSION_NO";
pub const PASSWORD_ENV: &str = "OUTPOST_PASSWORD";

/// Login identifier and secret. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    admission_no: String,
    password: String,
}

impl Credentials {
    pub fn new(admission_no: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            admission_no: admission_no.into(),
            password: password.into(),
        }
    }

    /// Read credentials from `OUTPOST_ADMISSION_NO` and `OUTPOST_PASSWORD`.
    pub fn from_env() -> OutpostResult<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| SyncError::Configuration {
                reason: format!("environment variable {name} is not set"),
            })
        };
        let credentials = Self::new(read(ADMISSION_NO_ENV)?, read(PASSWORD_ENV)?);
        credentials.validate()?;
        Ok(credentials)
    }

    pub fn admission_no(&self) -> &str {
        &self.admission_no
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Both parts must be non-blank.
    pub fn validate(&self) -> OutpostResult<()> {
        if self.admission_no.trim().is_empty() {
            return Err(SyncError::Configuration {
                reason: "credentials are missing an admission number".into(),
            }
            .into());
        }
        if self.password.is_empty() {
            return Err(SyncError::Configuration {
                reason: "credentials are missing a password".into(),
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("admission_no", &self.admission_no)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token issued by the remote. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}
