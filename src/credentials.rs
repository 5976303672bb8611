use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{DeployError, DeployResult};

/// An opaque secret value.
///
/// `Debug` prints `[REDACTED]` and there is no `Display`, so a
/// secret cannot end up in logs or error messages by accident.
/// The backing store zeroes its memory on drop.
#[derive(Clone)]
pub struct SecretValue {
    inner: SecretString,
}

impl SecretValue {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: SecretString::from(value.into()),
        }
    }

    /// Exposes the secret for use. The returned reference must
    /// not be logged or stored.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// The AWS credential triple. Held only for the duration of the
/// calls that need it, never written out.
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key: SecretValue,
    pub secret_key: SecretValue,
    pub session_token: SecretValue,
}

impl AwsCredentials {
    #[must_use]
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key: SecretValue::new(access_key),
            secret_key: SecretValue::new(secret_key),
            session_token: SecretValue::new(session_token),
        }
    }

    /// Read the credential triple from the conventional
    /// environment variables.
    pub fn from_env() -> DeployResult<Self> {
        Ok(Self {
            access_key: env_secret("AWS_ACCESS_KEY_ID")?,
            secret_key: env_secret("AWS_SECRET_ACCESS_KEY")?,
            session_token: env_secret("AWS_SESSION_TOKEN")?,
        })
    }
}

fn env_secret(name: &str) -> DeployResult<SecretValue> {
    std::env::var(name)
        .map(SecretValue::new)
        .map_err(|_| DeployError::EnvMissing(name.to_string()))
}

/// Region-scoped credential context, passed opaquely to every
/// cloud API call.
#[derive(Debug, Clone)]
pub struct CloudContext {
    pub credentials: AwsCredentials,
    pub region: String,
}

impl CloudContext {
    #[must_use]
    pub fn new(credentials: AwsCredentials, region: &str) -> Self {
        Self {
            credentials,
            region: region.to_string(),
        }
    }

    /// Environment entries for one credentialed child process.
    /// The result contains plaintext secret material: hand it
    /// straight to [`crate::cmd::run_with_env`] and drop it.
    #[must_use]
    pub fn env(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "AWS_ACCESS_KEY_ID",
                self.credentials.access_key.expose().to_string(),
            ),
            (
                "AWS_SECRET_ACCESS_KEY",
                self.credentials.secret_key.expose().to_string(),
            ),
            (
                "AWS_SESSION_TOKEN",
                self.credentials.session_token.expose().to_string(),
            ),
            ("AWS_DEFAULT_REGION", self.region.clone()),
        ]
    }
}
