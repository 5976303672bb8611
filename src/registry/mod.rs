pub mod ecr;

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::credentials::{CloudContext, SecretValue};
use crate::error::{DeployError, DeployResult};

/// Fully-qualified reference to a pushed image: registry host,
/// repository, and tag or digest. Opaque once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference(String);

impl ImageReference {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded registry push credentials and the endpoint they are
/// valid for.
#[derive(Debug, Clone)]
pub struct RegistryAuth {
    pub username: String,
    pub password: SecretValue,
    pub endpoint: String,
}

/// Issues short-lived push credentials for a container registry.
pub trait RegistryTokens {
    /// Obtain an authorization for the registry in the context's
    /// region. Fails with
    /// [`DeployError::AuthorizationFailed`] when the registry
    /// returns no authorization data.
    fn authorization(&self, ctx: &CloudContext) -> DeployResult<RegistryAuth>;
}

/// Decode a registry authorization token (base64 of
/// `username:password`) into usable credentials. The password is
/// wrapped as a secret before this function returns.
pub fn decode_token(token: &str, endpoint: &str) -> DeployResult<RegistryAuth> {
    let decoded = STANDARD
        .decode(token)
        .map_err(|_| DeployError::MalformedToken)?;
    let decoded = String::from_utf8(decoded).map_err(|_| DeployError::MalformedToken)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(DeployError::MalformedToken)?;

    Ok(RegistryAuth {
        username: username.to_string(),
        password: SecretValue::new(password),
        endpoint: endpoint.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_token_splits_credentials() {
        let token = STANDARD.encode("AWS:ephemeral-password");

        let auth = decode_token(&token, "https://123.dkr.ecr.eu-west-1.amazonaws.com")
            .expect("valid token");

        assert_eq!(auth.username, "AWS");
        assert_eq!(auth.password.expose(), "ephemeral-password");
        assert_eq!(auth.endpoint, "https://123.dkr.ecr.eu-west-1.amazonaws.com");
    }

    #[test]
    fn decode_token_password_may_contain_colons() {
        let token = STANDARD.encode("AWS:pass:with:colons");

        let auth = decode_token(&token, "endpoint").expect("valid token");

        assert_eq!(auth.password.expose(), "pass:with:colons");
    }

    #[test]
    fn decode_token_rejects_garbage() {
        let err = decode_token("not-base64!!", "endpoint").unwrap_err();
        assert!(matches!(err, DeployError::MalformedToken));
    }

    #[test]
    fn decode_token_rejects_missing_separator() {
        let token = STANDARD.encode("no-separator");

        let err = decode_token(&token, "endpoint").unwrap_err();
        assert!(matches!(err, DeployError::MalformedToken));
    }

    #[test]
    fn auth_debug_hides_password() {
        let token = STANDARD.encode("AWS:hunter2");
        let auth = decode_token(&token, "endpoint").expect("valid token");

        let debug = format!("{auth:?}");
        assert!(!debug.contains("hunter2"));
    }
}
