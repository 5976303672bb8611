use serde_json::Value;

use crate::cmd;
use crate::credentials::CloudContext;
use crate::error::{DeployError, DeployResult};
use crate::registry::{self, RegistryAuth, RegistryTokens};

/// Amazon ECR token provider driven through the `aws` CLI.
///
/// Requires `aws` on `PATH`. Credentials are injected into the
/// child process environment for the duration of the single call.
pub struct Ecr;

impl Ecr {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Ecr {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryTokens for Ecr {
    fn authorization(&self, ctx: &CloudContext) -> DeployResult<RegistryAuth> {
        let response = cmd::run_with_env(
            "aws",
            &["ecr", "get-authorization-token", "--output", "json"],
            &ctx.env(),
        )?;
        let parsed: Value = serde_json::from_str(&response)?;

        let auth_data = parsed["authorizationData"]
            .as_array()
            .and_then(|data| data.first())
            .ok_or(DeployError::AuthorizationFailed)?;

        let token = auth_data["authorizationToken"]
            .as_str()
            .ok_or(DeployError::AuthorizationFailed)?;
        let endpoint = auth_data["proxyEndpoint"]
            .as_str()
            .ok_or(DeployError::AuthorizationFailed)?;

        registry::decode_token(token, endpoint)
    }
}
