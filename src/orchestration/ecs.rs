use serde_json::Value;

use crate::cmd;
use crate::credentials::CloudContext;
use crate::error::{DeployError, DeployResult};
use crate::orchestration::Orchestrator;
use crate::taskdef::TaskDefinition;

/// Amazon ECS control plane driven through the `aws` CLI.
///
/// Requires `aws` on `PATH`. Every call injects the credential
/// context into the child process environment for that call
/// only; responses are parsed from `--output json`.
pub struct EcsCli;

impl EcsCli {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn call(ctx: &CloudContext, args: &[&str]) -> DeployResult<Value> {
        let mut full_args = vec!["ecs"];
        full_args.extend_from_slice(args);
        full_args.push("--output");
        full_args.push("json");

        let response = cmd::run_with_env("aws", &full_args, &ctx.env())?;
        Ok(serde_json::from_str(&response)?)
    }
}

impl Default for EcsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator for EcsCli {
    fn list_revisions(&self, ctx: &CloudContext, family: &str) -> DeployResult<Vec<String>> {
        let parsed = Self::call(
            ctx,
            &[
                "list-task-definitions",
                "--family-prefix",
                family,
                "--sort",
                "DESC",
                "--max-items",
                "1",
            ],
        )?;

        Ok(parsed["taskDefinitionArns"]
            .as_array()
            .map(|arns| {
                arns.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default())
    }

    fn describe_revision(&self, ctx: &CloudContext, id: &str) -> DeployResult<TaskDefinition> {
        let parsed = Self::call(ctx, &["describe-task-definition", "--task-definition", id])?;

        let taskdef = parsed
            .get("taskDefinition")
            .cloned()
            .ok_or_else(|| DeployError::Other(format!("malformed describe response for {id}")))?;

        Ok(serde_json::from_value(taskdef)?)
    }

    fn register_revision(
        &self,
        ctx: &CloudContext,
        taskdef: &TaskDefinition,
    ) -> DeployResult<String> {
        let input = taskdef.registration_payload().to_string();

        let parsed = Self::call(
            ctx,
            &["register-task-definition", "--cli-input-json", &input],
        )
        .map_err(|e| DeployError::RegistrationFailed(e.to_string()))?;

        parsed["taskDefinition"]["taskDefinitionArn"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                DeployError::RegistrationFailed("response missing taskDefinitionArn".to_string())
            })
    }

    fn deregister_revision(&self, ctx: &CloudContext, id: &str) -> DeployResult<()> {
        Self::call(ctx, &["deregister-task-definition", "--task-definition", id])?;
        Ok(())
    }

    fn update_service(
        &self,
        ctx: &CloudContext,
        cluster: &str,
        service: &str,
        id: &str,
    ) -> DeployResult<()> {
        Self::call(
            ctx,
            &[
                "update-service",
                "--cluster",
                cluster,
                "--service",
                service,
                "--task-definition",
                id,
            ],
        )
        .map_err(|e| DeployError::ServiceUpdateFailed {
            service: service.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
