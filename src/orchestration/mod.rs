pub mod ecs;

use crate::credentials::CloudContext;
use crate::error::DeployResult;
use crate::taskdef::TaskDefinition;

/// Control plane of a managed container-orchestration service.
///
/// Revisions are immutable once registered: registration
/// creates, deregistration marks inactive, nothing is ever
/// rewritten or deleted. A deregistered revision stays
/// resolvable by identifier and keeps serving already-running
/// tasks and existing service bindings.
pub trait Orchestrator {
    /// Identifiers of registered revisions for `family`, newest
    /// first, limited to the single most recent. Empty when the
    /// family has no registered revisions.
    fn list_revisions(&self, ctx: &CloudContext, family: &str) -> DeployResult<Vec<String>>;

    /// Full specification of one registered revision.
    fn describe_revision(&self, ctx: &CloudContext, id: &str) -> DeployResult<TaskDefinition>;

    /// Register `taskdef` as a new revision. The platform
    /// assigns the next revision number; returns the new
    /// revision's identifier.
    fn register_revision(
        &self,
        ctx: &CloudContext,
        taskdef: &TaskDefinition,
    ) -> DeployResult<String>;

    /// Mark the revision identified by `id` inactive.
    fn deregister_revision(&self, ctx: &CloudContext, id: &str) -> DeployResult<()>;

    /// Point `service` in `cluster` at the revision identified
    /// by `id`.
    fn update_service(
        &self,
        ctx: &CloudContext,
        cluster: &str,
        service: &str,
        id: &str,
    ) -> DeployResult<()>;
}
