//! The rollover procedure: publish a fresh image and repoint a
//! running service at a new task-definition revision.
//!
//! The procedure is a strictly linear sequence - push, resolve,
//! mutate, register, deregister the old revision, update the
//! service. Every step feeds the next and the first failure
//! aborts the run; completed steps are never undone, so a failed
//! service update leaves the new revision registered and the old
//! one inactive for the operator to sort out.

use crate::app::App;
use crate::builder::ImageBuilder;
use crate::credentials::CloudContext;
use crate::error::{DeployError, DeployResult};
use crate::orchestration::Orchestrator;
use crate::registry::{ImageReference, RegistryTokens};
use crate::taskdef::{self, TaskDefinition};

/// Names the cluster, service, family, and registry repository a
/// deploy targets.
#[derive(Debug, Clone)]
pub struct DeployTarget {
    pub cluster: String,
    pub service: String,
    pub family: String,
    pub repository: String,
}

/// Resolve the most recent registered revision of `family`.
///
/// Returns the revision's identifier together with its full
/// specification. Fails with [`DeployError::FamilyNotFound`]
/// when the family has no registered revisions.
pub fn resolve_latest(
    orchestrator: &dyn Orchestrator,
    ctx: &CloudContext,
    family: &str,
) -> DeployResult<(String, TaskDefinition)> {
    let revisions = orchestrator.list_revisions(ctx, family)?;

    let Some(latest) = revisions.first() else {
        return Err(DeployError::FamilyNotFound(family.to_string()));
    };
    eprintln!("Latest task definition: {latest}");

    let taskdef = orchestrator.describe_revision(ctx, latest)?;
    Ok((latest.clone(), taskdef))
}

/// Build the image and push it to `repository`, returning the
/// reference the registry assigned.
pub fn push(
    builder: &dyn ImageBuilder,
    registry: &dyn RegistryTokens,
    app: &App,
    ctx: &CloudContext,
    repository: &str,
) -> DeployResult<ImageReference> {
    builder.build(app)?;
    let auth = registry.authorization(ctx)?;
    builder.publish(app, &auth, repository)
}

/// Roll `target.service` over to a freshly pushed image.
///
/// The new revision is a clone of the family's latest with every
/// container image replaced by the pushed reference. The old
/// revision is deregistered before the service update; since
/// deregistration only blocks future resolution, the service
/// keeps running on it until the update lands.
pub fn deploy(
    builder: &dyn ImageBuilder,
    registry: &dyn RegistryTokens,
    orchestrator: &dyn Orchestrator,
    app: &App,
    ctx: &CloudContext,
    target: &DeployTarget,
) -> DeployResult<String> {
    let image = push(builder, registry, app, ctx, &target.repository)?;

    eprintln!("Resolving latest revision of family '{}'...", target.family);
    let (previous, current) = resolve_latest(orchestrator, ctx, &target.family)?;

    let next = taskdef::with_image(&current, image.as_str());

    eprintln!("Registering new revision of '{}'...", target.family);
    let registered = orchestrator.register_revision(ctx, &next)?;
    eprintln!("Registered task definition: {registered}");

    eprintln!("Deregistering {previous}...");
    orchestrator.deregister_revision(ctx, &previous)?;

    eprintln!("Updating service '{}'...", target.service);
    orchestrator.update_service(ctx, &target.cluster, &target.service, &registered)?;

    let confirmation = format!(
        "Service {} updated to use task definition {registered}",
        target.service
    );
    eprintln!("{confirmation}");
    Ok(confirmation)
}
