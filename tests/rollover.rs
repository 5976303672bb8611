//! End-to-end rollover scenarios against in-memory fakes of the
//! builder, registry, and orchestration collaborators.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ballista::app::App;
use ballista::builder::ImageBuilder;
use ballista::credentials::{AwsCredentials, CloudContext, SecretValue};
use ballista::error::{DeployError, DeployResult};
use ballista::orchestration::Orchestrator;
use ballista::registry::{ImageReference, RegistryAuth, RegistryTokens};
use ballista::rollover::{DeployTarget, deploy, push, resolve_latest};
use ballista::taskdef::TaskDefinition;
use serde_json::json;

const PUSHED: &str = "registry/app:sha256-new";

/// Call-order log shared between the fakes.
#[derive(Clone, Default)]
struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    fn record(&self, call: &str) {
        self.0.borrow_mut().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

struct FakeBuilder {
    log: CallLog,
}

impl ImageBuilder for FakeBuilder {
    fn build(&self, _app: &App) -> DeployResult<()> {
        self.log.record("build");
        Ok(())
    }

    fn test(&self, _app: &App) -> DeployResult<String> {
        self.log.record("test");
        Ok("ok".to_string())
    }

    fn run_service(&self, _app: &App) -> DeployResult<()> {
        self.log.record("run");
        Ok(())
    }

    fn publish(
        &self,
        _app: &App,
        _auth: &RegistryAuth,
        _repository: &str,
    ) -> DeployResult<ImageReference> {
        self.log.record("publish");
        Ok(ImageReference::new(PUSHED))
    }
}

struct FakeRegistry {
    log: CallLog,
    authorized: bool,
}

impl RegistryTokens for FakeRegistry {
    fn authorization(&self, _ctx: &CloudContext) -> DeployResult<RegistryAuth> {
        self.log.record("authorize");
        if self.authorized {
            Ok(RegistryAuth {
                username: "AWS".to_string(),
                password: SecretValue::new("ephemeral"),
                endpoint: "https://registry".to_string(),
            })
        } else {
            Err(DeployError::AuthorizationFailed)
        }
    }
}

struct FakeOrchestrator {
    log: CallLog,
    families: RefCell<HashMap<String, Vec<TaskDefinition>>>,
    deregistered: RefCell<Vec<String>>,
    bindings: RefCell<HashMap<String, String>>,
    fail_update: bool,
}

impl FakeOrchestrator {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            families: RefCell::new(HashMap::new()),
            deregistered: RefCell::new(Vec::new()),
            bindings: RefCell::new(HashMap::new()),
            fail_update: false,
        }
    }

    fn with_family(self, family: &str, revisions: Vec<TaskDefinition>) -> Self {
        self.families
            .borrow_mut()
            .insert(family.to_string(), revisions);
        self
    }

    fn stored_image(&self, family: &str, revision: u64) -> Option<String> {
        self.families.borrow()[family]
            .iter()
            .find(|t| t.revision == revision)
            .and_then(|t| t.container_definitions[0].image.clone())
    }
}

impl Orchestrator for FakeOrchestrator {
    fn list_revisions(&self, _ctx: &CloudContext, family: &str) -> DeployResult<Vec<String>> {
        self.log.record("list");
        let families = self.families.borrow();
        let mut revisions: Vec<&TaskDefinition> = families
            .get(family)
            .map(|r| r.iter().collect())
            .unwrap_or_default();
        // Platform contract: newest first, single result.
        revisions.sort_by(|a, b| b.revision.cmp(&a.revision));
        Ok(revisions
            .into_iter()
            .take(1)
            .filter_map(|t| t.task_definition_arn.clone())
            .collect())
    }

    fn describe_revision(&self, _ctx: &CloudContext, id: &str) -> DeployResult<TaskDefinition> {
        self.log.record("describe");
        self.families
            .borrow()
            .values()
            .flatten()
            .find(|t| t.task_definition_arn.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| DeployError::Other(format!("unknown revision: {id}")))
    }

    fn register_revision(
        &self,
        _ctx: &CloudContext,
        taskdef: &TaskDefinition,
    ) -> DeployResult<String> {
        self.log.record("register");
        let mut families = self.families.borrow_mut();
        let revisions = families.entry(taskdef.family.clone()).or_default();

        // The platform assigns identity; whatever the caller
        // carried over is discarded.
        let next = revisions.iter().map(|t| t.revision).max().unwrap_or(0) + 1;
        let id = format!("{}:{next}", taskdef.family);

        let mut stored = taskdef.clone();
        stored.revision = next;
        stored.task_definition_arn = Some(id.clone());
        revisions.push(stored);

        Ok(id)
    }

    fn deregister_revision(&self, _ctx: &CloudContext, id: &str) -> DeployResult<()> {
        self.log.record("deregister");
        self.deregistered.borrow_mut().push(id.to_string());
        Ok(())
    }

    fn update_service(
        &self,
        _ctx: &CloudContext,
        cluster: &str,
        service: &str,
        id: &str,
    ) -> DeployResult<()> {
        self.log.record("update");
        if self.fail_update {
            return Err(DeployError::ServiceUpdateFailed {
                service: service.to_string(),
                reason: "api rejected the update".to_string(),
            });
        }
        self.bindings
            .borrow_mut()
            .insert(format!("{cluster}/{service}"), id.to_string());
        Ok(())
    }
}

fn ctx() -> CloudContext {
    CloudContext::new(AwsCredentials::new("ak", "sk", "st"), "eu-west-1")
}

fn taskdef(family: &str, revision: u64, image: &str) -> TaskDefinition {
    serde_json::from_value(json!({
        "family": family,
        "revision": revision,
        "taskDefinitionArn": format!("{family}:{revision}"),
        "containerDefinitions": [{"name": "app", "image": image}]
    }))
    .expect("fixture task definition")
}

fn target() -> DeployTarget {
    DeployTarget {
        cluster: "prod".to_string(),
        service: "svc".to_string(),
        family: "web".to_string(),
        repository: "registry/app".to_string(),
    }
}

#[test]
fn resolution_selects_maximum_revision() {
    let log = CallLog::default();
    let orchestration = FakeOrchestrator::new(log).with_family(
        "web",
        vec![
            taskdef("web", 1, "a:1"),
            taskdef("web", 2, "a:2"),
            taskdef("web", 5, "a:5"),
            taskdef("web", 3, "a:3"),
        ],
    );

    let (id, resolved) = resolve_latest(&orchestration, &ctx(), "web").expect("resolves");

    assert_eq!(id, "web:5");
    assert_eq!(resolved.revision, 5);
    assert_eq!(resolved.container_definitions[0].image.as_deref(), Some("a:5"));
}

#[test]
fn empty_family_fails_before_any_further_call() {
    let log = CallLog::default();
    let orchestration = FakeOrchestrator::new(log.clone());

    let err = resolve_latest(&orchestration, &ctx(), "missing").unwrap_err();

    assert!(matches!(err, DeployError::FamilyNotFound(f) if f == "missing"));
    assert_eq!(log.calls(), vec!["list"]);
}

#[test]
fn full_rollover() {
    let log = CallLog::default();
    let builder = FakeBuilder { log: log.clone() };
    let registry = FakeRegistry {
        log: log.clone(),
        authorized: true,
    };
    let orchestration = FakeOrchestrator::new(log.clone())
        .with_family("web", vec![taskdef("web", 3, "old:1")]);

    let confirmation = deploy(
        &builder,
        &registry,
        &orchestration,
        &App::new("app"),
        &ctx(),
        &target(),
    )
    .expect("deploy succeeds");

    assert_eq!(
        confirmation,
        "Service svc updated to use task definition web:4"
    );
    assert_eq!(
        orchestration.stored_image("web", 4).as_deref(),
        Some(PUSHED)
    );
    assert_eq!(*orchestration.deregistered.borrow(), vec!["web:3"]);
    assert_eq!(
        orchestration.bindings.borrow().get("prod/svc").map(String::as_str),
        Some("web:4")
    );
    assert_eq!(
        log.calls(),
        vec![
            "build",
            "authorize",
            "publish",
            "list",
            "describe",
            "register",
            "deregister",
            "update",
        ]
    );
}

#[test]
fn missing_family_fails_only_after_the_push() {
    let log = CallLog::default();
    let builder = FakeBuilder { log: log.clone() };
    let registry = FakeRegistry {
        log: log.clone(),
        authorized: true,
    };
    let orchestration = FakeOrchestrator::new(log.clone());

    let mut missing = target();
    missing.family = "missing".to_string();

    let err = deploy(
        &builder,
        &registry,
        &orchestration,
        &App::new("app"),
        &ctx(),
        &missing,
    )
    .unwrap_err();

    assert!(matches!(err, DeployError::FamilyNotFound(f) if f == "missing"));
    // The image goes out before the family is even checked.
    assert_eq!(log.calls(), vec!["build", "authorize", "publish", "list"]);
    assert!(orchestration.deregistered.borrow().is_empty());
    assert!(orchestration.bindings.borrow().is_empty());
}

#[test]
fn failed_authorization_blocks_the_publish() {
    let log = CallLog::default();
    let builder = FakeBuilder { log: log.clone() };
    let registry = FakeRegistry {
        log: log.clone(),
        authorized: false,
    };

    let err = push(&builder, &registry, &App::new("app"), &ctx(), "registry/app").unwrap_err();

    assert!(matches!(err, DeployError::AuthorizationFailed));
    assert_eq!(log.calls(), vec!["build", "authorize"]);
}

#[test]
fn registration_leaves_prior_revisions_untouched() {
    let log = CallLog::default();
    let builder = FakeBuilder { log: log.clone() };
    let registry = FakeRegistry {
        log: log.clone(),
        authorized: true,
    };
    let orchestration = FakeOrchestrator::new(log)
        .with_family("web", vec![taskdef("web", 3, "old:1")]);

    deploy(
        &builder,
        &registry,
        &orchestration,
        &App::new("app"),
        &ctx(),
        &target(),
    )
    .expect("deploy succeeds");

    assert_eq!(orchestration.stored_image("web", 3).as_deref(), Some("old:1"));
}

#[test]
fn failed_service_update_keeps_the_new_revision() {
    let log = CallLog::default();
    let builder = FakeBuilder { log: log.clone() };
    let registry = FakeRegistry {
        log: log.clone(),
        authorized: true,
    };
    let mut orchestration = FakeOrchestrator::new(log)
        .with_family("web", vec![taskdef("web", 3, "old:1")]);
    orchestration.fail_update = true;

    let err = deploy(
        &builder,
        &registry,
        &orchestration,
        &App::new("app"),
        &ctx(),
        &target(),
    )
    .unwrap_err();

    assert!(matches!(err, DeployError::ServiceUpdateFailed { .. }));
    // Highest-severity partial failure: the new revision is
    // registered, the old one is inactive, the binding is stale.
    assert_eq!(
        orchestration.stored_image("web", 4).as_deref(),
        Some(PUSHED)
    );
    assert_eq!(*orchestration.deregistered.borrow(), vec!["web:3"]);
    assert!(orchestration.bindings.borrow().is_empty());
}
