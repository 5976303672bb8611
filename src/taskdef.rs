use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// One container entry of a task definition.
///
/// Only `name` and `image` are interpreted here; every other
/// launch field (ports, env, log config, ...) rides along in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An immutable, versioned container-launch specification.
///
/// Identity is `(family, revision)`; the revision number is
/// assigned by the platform at registration and never reused.
/// Optional fields absent on the platform stay absent here, so a
/// re-registered clone carries exactly what the original carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub family: String,
    #[serde(default)]
    pub revision: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    pub container_definitions: Vec<ContainerSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_compatibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl TaskDefinition {
    /// Registration input for this descriptor: the fields the
    /// platform accepts, with identity fields (`revision`, ARN)
    /// left out so the platform assigns fresh ones. Absent
    /// optional fields are omitted, not defaulted.
    #[must_use]
    pub fn registration_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("family".into(), json!(self.family));
        payload.insert(
            "containerDefinitions".into(),
            json!(self.container_definitions),
        );
        payload.insert("volumes".into(), json!(self.volumes));
        payload.insert(
            "requiresCompatibilities".into(),
            json!(self.requires_compatibilities),
        );
        if let Some(arn) = &self.task_role_arn {
            payload.insert("taskRoleArn".into(), json!(arn));
        }
        if let Some(arn) = &self.execution_role_arn {
            payload.insert("executionRoleArn".into(), json!(arn));
        }
        if let Some(mode) = &self.network_mode {
            payload.insert("networkMode".into(), json!(mode));
        }
        if let Some(cpu) = &self.cpu {
            payload.insert("cpu".into(), json!(cpu));
        }
        if let Some(memory) = &self.memory {
            payload.insert("memory".into(), json!(memory));
        }
        Value::Object(payload)
    }
}

/// Clone `taskdef` with every container's image reference
/// replaced by `image`. Containers without an image field keep
/// not having one; nothing else changes.
#[must_use]
pub fn with_image(taskdef: &TaskDefinition, image: &str) -> TaskDefinition {
    let mut next = taskdef.clone();
    for container in &mut next.container_definitions {
        if container.image.is_some() {
            container.image = Some(image.to_string());
        }
    }
    next
}
