// src/target/parameters.rs

//! Launch parameters and input payload produced when a target is bound.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::model::{Arn, Compatibility, PermissionSet, Role, SubnetSelection, SubnetType};

/// Key under which the container name travels in the task input payload.
pub const PAYLOAD_NAME_KEY: &str = "name";

/// Per-container overrides passed through to the task at launch.
///
/// Apart from `containerName`, fields are opaque and forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContainerOverride {
    #[serde(rename = "containerName", alias = "container_name")]
    pub container_name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContainerOverride {
    pub fn new(container_name: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_command<I, S>(self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command: Vec<Value> = command.into_iter().map(|s| Value::String(s.into())).collect();
        self.with_field("command", Value::Array(command))
    }

    /// True when an opaque field would collide with the payload name key.
    pub fn shadows_container_name(&self) -> bool {
        self.fields.contains_key(PAYLOAD_NAME_KEY)
    }

    /// Payload form: `containerName` becomes `name`, everything else is
    /// copied as-is. A field named `name` never replaces the container name.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut entry = Map::with_capacity(self.fields.len() + 1);
        entry.insert(
            PAYLOAD_NAME_KEY.to_string(),
            Value::String(self.container_name.clone()),
        );
        for (key, value) in &self.fields {
            if key == PAYLOAD_NAME_KEY {
                warn!(
                    container = %self.container_name,
                    "dropping override field that would replace the container name"
                );
                continue;
            }
            entry.insert(key.clone(), value.clone());
        }
        entry
    }
}

/// Input delivered to the task when the rule fires.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_overrides: Option<Vec<Map<String, Value>>>,
}

impl TaskInput {
    /// An empty override list yields no `containerOverrides` field at all.
    pub fn from_overrides(overrides: &[ContainerOverride]) -> Self {
        if overrides.is_empty() {
            return Self::default();
        }
        Self {
            container_overrides: Some(overrides.iter().map(ContainerOverride::to_payload).collect()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LaunchType {
    Ec2,
    Fargate,
}

/// EC2 wins when a task definition supports both launch types.
pub fn launch_type(compatibility: Compatibility) -> LaunchType {
    match compatibility {
        Compatibility::Ec2 | Compatibility::Ec2AndFargate => LaunchType::Ec2,
        Compatibility::Fargate => LaunchType::Fargate,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssignPublicIp {
    Enabled,
    Disabled,
}

/// Public IPs are assigned exactly when tasks land in public subnets.
pub fn assign_public_ip(selection: &SubnetSelection) -> AssignPublicIp {
    match selection.subnet_type {
        Some(SubnetType::Public) => AssignPublicIp::Enabled,
        Some(SubnetType::Private) | Some(SubnetType::Isolated) | None => AssignPublicIp::Disabled,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AwsVpcConfiguration {
    pub subnets: Vec<String>,
    pub assign_public_ip: AssignPublicIp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_groups: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkConfiguration {
    pub aws_vpc_configuration: AwsVpcConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EcsParameters {
    pub task_count: u32,
    pub task_definition_arn: Arn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<LaunchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_configuration: Option<NetworkConfiguration>,
}

/// Everything an event rule needs to invoke the task.
///
/// `id` is left empty; the rule assigns it when attaching the target.
/// `role_policy` is what must be granted to `role` and is not part of the
/// serialized target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleTargetConfig {
    pub id: String,
    pub arn: Arn,
    #[serde(rename = "RoleArn")]
    pub role: Role,
    #[serde(skip)]
    pub role_policy: PermissionSet,
    pub input: TaskInput,
    pub ecs_parameters: EcsParameters,
}
