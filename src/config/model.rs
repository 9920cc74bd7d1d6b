// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::{Compatibility, NetworkMode, Subnet, SubnetSelection};
use crate::target::ContainerOverride;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [cluster.main]
/// arn = "arn:aws:ecs:us-east-1:123456789012:cluster/main"
/// vpc_id = "vpc-0abc"
/// subnets = [
///   { id = "subnet-a", type = "private" },
///   { id = "subnet-b", type = "public" },
/// ]
///
/// [task_definition.web]
/// arn = "arn:aws:ecs:us-east-1:123456789012:task-definition/web:3"
/// compatibility = "fargate"
/// task_role_arn = "arn:aws:iam::123456789012:role/web-task"
///
/// [target.nightly]
/// cluster = "main"
/// task_definition = "web"
/// ```
///
/// Clusters, task definitions and targets are keyed by a local name that
/// targets use to refer to the other two.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub cluster: BTreeMap<String, ClusterConfig>,

    #[serde(default)]
    pub task_definition: BTreeMap<String, TaskDefinitionConfig>,

    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// `[cluster.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    pub arn: String,

    pub vpc_id: String,

    /// Subnets of the cluster VPC, in the order they should be used.
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

/// `[task_definition.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDefinitionConfig {
    pub arn: String,

    /// If `None`, `awsvpc` for Fargate-compatible definitions and `bridge`
    /// otherwise.
    #[serde(default)]
    pub network_mode: Option<NetworkMode>,

    #[serde(default)]
    pub compatibility: Compatibility,

    pub task_role_arn: String,

    #[serde(default)]
    pub execution_role_arn: Option<String>,
}

impl TaskDefinitionConfig {
    pub fn effective_network_mode(&self) -> NetworkMode {
        self.network_mode
            .unwrap_or_else(|| NetworkMode::default_for(self.compatibility))
    }
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Name of a `[cluster.<name>]` section.
    pub cluster: String,

    /// Name of a `[task_definition.<name>]` section.
    pub task_definition: String,

    #[serde(default = "default_task_count")]
    pub task_count: u32,

    #[serde(default)]
    pub container_overrides: Vec<ContainerOverride>,

    /// If `None`, private subnets are used.
    #[serde(default)]
    pub subnet_selection: Option<SubnetSelection>,

    /// Single security group id. Mutually exclusive with `security_groups`.
    #[serde(default)]
    pub security_group: Option<String>,

    #[serde(default)]
    pub security_groups: Option<Vec<String>>,

    #[serde(default)]
    pub role_arn: Option<String>,

    #[serde(default)]
    pub platform_version: Option<String>,
}

fn default_task_count() -> u32 {
    1
}
