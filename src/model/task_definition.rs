// src/model/task_definition.rs

use serde::{Deserialize, Serialize};

use crate::model::{Arn, TaskDefinitionRef};

/// Docker networking mode of a task definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    /// Each task gets its own elastic network interface.
    #[serde(rename = "awsvpc")]
    AwsVpc,
    Bridge,
    Host,
    Nat,
    None,
}

impl NetworkMode {
    /// Whether tasks in this mode get a dedicated ENI (and therefore
    /// subnets, security groups and a public-IP decision).
    pub fn uses_eni(self) -> bool {
        match self {
            NetworkMode::AwsVpc => true,
            NetworkMode::Bridge | NetworkMode::Host | NetworkMode::Nat | NetworkMode::None => false,
        }
    }

    /// Mode a task definition gets when none is declared.
    pub fn default_for(compatibility: Compatibility) -> Self {
        if compatibility.is_fargate_compatible() {
            NetworkMode::AwsVpc
        } else {
            NetworkMode::Bridge
        }
    }
}

/// Launch types a task definition declares itself compatible with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    #[default]
    Ec2,
    Fargate,
    Ec2AndFargate,
}

impl Compatibility {
    pub fn is_ec2_compatible(self) -> bool {
        matches!(self, Compatibility::Ec2 | Compatibility::Ec2AndFargate)
    }

    pub fn is_fargate_compatible(self) -> bool {
        matches!(self, Compatibility::Fargate | Compatibility::Ec2AndFargate)
    }
}

/// An IAM role, referenced by ARN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Role {
    pub arn: Arn,
}

impl Role {
    pub fn new(arn: Arn) -> Self {
        Self { arn }
    }
}

#[derive(Debug, Clone)]
pub struct TaskDefinition {
    pub arn: Arn,
    pub network_mode: NetworkMode,
    pub compatibility: Compatibility,
    pub execution_role: Option<Role>,
    pub task_role: Role,
}

impl TaskDefinition {
    /// Task definition with the network mode implied by `compatibility`
    /// and no execution role.
    pub fn new(arn: Arn, compatibility: Compatibility, task_role: Role) -> Self {
        Self {
            arn,
            network_mode: NetworkMode::default_for(compatibility),
            compatibility,
            execution_role: None,
            task_role,
        }
    }

    pub fn with_network_mode(mut self, network_mode: NetworkMode) -> Self {
        self.network_mode = network_mode;
        self
    }

    pub fn with_execution_role(mut self, role: Role) -> Self {
        self.execution_role = Some(role);
        self
    }
}

impl TaskDefinitionRef for TaskDefinition {
    fn arn(&self) -> &Arn {
        &self.arn
    }

    fn network_mode(&self) -> NetworkMode {
        self.network_mode
    }

    fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    fn execution_role(&self) -> Option<&Role> {
        self.execution_role.as_ref()
    }

    fn task_role(&self) -> &Role {
        &self.task_role
    }
}
