#![allow(dead_code)]

use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;

use taskbind::model::{
    Arn, Cluster, ClusterRef, Compatibility, NetworkMode, Role, SecurityGroup, Subnet,
    SubnetSelection, SubnetType, TaskDefinition, TaskDefinitionRef, Vpc,
};
use taskbind::target::{ContainerOverride, EcsTaskProps, SecurityGroupInput};

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "us-east-1";

pub fn arn(raw: &str) -> Arn {
    Arn::from_str(raw).expect("valid test ARN")
}

pub fn role_arn(name: &str) -> Arn {
    arn(&format!("arn:aws:iam::{ACCOUNT}:role/{name}"))
}

pub fn cluster_arn(name: &str) -> Arn {
    arn(&format!("arn:aws:ecs:{REGION}:{ACCOUNT}:cluster/{name}"))
}

pub fn task_definition_arn(family: &str) -> Arn {
    arn(&format!("arn:aws:ecs:{REGION}:{ACCOUNT}:task-definition/{family}:1"))
}

/// Builder for a `Cluster` whose VPC has two private, two public and one
/// isolated subnet unless told otherwise.
pub struct ClusterBuilder {
    name: String,
    vpc_id: String,
    subnets: Vec<Subnet>,
}

impl ClusterBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vpc_id: "vpc-0test".to_string(),
            subnets: vec![
                Subnet::new("subnet-private-a", SubnetType::Private).in_group("Private"),
                Subnet::new("subnet-private-b", SubnetType::Private).in_group("Private"),
                Subnet::new("subnet-public-a", SubnetType::Public).in_group("Public"),
                Subnet::new("subnet-public-b", SubnetType::Public).in_group("Public"),
                Subnet::new("subnet-isolated-a", SubnetType::Isolated).in_group("Data"),
            ],
        }
    }

    pub fn vpc_id(mut self, id: &str) -> Self {
        self.vpc_id = id.to_string();
        self
    }

    pub fn subnets(mut self, subnets: Vec<Subnet>) -> Self {
        self.subnets = subnets;
        self
    }

    pub fn build(self) -> Arc<Cluster> {
        Arc::new(Cluster::new(
            cluster_arn(&self.name),
            Vpc::new(self.vpc_id, self.subnets),
        ))
    }
}

/// Builder for `TaskDefinition`. Defaults to an EC2-only, awsvpc task
/// definition without an execution role.
pub struct TaskDefinitionBuilder {
    family: String,
    network_mode: NetworkMode,
    compatibility: Compatibility,
    execution_role: Option<String>,
}

impl TaskDefinitionBuilder {
    pub fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            network_mode: NetworkMode::AwsVpc,
            compatibility: Compatibility::Ec2,
            execution_role: None,
        }
    }

    pub fn network_mode(mut self, mode: NetworkMode) -> Self {
        self.network_mode = mode;
        self
    }

    pub fn compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn execution_role(mut self, name: &str) -> Self {
        self.execution_role = Some(name.to_string());
        self
    }

    pub fn task_role_arn(&self) -> Arn {
        role_arn(&format!("{}-task-role", self.family))
    }

    pub fn build(self) -> Arc<TaskDefinition> {
        let mut td = TaskDefinition::new(
            task_definition_arn(&self.family),
            self.compatibility,
            Role::new(self.task_role_arn()),
        )
        .with_network_mode(self.network_mode);

        if let Some(ref name) = self.execution_role {
            td = td.with_execution_role(Role::new(role_arn(name)));
        }

        Arc::new(td)
    }
}

/// Builder for `EcsTaskProps`.
pub struct EcsTaskPropsBuilder {
    props: EcsTaskProps,
}

impl EcsTaskPropsBuilder {
    pub fn new(cluster: Arc<dyn ClusterRef>, task_definition: Arc<dyn TaskDefinitionRef>) -> Self {
        Self {
            props: EcsTaskProps::new(cluster, task_definition),
        }
    }

    pub fn task_count(mut self, count: u32) -> Self {
        self.props.task_count = NonZeroU32::new(count).expect("task count >= 1");
        self
    }

    pub fn container_override(mut self, ov: ContainerOverride) -> Self {
        self.props.container_overrides.push(ov);
        self
    }

    pub fn subnet_selection(mut self, selection: SubnetSelection) -> Self {
        self.props.subnet_selection = Some(selection);
        self
    }

    pub fn security_group(mut self, id: &str) -> Self {
        self.props.security_groups = SecurityGroupInput::Legacy(SecurityGroup::new(id));
        self
    }

    pub fn security_groups(mut self, ids: &[&str]) -> Self {
        self.props.security_groups =
            SecurityGroupInput::Explicit(ids.iter().map(|id| SecurityGroup::new(*id)).collect());
        self
    }

    pub fn role(mut self, name: &str) -> Self {
        self.props.role = Some(Role::new(role_arn(name)));
        self
    }

    pub fn platform_version(mut self, version: &str) -> Self {
        self.props.platform_version = Some(version.to_string());
        self
    }

    pub fn build(self) -> EcsTaskProps {
        self.props
    }
}
