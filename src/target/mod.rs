// src/target/mod.rs

//! Task targets: turn a task specification into a rule target.
//!
//! - [`scope`] holds state shared between targets (generated security
//!   groups, warnings).
//! - [`security_groups`] resolves the groups for task ENIs at construction.
//! - [`permissions`] derives the IAM statements for the invoking role.
//! - [`parameters`] contains the launch parameters and input payload types.

pub mod parameters;
pub mod permissions;
pub mod scope;
pub mod security_groups;

use std::num::NonZeroU32;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::model::{Arn, ClusterRef, Role, SecurityGroup, SubnetSelection, TaskDefinitionRef};

pub use parameters::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, EcsParameters, LaunchType,
    NetworkConfiguration, PAYLOAD_NAME_KEY, RuleTargetConfig, TaskInput, assign_public_ip,
    launch_type,
};
pub use permissions::build_permission_set;
pub use scope::{Scope, Warning};
pub use security_groups::{ResolvedSecurityGroups, SecurityGroupInput, resolve_security_groups};

/// Input for [`EcsTaskTarget::new`].
#[derive(Debug, Clone)]
pub struct EcsTaskProps {
    pub cluster: Arc<dyn ClusterRef>,
    pub task_definition: Arc<dyn TaskDefinitionRef>,
    pub task_count: NonZeroU32,
    pub container_overrides: Vec<ContainerOverride>,
    /// Defaults to private subnets.
    pub subnet_selection: Option<SubnetSelection>,
    pub security_groups: SecurityGroupInput,
    /// Role assumed by the rule; defaults to a per-task-definition events role.
    pub role: Option<Role>,
    /// Fargate platform version; only used when launching on Fargate.
    pub platform_version: Option<String>,
}

impl EcsTaskProps {
    pub fn new(cluster: Arc<dyn ClusterRef>, task_definition: Arc<dyn TaskDefinitionRef>) -> Self {
        Self {
            cluster,
            task_definition,
            task_count: NonZeroU32::MIN,
            container_overrides: Vec::new(),
            subnet_selection: None,
            security_groups: SecurityGroupInput::None,
            role: None,
            platform_version: None,
        }
    }
}

/// A task definition run on a cluster as the target of an event rule.
///
/// Security groups are resolved once, in [`EcsTaskTarget::new`]. Each call
/// to [`EcsTaskTarget::bind`] recomputes permissions and parameters from
/// that state and has no side effects.
#[derive(Debug, Clone)]
pub struct EcsTaskTarget {
    cluster: Arc<dyn ClusterRef>,
    task_definition: Arc<dyn TaskDefinitionRef>,
    task_count: NonZeroU32,
    container_overrides: Vec<ContainerOverride>,
    subnet_selection: SubnetSelection,
    security_groups: ResolvedSecurityGroups,
    role: Role,
    platform_version: Option<String>,
}

impl EcsTaskTarget {
    pub fn new(props: EcsTaskProps, scope: &mut Scope) -> Self {
        let security_groups = resolve_security_groups(
            props.cluster.as_ref(),
            props.task_definition.as_ref(),
            props.security_groups,
            scope,
        );

        let role = match props.role {
            Some(role) => role,
            None => events_role_for(props.task_definition.arn()),
        };

        debug!(
            task_definition = %props.task_definition.arn(),
            cluster = %props.cluster.arn(),
            role = %role.arn,
            ?security_groups,
            "constructed task target"
        );

        Self {
            cluster: props.cluster,
            task_definition: props.task_definition,
            task_count: props.task_count,
            container_overrides: props.container_overrides,
            subnet_selection: props.subnet_selection.unwrap_or_else(SubnetSelection::private),
            security_groups,
            role,
            platform_version: props.platform_version,
        }
    }

    /// Resolved security groups; `None` when the network mode has no ENIs.
    pub fn security_groups(&self) -> Option<&[SecurityGroup]> {
        self.security_groups.security_groups()
    }

    /// Single security group kept for backward compatibility.
    pub fn security_group(&self) -> Option<&SecurityGroup> {
        self.security_groups.legacy()
    }

    pub fn resolved_security_groups(&self) -> &ResolvedSecurityGroups {
        &self.security_groups
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn subnet_selection(&self) -> &SubnetSelection {
        &self.subnet_selection
    }

    pub fn bind(&self) -> Result<RuleTargetConfig> {
        let task_definition = self.task_definition.as_ref();
        let role_policy = build_permission_set(self.cluster.arn(), task_definition);

        let mut ecs_parameters = EcsParameters {
            task_count: self.task_count.get(),
            task_definition_arn: task_definition.arn().clone(),
            launch_type: None,
            platform_version: None,
            network_configuration: None,
        };

        if task_definition.network_mode().uses_eni() {
            let launch = launch_type(task_definition.compatibility());
            let subnets = self
                .cluster
                .network()
                .select_subnets(&self.subnet_selection)?;

            let security_groups = self
                .security_groups
                .security_groups()
                .filter(|groups| !groups.is_empty())
                .map(|groups| groups.iter().map(|sg| sg.id.clone()).collect());

            ecs_parameters.launch_type = Some(launch);
            ecs_parameters.platform_version = self.platform_version_for(launch);
            ecs_parameters.network_configuration = Some(NetworkConfiguration {
                aws_vpc_configuration: AwsVpcConfiguration {
                    subnets,
                    assign_public_ip: assign_public_ip(&self.subnet_selection),
                    security_groups,
                },
            });
        }

        info!(
            task_definition = %task_definition.arn(),
            task_count = ecs_parameters.task_count,
            launch_type = ?ecs_parameters.launch_type,
            statements = role_policy.len(),
            "bound task target"
        );

        Ok(RuleTargetConfig {
            id: String::new(),
            arn: self.cluster.arn().clone(),
            role: self.role.clone(),
            role_policy,
            input: TaskInput::from_overrides(&self.container_overrides),
            ecs_parameters,
        })
    }

    fn platform_version_for(&self, launch: LaunchType) -> Option<String> {
        match (launch, &self.platform_version) {
            (LaunchType::Fargate, version) => version.clone(),
            (LaunchType::Ec2, Some(version)) => {
                warn!(
                    task_definition = %self.task_definition.arn(),
                    platform_version = %version,
                    "platform version only applies to Fargate launches; omitting"
                );
                None
            }
            (LaunchType::Ec2, None) => None,
        }
    }
}

/// Role assumed by the rule when no role is given: one per task
/// definition, in the task definition's partition and account.
pub fn events_role_for(task_definition: &Arn) -> Role {
    let digest = blake3::hash(task_definition.as_str().as_bytes()).to_hex();
    Role::new(Arn::new(
        task_definition.partition(),
        "iam",
        "",
        task_definition.account(),
        format!("role/taskbind-events-{}", &digest.as_str()[..16]),
    ))
}
