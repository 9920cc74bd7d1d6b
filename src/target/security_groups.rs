// src/target/security_groups.rs

//! Security-group resolution for task network interfaces.
//!
//! Runs once, when a target is constructed:
//!
//! 1. Network mode without per-task ENIs: any supplied groups are ignored
//!    (with a warning on the task definition) and the result is
//!    [`ResolvedSecurityGroups::NotApplicable`].
//! 2. An explicit list is used verbatim.
//! 3. Otherwise the group generated earlier for the same task definition is
//!    reused, else the legacy single group, else a new group is generated
//!    in the cluster VPC. The single group is exposed both as the list and
//!    as the legacy field.

use tracing::debug;

use crate::errors::{Result, TaskbindError};
use crate::model::{Arn, ClusterRef, SecurityGroup, TaskDefinitionRef};
use crate::target::scope::Scope;

pub const IGNORED_SECURITY_GROUPS_WARNING: &str =
    "security groups are ignored when network mode is not awsvpc";

/// Security groups requested for a target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SecurityGroupInput {
    #[default]
    None,
    /// Single group, kept for backward compatibility.
    Legacy(SecurityGroup),
    /// Full list of groups, used as-is.
    Explicit(Vec<SecurityGroup>),
}

impl SecurityGroupInput {
    /// Build the input from the two separately-settable fields, rejecting
    /// the case where both are populated.
    pub fn from_fields(
        security_group: Option<SecurityGroup>,
        security_groups: Option<Vec<SecurityGroup>>,
    ) -> Result<Self> {
        match (security_group, security_groups) {
            (Some(_), Some(_)) => Err(TaskbindError::ConflictingSecurityGroups),
            (Some(sg), None) => Ok(SecurityGroupInput::Legacy(sg)),
            (None, Some(list)) => Ok(SecurityGroupInput::Explicit(list)),
            (None, None) => Ok(SecurityGroupInput::None),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SecurityGroupInput::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSecurityGroups {
    /// The task's network mode has no per-task interface.
    NotApplicable,
    Resolved {
        security_groups: Vec<SecurityGroup>,
        /// Set whenever the list holds a single reused, legacy or
        /// generated group; always equal to that element.
        legacy: Option<SecurityGroup>,
    },
}

impl ResolvedSecurityGroups {
    fn single(sg: SecurityGroup) -> Self {
        ResolvedSecurityGroups::Resolved {
            security_groups: vec![sg.clone()],
            legacy: Some(sg),
        }
    }

    pub fn security_groups(&self) -> Option<&[SecurityGroup]> {
        match self {
            ResolvedSecurityGroups::NotApplicable => None,
            ResolvedSecurityGroups::Resolved {
                security_groups, ..
            } => Some(security_groups),
        }
    }

    pub fn legacy(&self) -> Option<&SecurityGroup> {
        match self {
            ResolvedSecurityGroups::NotApplicable => None,
            ResolvedSecurityGroups::Resolved { legacy, .. } => legacy.as_ref(),
        }
    }
}

pub fn resolve_security_groups(
    cluster: &dyn ClusterRef,
    task_definition: &dyn TaskDefinitionRef,
    input: SecurityGroupInput,
    scope: &mut Scope,
) -> ResolvedSecurityGroups {
    let td_arn = task_definition.arn();

    if !task_definition.network_mode().uses_eni() {
        if !input.is_none() {
            scope.add_warning(td_arn, IGNORED_SECURITY_GROUPS_WARNING);
        }
        return ResolvedSecurityGroups::NotApplicable;
    }

    let legacy = match input {
        SecurityGroupInput::Explicit(list) => {
            debug!(task_definition = %td_arn, count = list.len(), "using explicit security groups");
            return ResolvedSecurityGroups::Resolved {
                security_groups: list,
                legacy: None,
            };
        }
        SecurityGroupInput::Legacy(sg) => Some(sg),
        SecurityGroupInput::None => None,
    };

    if let Some(existing) = scope.find_security_group(td_arn) {
        debug!(task_definition = %td_arn, security_group = %existing, "reusing generated security group");
        return ResolvedSecurityGroups::single(existing.clone());
    }

    if let Some(sg) = legacy {
        debug!(task_definition = %td_arn, security_group = %sg, "using legacy security group");
        return ResolvedSecurityGroups::single(sg);
    }

    let vpc_id = cluster.network().vpc_id().to_string();
    let sg = scope.acquire_security_group(td_arn, || generated_security_group(td_arn, &vpc_id));
    ResolvedSecurityGroups::single(sg)
}

/// Stable id for the group generated on behalf of a task definition.
///
/// Derived from the task definition ARN and VPC so repeated runs produce
/// the same output.
pub fn generated_security_group(task_definition: &Arn, vpc_id: &str) -> SecurityGroup {
    let mut hasher = blake3::Hasher::new();
    hasher.update(task_definition.as_str().as_bytes());
    hasher.update(b"/SecurityGroup/");
    hasher.update(vpc_id.as_bytes());
    let hex = hasher.finalize().to_hex();
    SecurityGroup::new(format!("sg-{}", &hex.as_str()[..17]))
}
