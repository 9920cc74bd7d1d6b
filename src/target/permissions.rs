// src/target/permissions.rs

use tracing::debug;

use crate::model::{Arn, PermissionSet, PolicyStatement, TaskDefinitionRef};

pub const RUN_TASK_ACTION: &str = "ecs:RunTask";
pub const PASS_ROLE_ACTION: &str = "iam:PassRole";

/// Statements the invoking role needs to run `task_definition` on the
/// cluster `cluster_arn`.
///
/// `ecs:RunTask` always comes first and is restricted to the cluster, so
/// the grant cannot be used against the same task definition elsewhere.
/// `iam:PassRole` is added for the execution role (if any) and, for
/// Fargate-compatible definitions, for the task role. Both may be present.
pub fn build_permission_set(cluster_arn: &Arn, task_definition: &dyn TaskDefinitionRef) -> PermissionSet {
    let mut permissions = PermissionSet::new();

    permissions.push(
        PolicyStatement::allow([RUN_TASK_ACTION], [task_definition.arn().to_string()])
            .with_condition("ArnEquals", "ecs:cluster", cluster_arn.to_string()),
    );

    if let Some(execution_role) = task_definition.execution_role() {
        permissions.push(PolicyStatement::allow(
            [PASS_ROLE_ACTION],
            [execution_role.arn.to_string()],
        ));
    }

    if task_definition.compatibility().is_fargate_compatible() {
        permissions.push(PolicyStatement::allow(
            [PASS_ROLE_ACTION],
            [task_definition.task_role().arn.to_string()],
        ));
    }

    debug!(
        task_definition = %task_definition.arn(),
        statements = permissions.len(),
        "built permission set"
    );
    permissions
}
