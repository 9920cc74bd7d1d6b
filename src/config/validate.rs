// src/config/validate.rs

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use crate::config::model::{ConfigFile, TargetConfig};
use crate::errors::Result as TaskbindResult;
use crate::model::{Arn, SecurityGroup};
use crate::target::{PAYLOAD_NAME_KEY, SecurityGroupInput};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one target
/// - every ARN field parses
/// - targets refer to existing clusters and task definitions
/// - `task_count >= 1`
/// - at most one of `security_group` / `security_groups` per target
/// - container overrides name their container and do not set `name`
///
/// It does **not** check that a subnet selection matches any subnet; that
/// surfaces when the target is bound.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_arns(cfg)?;
    validate_target_references(cfg)?;
    validate_targets(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &ConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(anyhow!(
            "config must contain at least one [target.<name>] section"
        ));
    }
    Ok(())
}

fn check_arn(field: &str, value: &str) -> Result<()> {
    Arn::from_str(value).with_context(|| format!("invalid {field}"))?;
    Ok(())
}

fn validate_arns(cfg: &ConfigFile) -> Result<()> {
    for (name, cluster) in cfg.cluster.iter() {
        check_arn(&format!("[cluster.{name}].arn"), &cluster.arn)?;
    }

    for (name, td) in cfg.task_definition.iter() {
        check_arn(&format!("[task_definition.{name}].arn"), &td.arn)?;
        check_arn(
            &format!("[task_definition.{name}].task_role_arn"),
            &td.task_role_arn,
        )?;
        if let Some(ref arn) = td.execution_role_arn {
            check_arn(&format!("[task_definition.{name}].execution_role_arn"), arn)?;
        }
    }

    for (name, target) in cfg.target.iter() {
        if let Some(ref arn) = target.role_arn {
            check_arn(&format!("[target.{name}].role_arn"), arn)?;
        }
    }

    Ok(())
}

fn validate_target_references(cfg: &ConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        if !cfg.cluster.contains_key(&target.cluster) {
            return Err(anyhow!(
                "target '{}' refers to unknown cluster '{}'",
                name,
                target.cluster
            ));
        }
        if !cfg.task_definition.contains_key(&target.task_definition) {
            return Err(anyhow!(
                "target '{}' refers to unknown task definition '{}'",
                name,
                target.task_definition
            ));
        }
    }
    Ok(())
}

fn validate_targets(cfg: &ConfigFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        if target.task_count == 0 {
            return Err(anyhow!(
                "[target.{}].task_count must be >= 1 (got 0)",
                name
            ));
        }

        security_group_input(target).with_context(|| format!("target '{name}'"))?;

        for (idx, ov) in target.container_overrides.iter().enumerate() {
            if ov.container_name.trim().is_empty() {
                return Err(anyhow!(
                    "target '{}': container override #{} has an empty containerName",
                    name,
                    idx
                ));
            }
            if ov.shadows_container_name() {
                return Err(anyhow!(
                    "target '{}': container override #{} sets '{}', which is reserved for containerName",
                    name,
                    idx,
                    PAYLOAD_NAME_KEY
                ));
            }
        }
    }
    Ok(())
}

/// Combine the two security-group fields of a target into one input.
pub fn security_group_input(target: &TargetConfig) -> TaskbindResult<SecurityGroupInput> {
    SecurityGroupInput::from_fields(
        target.security_group.clone().map(SecurityGroup::new),
        target
            .security_groups
            .as_ref()
            .map(|ids| ids.iter().cloned().map(SecurityGroup::new).collect()),
    )
}
