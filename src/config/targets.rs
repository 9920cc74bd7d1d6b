// src/config/targets.rs

//! Turn a validated `ConfigFile` into model values and target props.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::config::model::{ClusterConfig, ConfigFile, TargetConfig, TaskDefinitionConfig};
use crate::config::validate::security_group_input;
use crate::model::{Arn, Cluster, ClusterRef, Role, TaskDefinition, TaskDefinitionRef, Vpc};
use crate::target::EcsTaskProps;

/// Build clusters and task definitions once, then the props of every
/// target, sharing the model values between targets that refer to them.
///
/// Targets are returned in name order.
pub fn target_props(cfg: &ConfigFile) -> Result<BTreeMap<String, EcsTaskProps>> {
    let mut clusters: BTreeMap<&str, Arc<dyn ClusterRef>> = BTreeMap::new();
    for (name, cluster) in cfg.cluster.iter() {
        let built = build_cluster(cluster).with_context(|| format!("building cluster '{name}'"))?;
        clusters.insert(name.as_str(), Arc::new(built));
    }

    let mut task_definitions: BTreeMap<&str, Arc<dyn TaskDefinitionRef>> = BTreeMap::new();
    for (name, td) in cfg.task_definition.iter() {
        let built = build_task_definition(td)
            .with_context(|| format!("building task definition '{name}'"))?;
        task_definitions.insert(name.as_str(), Arc::new(built));
    }

    let mut props = BTreeMap::new();
    for (name, target) in cfg.target.iter() {
        let cluster = clusters
            .get(target.cluster.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("target '{}' refers to unknown cluster '{}'", name, target.cluster))?;
        let task_definition = task_definitions
            .get(target.task_definition.as_str())
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "target '{}' refers to unknown task definition '{}'",
                    name,
                    target.task_definition
                )
            })?;

        let built = build_props(target, cluster, task_definition)
            .with_context(|| format!("building target '{name}'"))?;
        debug!(target = %name, "built target props from config");
        props.insert(name.clone(), built);
    }

    Ok(props)
}

fn build_cluster(cfg: &ClusterConfig) -> Result<Cluster> {
    let arn = Arn::from_str(&cfg.arn)?;
    Ok(Cluster::new(arn, Vpc::new(cfg.vpc_id.clone(), cfg.subnets.clone())))
}

fn build_task_definition(cfg: &TaskDefinitionConfig) -> Result<TaskDefinition> {
    let arn = Arn::from_str(&cfg.arn)?;
    let task_role = Role::new(Arn::from_str(&cfg.task_role_arn)?);

    let mut td = TaskDefinition::new(arn, cfg.compatibility, task_role)
        .with_network_mode(cfg.effective_network_mode());

    if let Some(ref exec) = cfg.execution_role_arn {
        td = td.with_execution_role(Role::new(Arn::from_str(exec)?));
    }

    Ok(td)
}

fn build_props(
    cfg: &TargetConfig,
    cluster: Arc<dyn ClusterRef>,
    task_definition: Arc<dyn TaskDefinitionRef>,
) -> Result<EcsTaskProps> {
    let task_count = NonZeroU32::new(cfg.task_count)
        .ok_or_else(|| anyhow!("task_count must be >= 1 (got 0)"))?;

    let role = cfg
        .role_arn
        .as_deref()
        .map(Arn::from_str)
        .transpose()?
        .map(Role::new);

    let mut props = EcsTaskProps::new(cluster, task_definition);
    props.task_count = task_count;
    props.container_overrides = cfg.container_overrides.clone();
    props.subnet_selection = cfg.subnet_selection.clone();
    props.security_groups = security_group_input(cfg)?;
    props.role = role;
    props.platform_version = cfg.platform_version.clone();
    Ok(props)
}
