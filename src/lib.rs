// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod model;
pub mod target;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::config::target_props;
use crate::model::PolicyDocument;
use crate::target::{EcsTaskTarget, RuleTargetConfig, Scope, Warning};

/// One bound target, as printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct BoundTarget {
    pub name: String,
    pub target: RuleTargetConfig,
    pub policy: PolicyDocument,
}

/// Output of binding every target of a config file.
#[derive(Debug, Clone, Serialize)]
pub struct BindReport {
    pub targets: Vec<BoundTarget>,
    pub warnings: Vec<Warning>,
}

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the config, then either prints a dry-run summary or
/// binds the targets and prints the report as JSON on stdout.
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let report = bind_all(&cfg, args.target.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Construct every target (or only `only`) in a single scope and bind it.
///
/// Targets are constructed in name order, so when several share a task
/// definition the generated security group is created by the first one and
/// reused by the rest.
pub fn bind_all(cfg: &ConfigFile, only: Option<&str>) -> Result<BindReport> {
    if let Some(name) = only {
        if !cfg.target.contains_key(name) {
            return Err(anyhow!("unknown target '{}'", name));
        }
    }

    let mut scope = Scope::new();
    let mut targets = Vec::new();

    for (name, props) in target_props(cfg)? {
        if only.is_some_and(|wanted| wanted != name) {
            continue;
        }

        let target = EcsTaskTarget::new(props, &mut scope);
        let config = target.bind()?;
        let policy = config.role_policy.to_policy_document();
        targets.push(BoundTarget {
            name,
            target: config,
            policy,
        });
    }

    info!(
        targets = targets.len(),
        warnings = scope.warnings().len(),
        generated_security_groups = scope.generated_security_groups(),
        "bound targets"
    );

    Ok(BindReport {
        targets,
        warnings: scope.warnings().to_vec(),
    })
}

/// Simple dry-run output: print clusters, task definitions and targets.
fn print_dry_run(cfg: &ConfigFile) {
    println!("taskbind dry-run");
    println!();

    println!("clusters ({}):", cfg.cluster.len());
    for (name, cluster) in cfg.cluster.iter() {
        println!("  - {name}");
        println!("      arn: {}", cluster.arn);
        println!("      vpc: {} ({} subnets)", cluster.vpc_id, cluster.subnets.len());
    }

    println!("task definitions ({}):", cfg.task_definition.len());
    for (name, td) in cfg.task_definition.iter() {
        println!("  - {name}");
        println!("      arn: {}", td.arn);
        println!("      network_mode: {:?}", td.effective_network_mode());
        println!("      compatibility: {:?}", td.compatibility);
        if let Some(ref exec) = td.execution_role_arn {
            println!("      execution_role: {exec}");
        }
    }

    println!("targets ({}):", cfg.target.len());
    for (name, target) in cfg.target.iter() {
        println!("  - {name}");
        println!("      cluster: {}", target.cluster);
        println!("      task_definition: {}", target.task_definition);
        println!("      task_count: {}", target.task_count);
        if let Some(ref sel) = target.subnet_selection {
            println!("      subnet_selection: {sel}");
        }
        if let Some(ref sg) = target.security_group {
            println!("      security_group: {sg}");
        }
        if let Some(ref sgs) = target.security_groups {
            println!("      security_groups: {:?}", sgs);
        }
        if !target.container_overrides.is_empty() {
            println!(
                "      container_overrides: {}",
                target.container_overrides.len()
            );
        }
    }

    debug!("dry-run complete (no binding)");
}
