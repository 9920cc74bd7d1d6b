use std::error::Error;
use std::fs;

use serde_json::json;

use taskbind::bind_all;
use taskbind::config::{load_and_validate, load_from_str, target_props, validate_config};
use taskbind::model::{Compatibility, NetworkMode};
use taskbind::target::security_groups::IGNORED_SECURITY_GROUPS_WARNING;
use taskbind::target::{LaunchType, SecurityGroupInput};
use taskbind_test_utils::to_json;

type TestResult = Result<(), Box<dyn Error>>;

const BASE: &str = r#"
[cluster.main]
arn = "arn:aws:ecs:us-east-1:123456789012:cluster/main"
vpc_id = "vpc-0abc"
subnets = [
  { id = "subnet-a", type = "private", group = "Private" },
  { id = "subnet-b", type = "private", group = "Private" },
  { id = "subnet-c", type = "public", group = "Public" },
]

[task_definition.web]
arn = "arn:aws:ecs:us-east-1:123456789012:task-definition/web:3"
compatibility = "ec2_and_fargate"
task_role_arn = "arn:aws:iam::123456789012:role/web-task"
execution_role_arn = "arn:aws:iam::123456789012:role/web-exec"

[task_definition.legacy]
arn = "arn:aws:ecs:us-east-1:123456789012:task-definition/legacy:1"
task_role_arn = "arn:aws:iam::123456789012:role/legacy-task"
"#;

fn config_with(targets: &str) -> String {
    format!("{BASE}\n{targets}")
}

#[test]
fn loads_a_full_config_from_disk() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Taskbind.toml");
    fs::write(
        &path,
        config_with(
            r#"
[target.nightly]
cluster = "main"
task_definition = "web"
task_count = 2
subnet_selection = { type = "public" }
security_groups = ["sg-1", "sg-2"]
platform_version = "LATEST"
role_arn = "arn:aws:iam::123456789012:role/events"

[[target.nightly.container_overrides]]
containerName = "app"
command = ["run", "--nightly"]
environment = [{ name = "MODE", value = "batch" }]
"#,
        ),
    )?;

    let cfg = load_and_validate(&path)?;

    let td = &cfg.task_definition["web"];
    assert_eq!(td.compatibility, Compatibility::Ec2AndFargate);
    assert_eq!(td.effective_network_mode(), NetworkMode::AwsVpc);

    let target = &cfg.target["nightly"];
    assert_eq!(target.task_count, 2);
    assert_eq!(target.container_overrides.len(), 1);
    assert_eq!(target.container_overrides[0].container_name, "app");
    assert_eq!(
        target.container_overrides[0].fields.get("command"),
        Some(&json!(["run", "--nightly"]))
    );
    Ok(())
}

#[test]
fn missing_file_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = load_and_validate(&path).expect_err("file does not exist");
    assert!(format!("{err:#}").contains("missing.toml"));
}

#[test]
fn ec2_only_task_definition_defaults_to_bridge() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "legacy"
"#,
    ))?;

    let td = &cfg.task_definition["legacy"];
    assert_eq!(td.compatibility, Compatibility::Ec2);
    assert_eq!(td.effective_network_mode(), NetworkMode::Bridge);
    assert_eq!(cfg.target["t"].task_count, 1);
    Ok(())
}

#[test]
fn both_security_group_fields_fail_validation() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "web"
security_group = "sg-1"
security_groups = ["sg-2"]
"#,
    ))?;

    let err = validate_config(&cfg).expect_err("conflicting fields");
    let msg = format!("{err:#}");
    assert!(msg.contains("target 't'"), "{msg}");
    assert!(
        msg.contains("Only one of SecurityGroup or SecurityGroups can be populated"),
        "{msg}"
    );
    Ok(())
}

#[test]
fn zero_task_count_fails_validation() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "web"
task_count = 0
"#,
    ))?;

    let err = validate_config(&cfg).expect_err("task_count 0");
    assert!(err.to_string().contains("task_count must be >= 1"));
    Ok(())
}

#[test]
fn unknown_references_fail_validation() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "elsewhere"
task_definition = "web"
"#,
    ))?;
    let err = validate_config(&cfg).expect_err("unknown cluster");
    assert!(err.to_string().contains("unknown cluster 'elsewhere'"));

    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "nope"
"#,
    ))?;
    let err = validate_config(&cfg).expect_err("unknown task definition");
    assert!(err.to_string().contains("unknown task definition 'nope'"));
    Ok(())
}

#[test]
fn malformed_arn_fails_validation() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "web"
role_arn = "events-role"
"#,
    ))?;

    let err = validate_config(&cfg).expect_err("bad ARN");
    let msg = format!("{err:#}");
    assert!(msg.contains("[target.t].role_arn"), "{msg}");
    assert!(msg.contains("Invalid ARN: events-role"), "{msg}");
    Ok(())
}

#[test]
fn config_without_targets_is_rejected() -> TestResult {
    let cfg = load_from_str(BASE)?;
    let err = validate_config(&cfg).expect_err("no targets");
    assert!(err.to_string().contains("at least one [target.<name>]"));
    Ok(())
}

#[test]
fn empty_container_name_fails_validation() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "web"

[[target.t.container_overrides]]
containerName = " "
"#,
    ))?;

    let err = validate_config(&cfg).expect_err("empty container name");
    assert!(err.to_string().contains("empty containerName"));
    Ok(())
}

#[test]
fn target_props_map_fields_into_security_group_input() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.a]
cluster = "main"
task_definition = "web"
security_group = "sg-legacy"

[target.b]
cluster = "main"
task_definition = "web"
"#,
    ))?;
    validate_config(&cfg)?;

    let props = target_props(&cfg)?;
    assert!(matches!(props["a"].security_groups, SecurityGroupInput::Legacy(_)));
    assert!(props["b"].security_groups.is_none());
    assert_eq!(props["a"].task_count.get(), 1);
    Ok(())
}

#[test]
fn bind_all_shares_generated_group_between_targets() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.first]
cluster = "main"
task_definition = "web"

[target.second]
cluster = "main"
task_definition = "web"
task_count = 3
"#,
    ))?;
    validate_config(&cfg)?;

    let report = bind_all(&cfg, None)?;
    assert_eq!(report.targets.len(), 2);
    assert!(report.warnings.is_empty());

    let groups: Vec<_> = report
        .targets
        .iter()
        .map(|t| {
            t.target
                .ecs_parameters
                .network_configuration
                .as_ref()
                .and_then(|n| n.aws_vpc_configuration.security_groups.clone())
        })
        .collect();
    assert_eq!(groups[0], groups[1]);
    assert_eq!(groups[0].as_ref().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn bind_all_reports_ignored_security_groups() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "legacy"
security_groups = ["sg-1"]
"#,
    ))?;
    validate_config(&cfg)?;

    let report = bind_all(&cfg, None)?;
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].message, IGNORED_SECURITY_GROUPS_WARNING);
    assert_eq!(
        report.warnings[0].resource,
        "arn:aws:ecs:us-east-1:123456789012:task-definition/legacy:1"
    );
    assert!(report.targets[0].target.ecs_parameters.launch_type.is_none());
    Ok(())
}

#[test]
fn bind_all_can_select_a_single_target() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.a]
cluster = "main"
task_definition = "web"

[target.b]
cluster = "main"
task_definition = "legacy"
"#,
    ))?;
    validate_config(&cfg)?;

    let report = bind_all(&cfg, Some("b"))?;
    assert_eq!(report.targets.len(), 1);
    assert_eq!(report.targets[0].name, "b");

    assert!(bind_all(&cfg, Some("zzz")).is_err());
    Ok(())
}

#[test]
fn report_serializes_target_policy_and_warnings() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "web"
subnet_selection = { group = "Public" }
"#,
    ))?;
    validate_config(&cfg)?;

    let json = to_json(&bind_all(&cfg, None)?);
    let target = &json["targets"][0];

    assert_eq!(target["name"], "t");
    assert_eq!(target["target"]["EcsParameters"]["LaunchType"], json!(LaunchType::Ec2));
    let vpc = &target["target"]["EcsParameters"]["NetworkConfiguration"]["AwsVpcConfiguration"];
    assert_eq!(vpc["Subnets"], json!(["subnet-c"]));
    // Selected by group, not by public type.
    assert_eq!(vpc["AssignPublicIp"], "DISABLED");
    assert_eq!(target["policy"]["Statement"].as_array().map(Vec::len), Some(3));
    assert!(target["target"].get("RolePolicy").is_none());
    assert_eq!(json["warnings"], json!([]));
    Ok(())
}

#[test]
fn override_field_named_name_fails_validation() -> TestResult {
    let cfg = load_from_str(&config_with(
        r#"
[target.t]
cluster = "main"
task_definition = "web"

[[target.t.container_overrides]]
containerName = "app"
name = "other"
"#,
    ))?;

    assert!(cfg.target["t"].container_overrides[0].shadows_container_name());

    let err = validate_config(&cfg).expect_err("name collides with containerName");
    let msg = err.to_string();
    assert!(msg.contains("container override #0"), "{msg}");
    assert!(msg.contains("reserved for containerName"), "{msg}");
    Ok(())
}
