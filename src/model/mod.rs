// src/model/mod.rs

//! Collaborators consumed by task targets.
//!
//! - [`arn`] parses and renders resource names.
//! - [`cluster`] and [`network`] describe where tasks are placed.
//! - [`task_definition`] describes what is run and with which roles.
//! - [`iam`] holds the policy statements granted to the invoking role.
//!
//! The traits below are the seams the target logic reads through; the
//! concrete types in this module implement them for config-built values.

pub mod arn;
pub mod cluster;
pub mod iam;
pub mod network;
pub mod task_definition;

use std::fmt::Debug;

pub use arn::Arn;
pub use cluster::Cluster;
pub use iam::{Effect, PermissionSet, PolicyDocument, PolicyStatement};
pub use network::{SecurityGroup, Subnet, SubnetSelection, SubnetType, Vpc};
pub use task_definition::{Compatibility, NetworkMode, Role, TaskDefinition};

use crate::errors::Result;

/// Network context of a cluster: resolves subnet preferences to ids.
pub trait NetworkContext: Send + Sync + Debug {
    fn vpc_id(&self) -> &str;
    fn select_subnets(&self, selection: &SubnetSelection) -> Result<Vec<String>>;
}

pub trait ClusterRef: Send + Sync + Debug {
    fn arn(&self) -> &Arn;
    fn network(&self) -> &dyn NetworkContext;
}

pub trait TaskDefinitionRef: Send + Sync + Debug {
    fn arn(&self) -> &Arn;
    fn network_mode(&self) -> NetworkMode;
    fn compatibility(&self) -> Compatibility;
    fn execution_role(&self) -> Option<&Role>;
    fn task_role(&self) -> &Role;
}
