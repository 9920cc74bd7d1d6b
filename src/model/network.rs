// src/model/network.rs

//! VPC, subnet and security-group values consumed by task targets.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, TaskbindError};
use crate::model::NetworkContext;

/// Kind of subnet, as far as task placement is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetType {
    /// Routes to an internet gateway; tasks need a public IP to reach out.
    Public,
    /// Egress through NAT.
    Private,
    /// No route outside the VPC.
    Isolated,
}

impl fmt::Display for SubnetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubnetType::Public => "public",
            SubnetType::Private => "private",
            SubnetType::Isolated => "isolated",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subnet {
    pub id: String,
    #[serde(rename = "type")]
    pub subnet_type: SubnetType,
    /// Optional subnet group name (e.g. "Private", "Ingress").
    #[serde(default)]
    pub group: Option<String>,
}

impl Subnet {
    pub fn new(id: impl Into<String>, subnet_type: SubnetType) -> Self {
        Self {
            id: id.into(),
            subnet_type,
            group: None,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Caller preference for which subnets a task should be placed in.
///
/// A selection with neither a type nor a group selects private subnets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SubnetSelection {
    #[serde(default, rename = "type")]
    pub subnet_type: Option<SubnetType>,
    #[serde(default)]
    pub group: Option<String>,
}

impl SubnetSelection {
    pub fn of_type(subnet_type: SubnetType) -> Self {
        Self {
            subnet_type: Some(subnet_type),
            group: None,
        }
    }

    pub fn private() -> Self {
        Self::of_type(SubnetType::Private)
    }

    pub fn public() -> Self {
        Self::of_type(SubnetType::Public)
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            subnet_type: None,
            group: Some(name.into()),
        }
    }

    pub fn matches(&self, subnet: &Subnet) -> bool {
        match (&self.subnet_type, &self.group) {
            (None, None) => subnet.subnet_type == SubnetType::Private,
            (Some(ty), None) => subnet.subnet_type == *ty,
            (None, Some(group)) => subnet.group.as_deref() == Some(group.as_str()),
            (Some(ty), Some(group)) => {
                subnet.subnet_type == *ty && subnet.group.as_deref() == Some(group.as_str())
            }
        }
    }
}

impl fmt::Display for SubnetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.subnet_type, &self.group) {
            (None, None) => write!(f, "type=private"),
            (Some(ty), None) => write!(f, "type={ty}"),
            (None, Some(group)) => write!(f, "group={group}"),
            (Some(ty), Some(group)) => write!(f, "type={ty},group={group}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vpc {
    id: String,
    subnets: Vec<Subnet>,
}

impl Vpc {
    pub fn new(id: impl Into<String>, subnets: Vec<Subnet>) -> Self {
        Self {
            id: id.into(),
            subnets,
        }
    }
}

impl NetworkContext for Vpc {
    fn vpc_id(&self) -> &str {
        &self.id
    }

    /// Subnet ids matching `selection`, in declaration order.
    fn select_subnets(&self, selection: &SubnetSelection) -> Result<Vec<String>> {
        let ids: Vec<String> = self
            .subnets
            .iter()
            .filter(|subnet| selection.matches(subnet))
            .map(|subnet| subnet.id.clone())
            .collect();

        if ids.is_empty() {
            return Err(TaskbindError::NoMatchingSubnets {
                vpc_id: self.id.clone(),
                selection: selection.to_string(),
            });
        }

        debug!(vpc = %self.id, %selection, subnets = ?ids, "selected subnets");
        Ok(ids)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SecurityGroup {
    pub id: String,
}

impl SecurityGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for SecurityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
