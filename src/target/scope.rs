// src/target/scope.rs

//! Shared construction state for a set of task targets.
//!
//! Holds the security groups generated for task definitions (so they are
//! created at most once per task definition) and the non-fatal warnings
//! recorded against task definitions during construction.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{Arn, SecurityGroup};

/// A non-fatal diagnostic attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub resource: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Scope {
    /// Generated security groups, keyed by task definition ARN.
    security_groups: BTreeMap<String, SecurityGroup>,
    warnings: Vec<Warning>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Security group previously generated for `task_definition`, if any.
    pub fn find_security_group(&self, task_definition: &Arn) -> Option<&SecurityGroup> {
        self.security_groups.get(task_definition.as_str())
    }

    /// Return the security group generated for `task_definition`, calling
    /// `create` only if none exists yet.
    pub fn acquire_security_group<F>(&mut self, task_definition: &Arn, create: F) -> SecurityGroup
    where
        F: FnOnce() -> SecurityGroup,
    {
        self.security_groups
            .entry(task_definition.as_str().to_string())
            .or_insert_with(|| {
                let sg = create();
                debug!(
                    task_definition = %task_definition,
                    security_group = %sg,
                    "generated security group for task definition"
                );
                sg
            })
            .clone()
    }

    /// Number of security groups generated in this scope.
    pub fn generated_security_groups(&self) -> usize {
        self.security_groups.len()
    }

    pub fn add_warning(&mut self, resource: &Arn, message: impl Into<String>) {
        let message = message.into();
        warn!(resource = %resource, "{message}");
        self.warnings.push(Warning {
            resource: resource.to_string(),
            message,
        });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn warnings_for<'a>(&'a self, resource: &'a Arn) -> impl Iterator<Item = &'a Warning> + 'a {
        self.warnings
            .iter()
            .filter(move |w| w.resource == resource.as_str())
    }
}
