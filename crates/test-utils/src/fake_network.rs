use std::sync::{Arc, Mutex};

use taskbind::errors::{Result, TaskbindError};
use taskbind::model::{Arn, ClusterRef, NetworkContext, SubnetSelection};

/// A fake network context that:
/// - records every subnet selection it was asked to resolve
/// - answers with a fixed subnet list, or fails if none was configured.
#[derive(Debug)]
pub struct FakeNetwork {
    vpc_id: String,
    subnets: Option<Vec<String>>,
    selections: Arc<Mutex<Vec<SubnetSelection>>>,
}

impl FakeNetwork {
    pub fn new(vpc_id: &str, subnets: &[&str]) -> Self {
        Self {
            vpc_id: vpc_id.to_string(),
            subnets: Some(subnets.iter().map(|s| s.to_string()).collect()),
            selections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A network whose subnet lookups always fail.
    pub fn unresolvable(vpc_id: &str) -> Self {
        Self {
            vpc_id: vpc_id.to_string(),
            subnets: None,
            selections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn selections(&self) -> Arc<Mutex<Vec<SubnetSelection>>> {
        Arc::clone(&self.selections)
    }
}

impl NetworkContext for FakeNetwork {
    fn vpc_id(&self) -> &str {
        &self.vpc_id
    }

    fn select_subnets(&self, selection: &SubnetSelection) -> Result<Vec<String>> {
        self.selections.lock().unwrap().push(selection.clone());
        self.subnets
            .clone()
            .ok_or_else(|| TaskbindError::NoMatchingSubnets {
                vpc_id: self.vpc_id.clone(),
                selection: selection.to_string(),
            })
    }
}

/// Cluster backed by a [`FakeNetwork`].
#[derive(Debug)]
pub struct FakeCluster {
    pub arn: Arn,
    pub network: FakeNetwork,
}

impl ClusterRef for FakeCluster {
    fn arn(&self) -> &Arn {
        &self.arn
    }

    fn network(&self) -> &dyn NetworkContext {
        &self.network
    }
}
