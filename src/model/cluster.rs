// src/model/cluster.rs

use crate::model::{Arn, ClusterRef, NetworkContext, Vpc};

/// A cluster and the VPC its tasks are placed in.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub arn: Arn,
    pub vpc: Vpc,
}

impl Cluster {
    pub fn new(arn: Arn, vpc: Vpc) -> Self {
        Self { arn, vpc }
    }
}

impl ClusterRef for Cluster {
    fn arn(&self) -> &Arn {
        &self.arn
    }

    fn network(&self) -> &dyn NetworkContext {
        &self.vpc
    }
}
