// src/model/arn.rs

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::errors::TaskbindError;

static ARN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:(?P<partition>aws[a-z-]*):(?P<service>[a-z0-9-]+):(?P<region>[a-z0-9-]*):(?P<account>[0-9]{12})?:(?P<resource>.+)$",
    )
    .expect("ARN pattern is a valid regex")
});

/// A parsed Amazon Resource Name.
///
/// The original string is kept verbatim so that rendering an `Arn` always
/// yields exactly what the user supplied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Arn {
    raw: String,
    partition: String,
    service: String,
    region: String,
    account: String,
    resource: String,
}

impl Arn {
    pub fn new(
        partition: impl Into<String>,
        service: impl Into<String>,
        region: impl Into<String>,
        account: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        let (partition, service, region, account, resource) = (
            partition.into(),
            service.into(),
            region.into(),
            account.into(),
            resource.into(),
        );
        Self {
            raw: format!("arn:{partition}:{service}:{region}:{account}:{resource}"),
            partition,
            service,
            region,
            account,
            resource,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl FromStr for Arn {
    type Err = TaskbindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = ARN_PATTERN
            .captures(s.trim())
            .ok_or_else(|| TaskbindError::InvalidArn(s.to_string()))?;

        let part = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };

        Ok(Self {
            raw: s.trim().to_string(),
            partition: part("partition"),
            service: part("service"),
            region: part("region"),
            account: part("account"),
            resource: part("resource"),
        })
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Arn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
