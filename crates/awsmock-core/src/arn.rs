//! Amazon Resource Names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MockError;
use crate::types::AccountId;

/// Partition used by every mocked resource.
pub const DEFAULT_PARTITION: &str = "aws";

/// A parsed ARN: `arn:partition:service:region:account:resource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arn {
    /// Partition, normally `aws`.
    pub partition: String,
    /// Service namespace such as `iam` or `s3`.
    pub service: String,
    /// Region, empty for global services.
    pub region: String,
    /// Owning account, empty for S3 buckets and objects.
    pub account: String,
    /// Resource part; may itself contain colons and slashes.
    pub resource: String,
}

impl Arn {
    /// ARN for an IAM resource, e.g. `user/path/alice`.
    ///
    /// ```
    /// use awsmock_core::{AccountId, Arn};
    ///
    /// let arn = Arn::iam(&AccountId::default(), "user/alice");
    /// assert_eq!(arn.to_string(), "arn:aws:iam::000000000000:user/alice");
    /// ```
    #[must_use]
    pub fn iam(account: &AccountId, resource: impl Into<String>) -> Self {
        Self {
            partition: DEFAULT_PARTITION.to_owned(),
            service: "iam".to_owned(),
            region: String::new(),
            account: account.to_string(),
            resource: resource.into(),
        }
    }

    /// ARN for an S3 bucket or object (`bucket` or `bucket/key`).
    #[must_use]
    pub fn s3(resource: impl Into<String>) -> Self {
        Self {
            partition: DEFAULT_PARTITION.to_owned(),
            service: "s3".to_owned(),
            region: String::new(),
            account: String::new(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

impl FromStr for Arn {
    type Err = MockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(6, ':');
        let (Some("arn"), Some(partition), Some(service), Some(region), Some(account), Some(resource)) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(MockError::InvalidArn(s.to_owned()));
        };

        if partition.is_empty() || service.is_empty() || resource.is_empty() {
            return Err(MockError::InvalidArn(s.to_owned()));
        }

        Ok(Self {
            partition: partition.to_owned(),
            service: service.to_owned(),
            region: region.to_owned(),
            account: account.to_owned(),
            resource: resource.to_owned(),
        })
    }
}
