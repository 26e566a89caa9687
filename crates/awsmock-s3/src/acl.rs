//! Access control lists for buckets and objects.
//!
//! A bucket or object always carries a full [`AccessControlPolicy`]. Canned
//! ACL names are expanded into grants when applied, so reading an ACL back
//! never depends on how it was set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{S3ServiceError, S3ServiceResult};

/// URI of the group every anonymous and authenticated caller belongs to.
pub const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// URI of the group of every authenticated AWS caller.
pub const AUTHENTICATED_USERS_URI: &str =
    "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

/// URI of the S3 server access log delivery group.
pub const LOG_DELIVERY_URI: &str = "http://acs.amazonaws.com/groups/s3/LogDelivery";

/// Canonical user ID that `aws-exec-read` grants read access to.
const EC2_CANONICAL_ID: &str = "6aa5a366c34c1cbe25dc49211496e913e0351eb0e8c37aa3477e40942ec6b97c";

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// The owner of an S3 object or bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// The canonical user ID of the owner.
    pub id: String,
    /// The display name of the owner.
    pub display_name: String,
}

impl Owner {
    /// Create an owner.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.display_name, self.id)
    }
}

// ---------------------------------------------------------------------------
// CannedAcl
// ---------------------------------------------------------------------------

/// Predefined (canned) ACL grants for S3 buckets and objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CannedAcl {
    /// Owner gets `FULL_CONTROL`. No one else has access rights (default).
    #[default]
    Private,
    /// Owner gets `FULL_CONTROL`. The `AllUsers` group gets `READ` access.
    PublicRead,
    /// Owner gets `FULL_CONTROL`. The `AllUsers` group gets `READ` and `WRITE` access.
    PublicReadWrite,
    /// Owner gets `FULL_CONTROL`. The `AuthenticatedUsers` group gets `READ` access.
    AuthenticatedRead,
    /// Owner gets `FULL_CONTROL`. Amazon EC2 gets `READ` access.
    AwsExecRead,
    /// Object owner gets `FULL_CONTROL`. Bucket owner gets `READ` access.
    BucketOwnerRead,
    /// Both the object owner and the bucket owner get `FULL_CONTROL`.
    BucketOwnerFullControl,
    /// The `LogDelivery` group gets `WRITE` and `READ_ACP` permissions.
    LogDeliveryWrite,
}

impl CannedAcl {
    /// Return the string representation of the canned ACL.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::AuthenticatedRead => "authenticated-read",
            Self::AwsExecRead => "aws-exec-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
            Self::LogDeliveryWrite => "log-delivery-write",
        }
    }

    /// Parse a canned ACL name coming from a request.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::InvalidArgument`] for unknown names.
    pub fn parse_request(name: &str) -> S3ServiceResult<Self> {
        name.parse()
            .map_err(|e: ParseCannedAclError| S3ServiceError::invalid_argument(e.to_string()))
    }

    /// Expand into a full policy.
    ///
    /// `owner` is the resource owner; `bucket_owner` is consulted only by the
    /// `bucket-owner-*` variants and skipped when it is the same account.
    #[must_use]
    pub fn to_policy(self, owner: &Owner, bucket_owner: &Owner) -> AccessControlPolicy {
        let mut grants = vec![Grant::canonical(owner, Permission::FullControl)];

        match self {
            Self::Private => {}
            Self::PublicRead => grants.push(Grant::group(ALL_USERS_URI, Permission::Read)),
            Self::PublicReadWrite => {
                grants.push(Grant::group(ALL_USERS_URI, Permission::Read));
                grants.push(Grant::group(ALL_USERS_URI, Permission::Write));
            }
            Self::AuthenticatedRead => {
                grants.push(Grant::group(AUTHENTICATED_USERS_URI, Permission::Read));
            }
            Self::AwsExecRead => grants.push(Grant {
                grantee: Grantee::CanonicalUser {
                    id: EC2_CANONICAL_ID.to_owned(),
                    display_name: Some("za-team".to_owned()),
                },
                permission: Permission::Read,
            }),
            Self::BucketOwnerRead => {
                if bucket_owner.id != owner.id {
                    grants.push(Grant::canonical(bucket_owner, Permission::Read));
                }
            }
            Self::BucketOwnerFullControl => {
                if bucket_owner.id != owner.id {
                    grants.push(Grant::canonical(bucket_owner, Permission::FullControl));
                }
            }
            Self::LogDeliveryWrite => {
                grants.push(Grant::group(LOG_DELIVERY_URI, Permission::Write));
                grants.push(Grant::group(LOG_DELIVERY_URI, Permission::ReadAcp));
            }
        }

        AccessControlPolicy {
            owner: owner.clone(),
            grants,
        }
    }
}

impl fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`CannedAcl`] from a string fails.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown canned ACL: {0}")]
pub struct ParseCannedAclError(String);

impl FromStr for CannedAcl {
    type Err = ParseCannedAclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public-read" => Ok(Self::PublicRead),
            "public-read-write" => Ok(Self::PublicReadWrite),
            "authenticated-read" => Ok(Self::AuthenticatedRead),
            "aws-exec-read" => Ok(Self::AwsExecRead),
            "bucket-owner-read" => Ok(Self::BucketOwnerRead),
            "bucket-owner-full-control" => Ok(Self::BucketOwnerFullControl),
            "log-delivery-write" => Ok(Self::LogDeliveryWrite),
            _ => Err(ParseCannedAclError(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Grant / Grantee / Permission
// ---------------------------------------------------------------------------

/// An ACL grant that pairs a grantee with a permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// The entity receiving the permission.
    pub grantee: Grantee,
    /// The permission granted.
    pub permission: Permission,
}

impl Grant {
    fn canonical(owner: &Owner, permission: Permission) -> Self {
        Self {
            grantee: Grantee::CanonicalUser {
                id: owner.id.clone(),
                display_name: Some(owner.display_name.clone()),
            },
            permission,
        }
    }

    fn group(uri: &str, permission: Permission) -> Self {
        Self {
            grantee: Grantee::Group {
                uri: uri.to_owned(),
            },
            permission,
        }
    }
}

/// A grantee in an ACL grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Grantee {
    /// A canonical user identified by an AWS account ID.
    CanonicalUser {
        /// The canonical user ID.
        id: String,
        /// The display name for the user.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
    /// A predefined Amazon S3 group.
    Group {
        /// The URI of the group.
        uri: String,
    },
    /// A grantee identified by email.
    Email {
        /// The email address of the grantee.
        email: String,
    },
}

/// A permission that can be granted to a grantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    /// Grants full control (READ, WRITE, READ_ACP, WRITE_ACP).
    FullControl,
    /// Allows grantee to list objects in the bucket or read the object data.
    Read,
    /// Allows grantee to create objects in the bucket.
    Write,
    /// Allows grantee to read the bucket/object ACL.
    ReadAcp,
    /// Allows grantee to write the bucket/object ACL.
    WriteAcp,
}

impl Permission {
    /// Wire name of the permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullControl => "FULL_CONTROL",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::ReadAcp => "READ_ACP",
            Self::WriteAcp => "WRITE_ACP",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AccessControlPolicy
// ---------------------------------------------------------------------------

/// Owner plus the list of grants of a bucket or object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlPolicy {
    /// Resource owner.
    pub owner: Owner,
    /// Grants in the order they were given.
    pub grants: Vec<Grant>,
}

impl AccessControlPolicy {
    /// Private policy: only the owner, with full control.
    #[must_use]
    pub fn private(owner: &Owner) -> Self {
        CannedAcl::Private.to_policy(owner, owner)
    }

    /// Check that the policy names an owner and every grantee identifies
    /// someone.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::MalformedAcl`] on the first violation.
    pub fn validate(&self) -> S3ServiceResult<()> {
        if self.owner.id.trim().is_empty() {
            return Err(S3ServiceError::MalformedAcl {
                message: "Owner ID must not be empty".to_owned(),
            });
        }

        for grant in &self.grants {
            let missing = match &grant.grantee {
                Grantee::CanonicalUser { id, .. } => id.trim().is_empty().then_some("ID"),
                Grantee::Group { uri } => uri.trim().is_empty().then_some("URI"),
                Grantee::Email { email } => email.trim().is_empty().then_some("EmailAddress"),
            };
            if let Some(field) = missing {
                return Err(S3ServiceError::MalformedAcl {
                    message: format!("Grantee is missing its {field}"),
                });
            }
        }

        Ok(())
    }

    /// Whether any grant gives the given group URI the permission.
    #[must_use]
    pub fn grants_group(&self, uri: &str, permission: Permission) -> bool {
        self.grants.iter().any(|g| {
            g.permission == permission && matches!(&g.grantee, Grantee::Group { uri: u } if u == uri)
        })
    }
}

/// ACL as supplied by a caller: either a canned name or a full policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclInput {
    /// A canned ACL name such as `public-read`.
    Canned(String),
    /// An explicit access control policy.
    Policy(AccessControlPolicy),
}

impl AclInput {
    /// Resolve into a validated policy for a resource owned by `owner` in a
    /// bucket owned by `bucket_owner`.
    ///
    /// # Errors
    ///
    /// [`S3ServiceError::InvalidArgument`] for unknown canned names and
    /// [`S3ServiceError::MalformedAcl`] for incomplete policies.
    pub fn resolve(&self, owner: &Owner, bucket_owner: &Owner) -> S3ServiceResult<AccessControlPolicy> {
        match self {
            Self::Canned(name) => Ok(CannedAcl::parse_request(name)?.to_policy(owner, bucket_owner)),
            Self::Policy(policy) => {
                policy.validate()?;
                Ok(policy.clone())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
