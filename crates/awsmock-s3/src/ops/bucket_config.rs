//! Bucket configuration operation handlers.
//!
//! Versioning, policy, tagging, notification, request payment, ACL, CORS,
//! lifecycle, website and logging.

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::acl::{AccessControlPolicy, AclInput};
use crate::error::{S3ServiceError, S3ServiceResult};
use crate::provider::MockS3;
use crate::state::{RequestPayer, VersioningStatus};
use crate::validation::validate_tags;

/// Opaque configuration documents must be JSON objects.
fn require_object(document: &Value, what: &str) -> S3ServiceResult<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(S3ServiceError::malformed_xml(format!(
            "The {what} configuration you provided is not well-formed"
        )))
    }
}

fn read_config(
    slot: &RwLock<Option<Value>>,
    missing: impl FnOnce() -> S3ServiceError,
) -> S3ServiceResult<Value> {
    slot.read().clone().ok_or_else(missing)
}

impl MockS3 {
    // -- versioning --

    /// Set the versioning status to `Enabled` or `Suspended`.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, or `MalformedXML` for any other status.
    pub fn put_bucket_versioning(&self, bucket: &str, status: &str) -> S3ServiceResult<()> {
        let status = match status {
            "Enabled" => VersioningStatus::Enabled,
            "Suspended" => VersioningStatus::Suspended,
            other => {
                return Err(S3ServiceError::malformed_xml(format!(
                    "Invalid versioning status: {other}"
                )));
            }
        };
        self.state.get_bucket(bucket)?.set_versioning(status);
        Ok(())
    }

    /// Versioning status; [`VersioningStatus::Disabled`] for a bucket that
    /// was never configured.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn get_bucket_versioning(&self, bucket: &str) -> S3ServiceResult<VersioningStatus> {
        Ok(self.state.get_bucket(bucket)?.versioning_status())
    }

    // -- policy --

    /// Store a bucket policy.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, or `MalformedPolicy` when `policy` is not a JSON
    /// object.
    pub fn put_bucket_policy(&self, bucket: &str, policy: &str) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        let parsed: Value =
            serde_json::from_str(policy).map_err(|_| S3ServiceError::MalformedPolicy)?;
        if !parsed.is_object() {
            return Err(S3ServiceError::MalformedPolicy);
        }
        *b.policy.write() = Some(policy.to_owned());
        debug!(bucket, "bucket policy stored");
        Ok(())
    }

    /// The stored policy text.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `NoSuchBucketPolicy`.
    pub fn get_bucket_policy(&self, bucket: &str) -> S3ServiceResult<String> {
        self.state
            .get_bucket(bucket)?
            .policy
            .read()
            .clone()
            .ok_or(S3ServiceError::NoSuchBucketPolicy)
    }

    /// Remove the policy; removing an absent policy succeeds.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn delete_bucket_policy(&self, bucket: &str) -> S3ServiceResult<()> {
        *self.state.get_bucket(bucket)?.policy.write() = None;
        Ok(())
    }

    // -- tagging --

    /// Replace the bucket tag set.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `InvalidTag`.
    pub fn put_bucket_tagging(&self, bucket: &str, tags: Vec<(String, String)>) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        validate_tags(&tags)?;
        *b.tags.write() = Some(tags);
        Ok(())
    }

    /// The bucket tag set.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, or `NoSuchTagSet` when no tag set was ever put.
    pub fn get_bucket_tagging(&self, bucket: &str) -> S3ServiceResult<Vec<(String, String)>> {
        self.state
            .get_bucket(bucket)?
            .tags
            .read()
            .clone()
            .ok_or(S3ServiceError::NoSuchTagSet)
    }

    /// Remove the tag set.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn delete_bucket_tagging(&self, bucket: &str) -> S3ServiceResult<()> {
        *self.state.get_bucket(bucket)?.tags.write() = None;
        Ok(())
    }

    // -- notification --

    /// Replace the notification configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `MalformedXML`.
    pub fn put_bucket_notification(&self, bucket: &str, configuration: Value) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        require_object(&configuration, "notification")?;
        *b.notification.write() = Some(configuration);
        Ok(())
    }

    /// The notification configuration, an empty object when unset.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn get_bucket_notification(&self, bucket: &str) -> S3ServiceResult<Value> {
        Ok(self
            .state
            .get_bucket(bucket)?
            .notification
            .read()
            .clone()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new())))
    }

    // -- request payment --

    /// Set who pays for requests: `BucketOwner` or `Requester`.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, or `MalformedXML` for any other payer.
    pub fn put_request_payment(&self, bucket: &str, payer: &str) -> S3ServiceResult<()> {
        let payer = match payer {
            "BucketOwner" => RequestPayer::BucketOwner,
            "Requester" => RequestPayer::Requester,
            other => {
                return Err(S3ServiceError::malformed_xml(format!(
                    "Invalid request payer: {other}"
                )));
            }
        };
        *self.state.get_bucket(bucket)?.request_payment.write() = payer;
        Ok(())
    }

    /// Who pays for requests.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn get_request_payment(&self, bucket: &str) -> S3ServiceResult<RequestPayer> {
        Ok(*self.state.get_bucket(bucket)?.request_payment.read())
    }

    // -- ACL --

    /// Replace the bucket ACL with a canned ACL or an explicit policy.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`, `InvalidArgument` or `MalformedACLError`.
    pub fn put_bucket_acl(&self, bucket: &str, acl: &AclInput) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        let policy = acl.resolve(&b.owner, &b.owner)?;
        *b.acl.write() = policy;
        Ok(())
    }

    /// The bucket ACL.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn get_bucket_acl(&self, bucket: &str) -> S3ServiceResult<AccessControlPolicy> {
        Ok(self.state.get_bucket(bucket)?.acl.read().clone())
    }

    // -- CORS --

    /// Store the CORS configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `MalformedXML`.
    pub fn put_bucket_cors(&self, bucket: &str, configuration: Value) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        require_object(&configuration, "CORS")?;
        *b.cors.write() = Some(configuration);
        Ok(())
    }

    /// The CORS configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `NoSuchCORSConfiguration`.
    pub fn get_bucket_cors(&self, bucket: &str) -> S3ServiceResult<Value> {
        read_config(&self.state.get_bucket(bucket)?.cors, || {
            S3ServiceError::NoSuchCorsConfiguration
        })
    }

    /// Remove the CORS configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn delete_bucket_cors(&self, bucket: &str) -> S3ServiceResult<()> {
        *self.state.get_bucket(bucket)?.cors.write() = None;
        Ok(())
    }

    // -- lifecycle --

    /// Store the lifecycle configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `MalformedXML`.
    pub fn put_bucket_lifecycle(&self, bucket: &str, configuration: Value) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        require_object(&configuration, "lifecycle")?;
        *b.lifecycle.write() = Some(configuration);
        Ok(())
    }

    /// The lifecycle configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `NoSuchLifecycleConfiguration`.
    pub fn get_bucket_lifecycle(&self, bucket: &str) -> S3ServiceResult<Value> {
        read_config(&self.state.get_bucket(bucket)?.lifecycle, || {
            S3ServiceError::NoSuchLifecycleConfiguration
        })
    }

    /// Remove the lifecycle configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn delete_bucket_lifecycle(&self, bucket: &str) -> S3ServiceResult<()> {
        *self.state.get_bucket(bucket)?.lifecycle.write() = None;
        Ok(())
    }

    // -- website --

    /// Store the website configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `MalformedXML`.
    pub fn put_bucket_website(&self, bucket: &str, configuration: Value) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        require_object(&configuration, "website")?;
        *b.website.write() = Some(configuration);
        Ok(())
    }

    /// The website configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `NoSuchWebsiteConfiguration`.
    pub fn get_bucket_website(&self, bucket: &str) -> S3ServiceResult<Value> {
        read_config(&self.state.get_bucket(bucket)?.website, || {
            S3ServiceError::NoSuchWebsiteConfiguration
        })
    }

    /// Remove the website configuration.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn delete_bucket_website(&self, bucket: &str) -> S3ServiceResult<()> {
        *self.state.get_bucket(bucket)?.website.write() = None;
        Ok(())
    }

    // -- logging --

    /// Enable logging with `configuration`, or disable it with `None`.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket` or `MalformedXML`.
    pub fn put_bucket_logging(&self, bucket: &str, configuration: Option<Value>) -> S3ServiceResult<()> {
        let b = self.state.get_bucket(bucket)?;
        if let Some(configuration) = &configuration {
            require_object(configuration, "logging")?;
        }
        *b.logging.write() = configuration;
        Ok(())
    }

    /// The logging configuration; `None` when logging is off.
    ///
    /// # Errors
    ///
    /// `NoSuchBucket`.
    pub fn get_bucket_logging(&self, bucket: &str) -> S3ServiceResult<Option<Value>> {
        Ok(self.state.get_bucket(bucket)?.logging.read().clone())
    }
}
