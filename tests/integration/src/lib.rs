//! Scenario tests for AWSMock (S3 + IAM).
//!
//! The mocks run in process, so these tests need no server and run with a
//! plain `cargo test -p awsmock-integration`. Set `RUST_LOG=debug` to see
//! the handlers' traces.

use std::sync::Once;

use awsmock_iam::{IamConfig, MockIam};
use awsmock_s3::model::{CreateBucketInput, GetObjectInput, PutObjectInput, PutObjectOutput};
use awsmock_s3::{MockS3, S3Config, S3ServiceResult};
use bytes::Bytes;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A fresh S3 mock with the default configuration.
#[must_use]
pub fn s3() -> MockS3 {
    init_tracing();
    MockS3::new(S3Config::default())
}

/// A fresh IAM mock, optionally without the AWS managed policy catalog.
#[must_use]
pub fn iam(seed_managed: bool) -> MockIam {
    init_tracing();
    MockIam::new(
        IamConfig::builder()
            .seed_aws_managed_policies(seed_managed)
            .build(),
    )
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name.
pub fn create_test_bucket(s3: &MockS3, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    s3.create_bucket(CreateBucketInput {
        bucket: name.clone(),
        ..CreateBucketInput::default()
    })
    .unwrap_or_else(|e| panic!("failed to create bucket {name}: {e}"));
    name
}

/// Put `body` under `key`.
pub fn put(s3: &MockS3, bucket: &str, key: &str, body: &'static [u8]) -> PutObjectOutput {
    s3.put_object(PutObjectInput {
        bucket: bucket.to_owned(),
        key: key.to_owned(),
        body: Bytes::from_static(body),
        ..PutObjectInput::default()
    })
    .unwrap_or_else(|e| panic!("failed to put {bucket}/{key}: {e}"))
}

/// Read the body of `key`, optionally at a specific version.
pub fn read(s3: &MockS3, bucket: &str, key: &str, version_id: Option<&str>) -> S3ServiceResult<Bytes> {
    s3.get_object(GetObjectInput {
        bucket: bucket.to_owned(),
        key: key.to_owned(),
        version_id: version_id.map(str::to_owned),
        ..GetObjectInput::default()
    })
    .map(|o| o.body)
}

mod test_bucket;
mod test_iam;
mod test_list;
mod test_multipart;
mod test_object;
mod test_query;
mod test_versioning;
