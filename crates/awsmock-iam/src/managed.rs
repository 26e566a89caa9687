//! AWS managed policy catalog.
//!
//! A small set of commonly referenced AWS managed policies, loaded into the
//! store so roles and users can attach them by their well-known ARNs.

use awsmock_core::{AccountId, Arn};
use chrono::Utc;

use crate::types::{ManagedPolicy, PolicyScope, PolicyVersion};

/// Account segment of AWS managed policy ARNs.
pub const AWS_ACCOUNT: &str = "aws";

const ALLOW_ALL: &str =
    r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"*","Resource":"*"}]}"#;

struct Seed {
    name: &'static str,
    path: &'static str,
    description: &'static str,
    document: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        name: "AdministratorAccess",
        path: "/",
        description: "Provides full access to AWS services and resources.",
        document: ALLOW_ALL,
    },
    Seed {
        name: "PowerUserAccess",
        path: "/",
        description: "Provides full access to AWS services and resources, but does not allow management of Users and groups.",
        document: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","NotAction":["iam:*","organizations:*","account:*"],"Resource":"*"}]}"#,
    },
    Seed {
        name: "ReadOnlyAccess",
        path: "/",
        description: "Provides read-only access to AWS services and resources.",
        document: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["*:Describe*","*:Get*","*:List*"],"Resource":"*"}]}"#,
    },
    Seed {
        name: "IAMFullAccess",
        path: "/",
        description: "Provides full access to IAM via the AWS Management Console.",
        document: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"iam:*","Resource":"*"}]}"#,
    },
    Seed {
        name: "AmazonS3FullAccess",
        path: "/",
        description: "Provides full access to all buckets via the AWS Management Console.",
        document: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"s3:*","Resource":"*"}]}"#,
    },
    Seed {
        name: "AmazonS3ReadOnlyAccess",
        path: "/",
        description: "Provides read only access to all buckets via the AWS Management Console.",
        document: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["s3:Get*","s3:List*"],"Resource":"*"}]}"#,
    },
    Seed {
        name: "AWSLambdaBasicExecutionRole",
        path: "/service-role/",
        description: "Provides write permissions to CloudWatch Logs.",
        document: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["logs:CreateLogGroup","logs:CreateLogStream","logs:PutLogEvents"],"Resource":"*"}]}"#,
    },
    Seed {
        name: "AmazonEC2RoleforSSM",
        path: "/service-role/",
        description: "Default policy for Amazon EC2 Role for Simple Systems Manager service role.",
        document: r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["ssm:*","ec2messages:*"],"Resource":"*"}]}"#,
    },
];

/// ARN of an AWS managed policy.
///
/// ```
/// use awsmock_iam::managed::aws_policy_arn;
///
/// assert_eq!(
///     aws_policy_arn("/", "ReadOnlyAccess"),
///     "arn:aws:iam::aws:policy/ReadOnlyAccess"
/// );
/// ```
#[must_use]
pub fn aws_policy_arn(path: &str, name: &str) -> String {
    Arn {
        account: AWS_ACCOUNT.to_owned(),
        ..Arn::iam(&AccountId::default(), format!("policy{path}{name}"))
    }
    .to_string()
}

/// Fresh copies of every catalog policy, each with a single default `v1`.
#[must_use]
pub fn aws_managed_policies() -> Vec<ManagedPolicy> {
    let now = Utc::now();
    SEEDS
        .iter()
        .map(|seed| ManagedPolicy {
            policy_name: seed.name.to_owned(),
            policy_id: awsmock_core::ids::unique_id("ANPA"),
            arn: aws_policy_arn(seed.path, seed.name),
            path: seed.path.to_owned(),
            description: Some(seed.description.to_owned()),
            create_date: now,
            update_date: now,
            default_version_id: "v1".to_owned(),
            attachment_count: 0,
            scope: PolicyScope::Aws,
            versions: vec![PolicyVersion {
                version_id: "v1".to_owned(),
                document: seed.document.to_owned(),
                is_default_version: true,
                create_date: now,
            }],
            next_version: 2,
        })
        .collect()
}
