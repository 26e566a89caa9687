//! Core types, configuration, and state management for AWSMock.
//!
//! This crate provides the building blocks shared by the S3 and IAM mocks:
//! per-account/per-region state scoping, ARN handling, AWS-style identifier
//! generation, and the marker-based pagination helper used by list actions.

pub mod arn;
mod config;
mod error;
pub mod ids;
pub mod pagination;
mod state;
mod types;

pub use arn::Arn;
pub use config::MockConfig;
pub use error::{MockError, MockResult};
pub use pagination::{MarkerPager, Page};
pub use state::AccountRegionStore;
pub use types::{AccountId, AwsRegion};
