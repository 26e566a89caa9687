//! IAM operation handlers.
//!
//! Each submodule adds one category of operations as inherent methods on
//! [`crate::provider::MockIam`]. Every list operation pages through the
//! shared marker pagers.

pub mod attachments;
pub mod credentials;
pub mod groups;
pub mod inline;
pub mod instance_profiles;
pub mod policies;
pub mod roles;
pub mod users;
