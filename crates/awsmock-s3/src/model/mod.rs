//! Request and response shapes of the S3 operations.

pub mod input;
pub mod output;

pub use input::*;
pub use output::*;

/// Whether `CopyObject` keeps the source metadata or takes the request's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetadataDirective {
    /// Copy metadata and tags from the source (default).
    #[default]
    Copy,
    /// Use the metadata supplied with the request.
    Replace,
}

impl MetadataDirective {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "COPY",
            Self::Replace => "REPLACE",
        }
    }
}

impl std::fmt::Display for MetadataDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MetadataDirective {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("REPLACE") {
            Self::Replace
        } else {
            Self::Copy
        }
    }
}
