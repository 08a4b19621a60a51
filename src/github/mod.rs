//! GitHub API boundary
//!
//! Everything that talks to the remote service lives here: the wire models,
//! the error taxonomy, and the authenticated client. The rest of the crate
//! only sees the [`Session`] trait, so the driver logic can be exercised
//! against a fake session in tests.

pub mod client;
pub mod error;
pub mod model;

pub use client::{Credentials, GithubClient};
pub use error::ApiError;
pub use model::{CodeHit, ResetTimes};

use std::fmt;

/// Rate-limited resource pools exposed by the GitHub API.
///
/// Code search draws from the `search` pool; everything else (user and org
/// lookups included) draws from `core`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Core,
    Search,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Core => write!(f, "core"),
            Resource::Search => write!(f, "search"),
        }
    }
}

/// An authenticated session against the remote service.
///
/// [`GithubClient`] is the production implementation; tests inject a fake.
pub trait Session {
    /// Current reset timestamps for both rate-limited resource pools.
    fn rate_limits(&self) -> Result<ResetTimes, ApiError>;

    /// Look up a user by login name. `Ok(())` means the user exists.
    fn lookup_user(&self, name: &str) -> Result<(), ApiError>;

    /// Look up an organization by login name. `Ok(())` means the org exists.
    fn lookup_org(&self, name: &str) -> Result<(), ApiError>;

    /// Run a code search, yielding hits lazily across result pages.
    ///
    /// Every page fetch can fail with the same signals as the initial call,
    /// so errors surface as items mid-stream.
    fn search_code<'a>(
        &'a self,
        query: &str,
    ) -> Box<dyn Iterator<Item = Result<CodeHit, ApiError>> + 'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_display() {
        assert_eq!(Resource::Core.to_string(), "core");
        assert_eq!(Resource::Search.to_string(), "search");
    }
}
