//! Wire models for the GitHub REST API
//!
//! Only the fields the tool actually consumes are deserialized; the API
//! returns far more.

use serde::Deserialize;

use crate::github::Resource;

/// One highlighted excerpt attached to a code search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct TextMatch {
    pub fragment: String,
}

/// One match from a code search call.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeHit {
    pub path: String,
    #[serde(default)]
    pub score: f64,
    pub url: String,
    #[serde(default)]
    pub text_matches: Vec<TextMatch>,
}

impl CodeHit {
    /// The matched text excerpts, in response order.
    pub fn fragments(&self) -> Vec<&str> {
        self.text_matches.iter().map(|m| m.fragment.as_str()).collect()
    }
}

/// One page of code search results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<CodeHit>,
}

/// A single rate-limit window from `GET /rate_limit`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateWindow {
    pub limit: u32,
    pub remaining: u32,
    /// Epoch seconds at which the window resets.
    pub reset: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitResources {
    pub core: RateWindow,
    pub search: RateWindow,
}

/// Response shape of `GET /rate_limit`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitStatus {
    pub resources: RateLimitResources,
}

/// Reset timestamps for both rate-limited pools, in epoch seconds.
#[derive(Debug, Clone, Copy)]
pub struct ResetTimes {
    pub core: u64,
    pub search: u64,
}

impl ResetTimes {
    pub fn for_resource(&self, resource: Resource) -> u64 {
        match resource {
            Resource::Core => self.core,
            Resource::Search => self.search,
        }
    }
}

impl From<RateLimitStatus> for ResetTimes {
    fn from(status: RateLimitStatus) -> Self {
        Self {
            core: status.resources.core.reset,
            search: status.resources.search.reset,
        }
    }
}

/// Response shape of `GET /user`, used to confirm authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
}
