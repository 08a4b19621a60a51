//! Existence prober
//!
//! Confirms a user or org exists before spending a search-pool call on it.
//! The lookup draws from the core pool, which has a much higher limit than
//! search.

use anyhow::Result;
use colored::Colorize;
use std::fmt;

use crate::core::{gate, Context};
use crate::github::{ApiError, Resource};

/// What a scope name is probed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    User,
    Org,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::User => write!(f, "User"),
            ProbeKind::Org => write!(f, "Org"),
        }
    }
}

/// Check whether `name` exists as the given kind.
///
/// Throttling gates on the core pool and retries until the lookup answers;
/// a not-found answer prints a notice and returns `false` without retrying.
/// Any other failure is fatal.
pub fn exists(ctx: &mut Context<'_>, kind: ProbeKind, name: &str) -> Result<bool> {
    let name = name.trim();
    loop {
        let outcome = match kind {
            ProbeKind::User => ctx.session.lookup_user(name),
            ProbeKind::Org => ctx.session.lookup_org(name),
        };
        match outcome {
            Ok(()) => return Ok(true),
            Err(ApiError::Forbidden) => gate::await_reset(ctx, Resource::Core)?,
            Err(ApiError::NotFound) => {
                eprintln!("{}", format!("{} {} doesn't exist", kind, name).red());
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        }
    }
}
