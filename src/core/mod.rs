//! Core driver logic
//!
//! The sequential iterate/probe/search/cache loop. Everything here works
//! against the [`Session`] trait so it can run without a live network.

pub mod dorks;
pub mod gate;
pub mod output;
pub mod probe;
pub mod query;
pub mod runner;

use crate::github::{Resource, Session};

/// Last observed reset timestamps, per rate-limited resource pool.
///
/// Refreshed by the gate from live rate-limit status immediately before each
/// retry decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetState {
    core: Option<u64>,
    search: Option<u64>,
}

impl ResetState {
    pub fn record(&mut self, resource: Resource, reset_epoch: u64) {
        match resource {
            Resource::Core => self.core = Some(reset_epoch),
            Resource::Search => self.search = Some(reset_epoch),
        }
    }

    pub fn last(&self, resource: Resource) -> Option<u64> {
        match resource {
            Resource::Core => self.core,
            Resource::Search => self.search,
        }
    }
}

/// Run context threaded through the driver, prober and executor.
pub struct Context<'a> {
    pub session: &'a dyn Session,
    pub resets: ResetState,
    /// Suppress non-essential stderr chatter (dork echo, per-query notices).
    pub quiet: bool,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a dyn Session, quiet: bool) -> Self {
        Self {
            session,
            resets: ResetState::default(),
            quiet,
        }
    }
}
