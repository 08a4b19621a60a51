//! Rate-limit gate
//!
//! When a remote call answers with a throttling signal, the gate asks the
//! API for the current reset timestamp of the limiting resource pool and
//! suspends the run until one second past it.

use anyhow::{Context as _, Result};
use chrono::{Local, TimeZone};
use colored::Colorize;
use std::thread;
use std::time::{Duration, SystemTime};

use crate::core::Context;
use crate::github::Resource;

/// Block until the named resource pool has reset.
///
/// Refreshes live rate-limit status, records the reset epoch, and sleeps if
/// the reset lies in the future. A failed status query is fatal to the run.
pub fn await_reset(ctx: &mut Context<'_>, resource: Resource) -> Result<()> {
    let limits = ctx
        .session
        .rate_limits()
        .context("Failed to query rate limit status")?;
    let reset = limits.for_resource(resource);
    ctx.resets.record(resource, reset);

    if let Some(wait) = sleep_duration(reset, unix_now()) {
        eprintln!(
            "{}",
            format!(
                "GitHub {} rate limit hit. Sleeping {} seconds (resets at {}).",
                resource,
                wait.as_secs(),
                format_reset(reset)
            )
            .yellow()
        );
        thread::sleep(wait);
    }
    Ok(())
}

/// How long to sleep for a reset at `reset_epoch`, observed at `now`.
///
/// One second past the published reset, or `None` when the window has
/// already reset.
fn sleep_duration(reset_epoch: u64, now: u64) -> Option<Duration> {
    (reset_epoch > now).then(|| Duration::from_secs(reset_epoch - now + 1))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn format_reset(reset_epoch: u64) -> String {
    Local
        .timestamp_opt(reset_epoch as i64, 0)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| format!("epoch {}", reset_epoch))
}
