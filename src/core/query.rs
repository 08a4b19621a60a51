//! Query executor
//!
//! Runs one fully formed query against code search, renders each hit to a
//! fixed five-line block, and reports whether the call itself completed.
//! That completion signal (independent of match count) is what marks a
//! scope value as valid for the cache.

use anyhow::Result;

use crate::core::output::OutputTarget;
use crate::core::{gate, Context};
use crate::github::{ApiError, CodeHit, Resource};

enum Outcome {
    /// The stream was fully consumed; `found` says whether any hit arrived.
    Completed { found: bool },
    /// A throttling signal arrived up front or mid-stream.
    Throttled,
    /// The query was rejected outright (422).
    Rejected,
}

/// Build `"<dork> <filter>:<value>"` and execute it.
///
/// An empty value after trimming short-circuits to `Ok(false)` without
/// touching the network; a blank scope-list line must not turn into an
/// unscoped query.
pub fn with_filter(
    ctx: &mut Context<'_>,
    dork: &str,
    filter_name: &str,
    filter_value: &str,
    out: Option<&OutputTarget>,
) -> Result<bool> {
    let value = filter_value.trim();
    if value.is_empty() {
        return Ok(false);
    }
    let query = format!("{} {}:{}", dork, filter_name, value);
    execute(ctx, &query, out)
}

/// Execute a query, streaming results to stdout and the output file.
///
/// Returns `Ok(true)` when the call completed (even with zero matches),
/// `Ok(false)` when the query was rejected. Throttling gates on the search
/// pool and retries the whole call; a retry re-renders hits already seen,
/// which is accepted.
pub fn execute(ctx: &mut Context<'_>, query: &str, out: Option<&OutputTarget>) -> Result<bool> {
    loop {
        if !ctx.quiet {
            eprintln!("Searching: {}", query);
        }
        match stream_results(ctx, query, out)? {
            Outcome::Completed { found } => {
                if !found {
                    let line = format!("No results for {}", query);
                    if let Some(target) = out {
                        target.append_block(&line)?;
                    }
                    println!("{}", line);
                }
                return Ok(true);
            }
            Outcome::Throttled => gate::await_reset(ctx, Resource::Search)?,
            Outcome::Rejected => return Ok(false),
        }
    }
}

fn stream_results(ctx: &Context<'_>, query: &str, out: Option<&OutputTarget>) -> Result<Outcome> {
    let mut found = false;
    for hit in ctx.session.search_code(query) {
        match hit {
            Ok(hit) => {
                found = true;
                let block = render_hit(query, &hit);
                if let Some(target) = out {
                    target.append_block(&block)?;
                }
                println!("{}", block);
            }
            Err(ApiError::Forbidden) => return Ok(Outcome::Throttled),
            Err(ApiError::Unprocessable(_)) => return Ok(Outcome::Rejected),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(Outcome::Completed { found })
}

fn render_hit(query: &str, hit: &CodeHit) -> String {
    format!(
        "Found result for {}\nText matches: {:?}\nFile path: {}\nScore: {}\nFile URL: {}",
        query,
        hit.fragments(),
        hit.path,
        hit.score,
        hit.url
    )
}
