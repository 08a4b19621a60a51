//! Scope iterator
//!
//! The driver that crosses every dork with the configured scope source,
//! probing existence where it pays off and building the valid-items cache
//! as confirmed values are discovered.

use anyhow::{Context as _, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::output::{self, OutputNamer, OutputTarget};
use crate::core::probe::{self, ProbeKind};
use crate::core::{dorks, query, Context};

/// What a scope filter restricts the search to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    User,
    Org,
    Repo,
}

impl ScopeKind {
    /// The qualifier used in the query string, e.g. `user:alice`.
    pub fn filter_name(&self) -> &'static str {
        match self {
            ScopeKind::User => "user",
            ScopeKind::Org => "org",
            ScopeKind::Repo => "repo",
        }
    }

    /// Repos are never probed; their existence is implicitly validated by
    /// the search call itself.
    fn probe_kind(&self) -> Option<ProbeKind> {
        match self {
            ScopeKind::User => Some(ProbeKind::User),
            ScopeKind::Org => Some(ProbeKind::Org),
            ScopeKind::Repo => None,
        }
    }
}

/// Where scope values come from.
#[derive(Debug, Clone)]
pub enum ScopeSource {
    /// One literal value from the command line.
    Single(String),
    /// A newline-delimited file of raw values.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub source: ScopeSource,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dorks_file: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub scope: Option<Scope>,
    pub valid_items_file: Option<PathBuf>,
}

/// Apply every dork to the configured scope.
pub fn run(ctx: &mut Context<'_>, config: &RunConfig) -> Result<()> {
    let dorks = dorks::read_dorks(&config.dorks_file)?;
    let mut namer = config.output_dir.as_ref().map(|dir| OutputNamer::new(dir));

    for dork in &dorks {
        if !ctx.quiet {
            eprintln!("{}", dork.bold());
        }

        let out = match (&config.output_dir, namer.as_mut()) {
            (Some(dir), Some(namer)) => Some(OutputTarget::new(dir, namer.name_for(dork))),
            _ => None,
        };

        apply_dork(ctx, config, dork, out.as_ref())?;
    }
    Ok(())
}

fn apply_dork(
    ctx: &mut Context<'_>,
    config: &RunConfig,
    dork: &str,
    out: Option<&OutputTarget>,
) -> Result<()> {
    let Some(scope) = &config.scope else {
        // no scope configured; nothing to search against
        return Ok(());
    };
    let filter = scope.kind.filter_name();
    match &scope.source {
        ScopeSource::Single(value) => {
            query::with_filter(ctx, dork, filter, value, out)?;
        }
        ScopeSource::File(list) => search_file_scope(
            ctx,
            scope.kind,
            list,
            dork,
            out,
            config.valid_items_file.as_deref(),
        )?,
    }
    Ok(())
}

/// One dork against a file-backed scope list, under one of three regimes:
/// no cache requested, cache file present (trusted, no probing), or cache
/// requested but absent (probe, search, append confirmed values).
fn search_file_scope(
    ctx: &mut Context<'_>,
    kind: ScopeKind,
    list: &Path,
    dork: &str,
    out: Option<&OutputTarget>,
    valid_items: Option<&Path>,
) -> Result<()> {
    let filter = kind.filter_name();
    let probe_kind = kind.probe_kind();

    match valid_items {
        None => {
            for line in read_scope_lines(list)? {
                if !probe_ok(ctx, probe_kind, &line)? {
                    continue;
                }
                query::with_filter(ctx, dork, filter, &line, out)?;
            }
        }
        Some(cache) if cache.exists() => {
            // the cache is authoritative: its values were confirmed valid,
            // so no existence probing at all
            for line in read_scope_lines(cache)? {
                query::with_filter(ctx, dork, filter, &line, out)?;
            }
        }
        Some(cache) => {
            for line in read_scope_lines(list)? {
                if !probe_ok(ctx, probe_kind, &line)? {
                    continue;
                }
                // a completed search call (match or not) confirms the value;
                // append the raw line immediately so an interrupted run
                // keeps everything confirmed so far
                if query::with_filter(ctx, dork, filter, &line, out)? {
                    output::append_raw_line(cache, &line)?;
                }
            }
        }
    }
    Ok(())
}

fn probe_ok(ctx: &mut Context<'_>, kind: Option<ProbeKind>, name: &str) -> Result<bool> {
    match kind {
        Some(kind) => probe::exists(ctx, kind, name),
        None => Ok(true),
    }
}

/// Raw lines of a scope list file. Values are trimmed at use, not at read.
fn read_scope_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scope list file: {}", path.display()))?;
    Ok(content.lines().map(String::from).collect())
}
