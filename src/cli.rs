//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::core::runner::{self, RunConfig, Scope, ScopeKind, ScopeSource};
use crate::core::Context;
use crate::github::{Credentials, GithubClient};

/// ghdork - sweep GitHub code search with dork query templates.
#[derive(Parser, Debug)]
#[command(name = "ghdork")]
#[command(
    author,
    version,
    about,
    long_about = r#"ghdork applies every dork in a file to GitHub code search, scoped to a
user, org or repo, or to newline-delimited lists of users or orgs.

Dork files are plain text: one query template per line; blank lines and
lines starting with '#' or ';' are comments.

Results are printed to stdout and, with --output-dir, appended to one text
file per dork. With --valid-items-file, users/orgs confirmed to exist are
persisted as they are discovered, and later dorks (or later runs reusing
the file as input) skip the existence checks entirely.

Credentials come from flags or the environment (GH_TOKEN, GH_USER, GH_PASS,
GH_URL). Unauthenticated runs work but hit a much lower rate limit.

Examples:
    ghdork -d dorks.txt -u molly
    ghdork -d dorks.txt --orgs-file orgs.txt -o results
    ghdork -d dorks.txt --users-file users.txt --valid-items-file valid.txt
    ghdork -d dorks.txt -r molly/projectname
"#
)]
pub struct Cli {
    /// Text file containing dorks, separated by newline.
    #[arg(short = 'd', long = "dorks", value_name = "FILE")]
    pub dorks_file: PathBuf,

    /// Directory for per-dork result files.
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        long_help = "Directory for storing results, one text file per dork.\n\n\
The directory is created if missing. If it already exists, any files in it\n\
are removed first."
    )]
    pub output_dir: Option<PathBuf>,

    /// Persist confirmed-valid users/orgs to this file.
    #[arg(
        long,
        value_name = "FILE",
        long_help = "Persist users or orgs confirmed to exist to this file, as they are\n\
discovered. After the first dork the file is used as the scope list and\n\
existence checks are skipped entirely, which saves a large number of API\n\
calls for lists that contain stale names. The file can also be reused as a\n\
users/orgs input file for later runs.\n\n\
A pre-existing file with this name is deleted at startup so each run builds\n\
it fresh."
    )]
    pub valid_items_file: Option<PathBuf>,

    /// GitHub user to search.
    #[arg(short = 'u', long, group = "scope", value_name = "LOGIN")]
    pub user: Option<String>,

    /// Text file containing usernames to search, separated by newline.
    #[arg(long, group = "scope", value_name = "FILE")]
    pub users_file: Option<PathBuf>,

    /// GitHub organization to search.
    #[arg(long, group = "scope", value_name = "LOGIN")]
    pub org: Option<String>,

    /// Text file containing orgs to search, separated by newline.
    #[arg(long, group = "scope", value_name = "FILE")]
    pub orgs_file: Option<PathBuf>,

    /// GitHub repo to search, e.g. molly/projectname.
    #[arg(short = 'r', long, group = "scope", value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Personal access token.
    #[arg(long, env = "GH_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Username for basic authentication.
    #[arg(long, env = "GH_USER", value_name = "LOGIN")]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[arg(long, env = "GH_PASS", hide_env_values = true, value_name = "PASS")]
    pub password: Option<String>,

    /// GitHub Enterprise API base URL.
    #[arg(long, env = "GH_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (suppress per-dork and per-query status lines).
    #[arg(
        short,
        long,
        long_help = "Suppress non-essential stderr output (dork echo and 'Searching:' lines).\n\
Result blocks on stdout and rate-limit/not-found notices are still printed."
    )]
    pub quiet: bool,
}

impl Cli {
    /// The single configured scope, resolved in priority order:
    /// user, users-file, org, orgs-file, repo.
    fn scope(&self) -> Option<Scope> {
        if let Some(user) = &self.user {
            return Some(Scope {
                kind: ScopeKind::User,
                source: ScopeSource::Single(user.clone()),
            });
        }
        if let Some(path) = &self.users_file {
            return Some(Scope {
                kind: ScopeKind::User,
                source: ScopeSource::File(path.clone()),
            });
        }
        if let Some(org) = &self.org {
            return Some(Scope {
                kind: ScopeKind::Org,
                source: ScopeSource::Single(org.clone()),
            });
        }
        if let Some(path) = &self.orgs_file {
            return Some(Scope {
                kind: ScopeKind::Org,
                source: ScopeSource::File(path.clone()),
            });
        }
        self.repo.as_ref().map(|repo| Scope {
            kind: ScopeKind::Repo,
            source: ScopeSource::Single(repo.clone()),
        })
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    if !cli.dorks_file.is_file() {
        bail!("Dorks file does not exist: {}", cli.dorks_file.display());
    }

    if let Some(dir) = &cli.output_dir {
        prepare_output_dir(dir)?;
    }

    if let Some(path) = &cli.valid_items_file {
        if path.exists() {
            fs::remove_file(path).with_context(|| {
                format!("Failed to reset valid items file: {}", path.display())
            })?;
        }
    }

    let credentials = Credentials::from_parts(
        cli.token.clone(),
        cli.username.clone(),
        cli.password.clone(),
    );
    let client = GithubClient::login(&credentials, cli.base_url.as_deref())
        .context("Failed to construct GitHub client")?;

    match client.me() {
        Ok(me) => eprintln!(
            "{}",
            format!("Successfully authenticated as {}.", me.login).green()
        ),
        Err(_) => eprintln!(
            "{}",
            "Login failed. Proceeding as unauthenticated user, with low rate limit.".yellow()
        ),
    }

    let config = RunConfig {
        dorks_file: cli.dorks_file.clone(),
        output_dir: cli.output_dir.clone(),
        scope: cli.scope(),
        valid_items_file: cli.valid_items_file.clone(),
    };

    let mut ctx = Context::new(&client, cli.quiet);
    runner::run(&mut ctx, &config)
}

/// Create the output directory if missing; clear its files if it exists.
fn prepare_output_dir(dir: &std::path::Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        return Ok(());
    }
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read output directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to clear output file: {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_scope_priority_user_first() {
        let cli = parse(&["ghdork", "-d", "dorks.txt", "-u", "molly"]);
        let scope = cli.scope().unwrap();
        assert_eq!(scope.kind, ScopeKind::User);
        assert!(matches!(scope.source, ScopeSource::Single(v) if v == "molly"));
    }

    #[test]
    fn test_scope_repo() {
        let cli = parse(&["ghdork", "-d", "dorks.txt", "-r", "molly/projectname"]);
        let scope = cli.scope().unwrap();
        assert_eq!(scope.kind, ScopeKind::Repo);
    }

    #[test]
    fn test_scope_files() {
        let cli = parse(&["ghdork", "-d", "dorks.txt", "--orgs-file", "orgs.txt"]);
        let scope = cli.scope().unwrap();
        assert_eq!(scope.kind, ScopeKind::Org);
        assert!(matches!(scope.source, ScopeSource::File(_)));
    }

    #[test]
    fn test_no_scope_is_allowed() {
        let cli = parse(&["ghdork", "-d", "dorks.txt"]);
        assert!(cli.scope().is_none());
    }

    #[test]
    fn test_scope_options_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["ghdork", "-d", "dorks.txt", "-u", "a", "--org", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dorks_file_is_required() {
        let result = Cli::try_parse_from(["ghdork", "-u", "molly"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_prepare_output_dir_creates_and_clears() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("results");

        prepare_output_dir(&dir).unwrap();
        assert!(dir.is_dir());

        fs::write(dir.join("stale.txt"), "old").unwrap();
        prepare_output_dir(&dir).unwrap();
        assert!(!dir.join("stale.txt").exists());
    }
}
