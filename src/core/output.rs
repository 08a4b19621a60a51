//! Result file naming and append-mode writers
//!
//! One text file per dork. Names are the dork string reduced to a
//! filesystem-safe form; collisions get a numeric increment. Files are
//! opened in append mode per write so an interrupted run keeps everything
//! written so far.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

static SANITIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9 _]+").expect("Invalid SANITIZE_RE regex"));

/// Derives a collision-free `.txt` file name per dork.
///
/// Collisions are checked against files already present in the output
/// directory and against names issued earlier in the same run, so repeated
/// identical dorks get distinct files even before the first write lands.
pub struct OutputNamer {
    dir: PathBuf,
    issued: HashSet<String>,
}

impl OutputNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            issued: HashSet::new(),
        }
    }

    pub fn name_for(&mut self, dork: &str) -> String {
        let base = SANITIZE_RE.replace_all(dork, "").replace(' ', "_");
        let mut candidate = format!("{}.txt", base);
        let mut increment = 0;
        while self.dir.join(&candidate).exists() || self.issued.contains(&candidate) {
            increment += 1;
            candidate = format!("{}_{}.txt", base, increment);
        }
        self.issued.insert(candidate.clone());
        candidate
    }
}

/// A per-dork result file inside the output directory.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    dir: PathBuf,
    filename: String,
}

impl OutputTarget {
    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    /// Append a formatted block plus a blank separator line.
    pub fn append_block(&self, text: &str) -> Result<()> {
        let path = self.path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open output file: {}", path.display()))?;
        write!(file, "{}\n\n", text)?;
        Ok(())
    }
}

/// Append one raw line to a flat list file, creating it if needed.
///
/// Used for the valid-items cache: the line is written exactly as it
/// appeared in the source list, untrimmed.
pub fn append_raw_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open valid items file: {}", path.display()))?;
    writeln!(file, "{}", line)?;
    Ok(())
}
