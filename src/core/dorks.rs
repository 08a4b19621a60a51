//! Dork source file reading
//!
//! Dorks are newline-delimited query templates. Blank lines and lines whose
//! first non-whitespace character is `#` or `;` are comments.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read the dorks file, dropping comments and blank lines.
///
/// Each returned dork is trimmed of surrounding whitespace.
pub fn read_dorks(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dorks file: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| is_dork(line))
        .map(String::from)
        .collect())
}

fn is_dork(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#') && !line.starts_with(';')
}
