//! Shared helpers for the CLI surface
//!
//! Size formatting for entry listings, glob filtering over bundle entry
//! names, and the extraction-path safety check.

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

/// Format a byte count for display
///
/// Bundle entries range from one-line JSON files to multi-megabyte assets,
/// so the unit scales per entry.
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", size)
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

/// Create a glob matcher for filtering bundle entry names
///
/// Entry names are `/`-separated archive paths, so bare convenience forms
/// are expanded to match at any depth: `*.json` becomes `**/*.json`, and
/// plain text without wildcards becomes a substring match (`**/*text*`).
pub fn create_glob_matcher(pattern: &str) -> Result<GlobMatcher> {
    let expanded = if pattern.starts_with("*.") {
        format!("**/{}", pattern)
    } else if !pattern.contains(['*', '?']) {
        format!("**/*{}*", pattern)
    } else {
        pattern.to_string()
    };

    let glob = Glob::new(&expanded).with_context(|| format!("Invalid pattern: {}", pattern))?;
    Ok(glob.compile_matcher())
}

/// Check if an entry name matches the optional filter
pub fn matches_filter(name: &str, matcher: Option<&GlobMatcher>) -> bool {
    matcher.map_or(true, |m| m.is_match(name))
}

/// Check whether an archive entry name stays inside an extraction root
///
/// Entry names come from the archive and are untrusted. Absolute names,
/// Windows drive prefixes, and any `..` component are rejected so a crafted
/// name cannot climb out of the destination directory. Backslashes are
/// treated as separators too: bundle names always use `/`, but a
/// Windows-style name must not smuggle a parent reference past the check.
pub fn is_safe_entry_name(name: &str) -> bool {
    if name.starts_with('/') || name.starts_with('\\') || name.contains(':') {
        return false;
    }
    name.split(['/', '\\']).all(|part| part != "..")
}
