//! Shell-style glob expansion rooted at a working directory.

use crate::error::{ContextError, Result};
use glob::MatchOptions;
use std::path::{Component, Path, PathBuf};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Collapse runs of `*` so `**` behaves like `*` and never descends into subdirectories.
fn single_segment_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut prev_star = false;
    for ch in pattern.chars() {
        if ch == '*' {
            if prev_star {
                continue;
            }
            prev_star = true;
        } else {
            prev_star = false;
        }
        out.push(ch);
    }
    out
}

/// Build the absolute pattern, escaping the root so its own metacharacters stay literal.
fn rooted_pattern(root: &Path, pattern: &str) -> String {
    let pattern = single_segment_stars(pattern);
    if Path::new(&pattern).is_absolute() {
        return pattern;
    }

    let root = root.to_string_lossy();
    if root.is_empty() {
        return pattern;
    }
    let root = glob::Pattern::escape(&root);
    if root.ends_with('/') || root.ends_with(std::path::MAIN_SEPARATOR) {
        format!("{root}{pattern}")
    } else {
        format!("{root}/{pattern}")
    }
}

/// Expand `pattern` against `root`.
///
/// A malformed pattern is a hard error. Entries that cannot be read while
/// walking (permission errors, races with deletion) are skipped.
pub fn expand(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let abs_pattern = rooted_pattern(root, pattern);
    let paths = glob::glob_with(&abs_pattern, MATCH_OPTIONS).map_err(|source| {
        ContextError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        }
    })?;

    let mut out = Vec::new();
    for entry in paths {
        match entry {
            Ok(p) => out.push(p),
            Err(e) => tracing::debug!(pattern, error = %e, "skipping unreadable glob entry"),
        }
    }
    Ok(out)
}

/// `path` with every `.` component dropped. The glob crate strips a leading
/// `./` from its results, so roots must be compared in the same form.
fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Root-relative path with `/` separators, or `None` when `path` is not under `root`.
pub fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let path = without_cur_dir(path);
    let root = without_cur_dir(root);
    let rel = path.strip_prefix(&root).ok()?;
    let rel = rel.to_string_lossy().replace('\\', "/");
    if rel.is_empty() {
        return None;
    }
    Some(rel)
}

/// Lexically normalize a caller-supplied relative path, or `None` if it is
/// absolute or climbs above the root through `..`.
pub fn confine(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}
