//! Accumulates file entries and renders them into one size-bounded context blob.
//!
//! Output is a sequence of blocks, one per entry, in insertion order:
//!
//! ```text
//! <file path="src/main.rs">
//! fn main() {}
//! </file>
//!
//! ```

use crate::classify::{detect_mime, is_binary};
use crate::config::ContextLimits;
use crate::error::{Budget, ContextError, Result};
use crate::glob_util::{confine, expand, relative_to};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Appended verbatim after a text body cut at `max_file_size`.
pub const TRUNCATION_MARKER: &str = "\n\n[... truncated ...]";

#[derive(Debug, Clone)]
struct ContextFile {
    path: String,
    content: Vec<u8>,
    /// Fixed at insertion time.
    binary: bool,
}

impl ContextFile {
    fn new(path: String, content: Vec<u8>) -> Self {
        let binary = is_binary(&content);
        Self {
            path,
            content,
            binary,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContextBuilder {
    root: PathBuf,
    limits: ContextLimits,
    files: Vec<ContextFile>,
}

impl ContextBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            limits: ContextLimits::default(),
            files: Vec::new(),
        }
    }

    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace all three budgets at once. Existing entries keep their binary classification.
    pub fn set_limits(&mut self, limits: ContextLimits) {
        self.limits = limits;
    }

    pub fn limits(&self) -> ContextLimits {
        self.limits
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read `path` (relative to the root) from disk and append it.
    ///
    /// Absolute paths and paths that climb out of the root through `..` are
    /// rejected with [`ContextError::Stat`].
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let Some(rel_path) = confine(path) else {
            return Err(ContextError::Stat {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path is outside the working directory",
                ),
            });
        };
        let resolved = self.root.join(&rel_path);

        let meta = std::fs::metadata(&resolved).map_err(|source| ContextError::Stat {
            path: resolved.clone(),
            source,
        })?;
        if meta.is_dir() {
            return Err(ContextError::IsDirectory { path: resolved });
        }

        let content = std::fs::read(&resolved).map_err(|source| ContextError::Read {
            path: resolved.clone(),
            source,
        })?;

        let rel = rel_path.to_string_lossy().replace('\\', "/");
        self.files.push(ContextFile::new(rel, content));
        Ok(())
    }

    /// Append every regular file matching `pattern`.
    ///
    /// Only a malformed pattern is an error. Matches that vanish, cannot be
    /// read, or are directories are skipped. Returns the number of entries added.
    pub fn add_glob(&mut self, pattern: &str) -> Result<usize> {
        let matches = expand(&self.root, pattern)?;

        let mut added = 0;
        for abs in matches {
            let Some(rel) = relative_to(&abs, &self.root) else {
                tracing::debug!(path = %abs.display(), "skipping match outside root");
                continue;
            };

            match std::fs::metadata(&abs) {
                Ok(m) if m.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(path = %rel, error = %e, "skipping unstattable match");
                    continue;
                }
            }

            match self.add_file(&rel) {
                Ok(()) => added += 1,
                Err(e) => tracing::debug!(path = %rel, error = %e, "skipping unreadable match"),
            }
        }
        Ok(added)
    }

    /// Append caller-supplied bytes under a virtual path. No filesystem access.
    pub fn add_content(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.push(ContextFile::new(path.into(), content.into()));
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Sum of raw, pre-truncation content lengths.
    ///
    /// Not a predictor of [`Self::build`] success: the total-size budget is
    /// checked against emitted bytes after truncation and placeholder substitution.
    pub fn total_size(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Render all entries. Either every entry fits or nothing is returned.
    pub fn build(&self) -> Result<String> {
        let bytes = self.build_bytes()?;
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }

    /// Like [`Self::build`], but returns the exact rendered bytes without UTF-8 repair.
    pub fn build_bytes(&self) -> Result<Vec<u8>> {
        let limits = &self.limits;
        if self.files.len() > limits.max_file_count {
            return Err(ContextError::ContextTooLarge {
                budget: Budget::Files,
                actual: self.files.len(),
                limit: limits.max_file_count,
            });
        }

        let mut out = Vec::new();
        let mut total: usize = 0;
        for file in &self.files {
            let body = render_body(file, limits.max_file_size);

            total = total.saturating_add(body.len());
            if total > limits.max_total_size {
                return Err(ContextError::ContextTooLarge {
                    budget: Budget::Bytes,
                    actual: total,
                    limit: limits.max_total_size,
                });
            }

            write_block(&mut out, &file.path, &body);
        }

        tracing::debug!(files = self.files.len(), bytes = total, "built context");
        Ok(out)
    }
}

fn render_body(file: &ContextFile, max_file_size: usize) -> Cow<'_, [u8]> {
    if file.binary {
        let placeholder = format!(
            "[Binary file: {} bytes, type: {}]",
            file.content.len(),
            detect_mime(&file.content)
        );
        return Cow::Owned(placeholder.into_bytes());
    }

    if file.content.len() <= max_file_size {
        return Cow::Borrowed(&file.content[..]);
    }

    let mut cut = Vec::with_capacity(max_file_size + TRUNCATION_MARKER.len());
    cut.extend_from_slice(&file.content[..max_file_size]);
    cut.extend_from_slice(TRUNCATION_MARKER.as_bytes());
    Cow::Owned(cut)
}

fn write_block(out: &mut Vec<u8>, path: &str, body: &[u8]) {
    out.extend_from_slice(b"<file path=");
    out.extend_from_slice(quote_path(path).as_bytes());
    out.extend_from_slice(b">\n");
    out.extend_from_slice(body);
    if !body.ends_with(b"\n") {
        out.push(b'\n');
    }
    out.extend_from_slice(b"</file>\n\n");
}

/// Double-quoted, with quotes, backslashes and control characters escaped.
fn quote_path(path: &str) -> String {
    serde_json::to_string(path).unwrap_or_else(|_| format!("\"{}\"", path.escape_default()))
}
