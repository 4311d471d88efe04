//! Include/exclude glob selection over a working directory.

use crate::config::Selectors;
use crate::error::Result;
use crate::glob_util::{expand, relative_to};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileSelector {
    root: PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl FileSelector {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Seed both pattern lists from config.
    pub fn from_selectors(root: impl AsRef<Path>, selectors: &Selectors) -> Self {
        Self::new(root)
            .include(&selectors.include)
            .exclude(&selectors.exclude)
    }

    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.include
            .extend(patterns.into_iter().map(|p| p.as_ref().to_string()));
        self
    }

    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude
            .extend(patterns.into_iter().map(|p| p.as_ref().to_string()));
        self
    }

    /// Resolve the patterns to root-relative regular files, sorted by path.
    ///
    /// A malformed include pattern fails the whole call; a malformed exclude
    /// pattern matches nothing.
    pub fn select(&self) -> Result<Vec<String>> {
        let mut selected: BTreeSet<String> = BTreeSet::new();

        for pattern in &self.include {
            for abs in expand(&self.root, pattern)? {
                if let Some(rel) = relative_to(&abs, &self.root) {
                    selected.insert(rel);
                }
            }
        }

        for pattern in &self.exclude {
            let matches = match expand(&self.root, pattern) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(pattern = %pattern, error = %e, "ignoring exclude pattern");
                    continue;
                }
            };
            for abs in matches {
                if let Some(rel) = relative_to(&abs, &self.root) {
                    selected.remove(&rel);
                }
            }
        }

        Ok(selected
            .into_iter()
            .filter(|rel| {
                std::fs::metadata(self.root.join(rel))
                    .map(|m| !m.is_dir())
                    .unwrap_or(false)
            })
            .collect())
    }
}
