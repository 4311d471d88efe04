use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the optional per-root config file.
pub const CONFIG_FILE_NAME: &str = ".contextpack.json";

/// Size and count budgets applied by [`crate::builder::ContextBuilder::build`].
///
/// Sizes are byte lengths, used as a cheap proxy for tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextLimits {
    /// Text bodies longer than this are cut to exactly this many bytes.
    pub max_file_size: usize,
    /// Upper bound on the sum of emitted (post-truncation) body bytes.
    /// A truncated body counts its truncation marker; a binary body counts its placeholder line.
    pub max_total_size: usize,
    /// Upper bound on the number of entries; checked before any rendering.
    pub max_file_count: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_file_size: 100 * 1024,
            max_total_size: 500 * 1024,
            max_file_count: 50,
        }
    }
}

/// Include/exclude glob patterns used when no patterns are given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            include: vec!["*".to_string()],
            exclude: vec![],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: ContextLimits,
    pub selectors: Selectors,
}

pub fn load_config(root: &Path) -> Config {
    let primary = root.join(CONFIG_FILE_NAME);

    let text = std::fs::read_to_string(&primary);
    let Ok(text) = text else { return Config::default() };

    serde_json::from_str::<Config>(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %primary.display(), error = %e, "ignoring malformed config");
        Config::default()
    })
}
