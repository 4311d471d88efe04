//! Bounded, deterministic aggregation of working-directory files into a single
//! text blob for downstream consumers such as LLM prompts.
//!
//! [`selector::FileSelector`] turns include/exclude globs into a sorted list of
//! paths; [`builder::ContextBuilder`] reads them and renders `<file>` blocks
//! under per-file, total-size and file-count budgets.

pub mod builder;
pub mod classify;
pub mod config;
pub mod error;
pub mod glob_util;
pub mod selector;

pub use builder::ContextBuilder;
pub use config::{Config, ContextLimits, Selectors};
pub use error::{Budget, ContextError, Result};
pub use selector::FileSelector;
