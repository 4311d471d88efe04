use anyhow::{Context, Result};
use clap::Parser;
use contextpack::config::{load_config, Selectors};
use contextpack::{ContextBuilder, FileSelector};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "contextpack")]
#[command(version)]
#[command(about = "Pack working-directory files into one size-bounded context blob")]
struct Cli {
    /// Working directory that patterns and paths are resolved against (default: current dir)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Include glob (repeatable). Overrides the config file's include list.
    #[arg(long, short = 'i', value_name = "PATTERN")]
    include: Vec<String>,

    /// Exclude glob (repeatable). Appended to the config file's exclude list.
    #[arg(long, short = 'x', value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Per-file byte budget; longer text files are truncated
    #[arg(long, value_name = "BYTES")]
    max_file_size: Option<usize>,

    /// Budget for the sum of emitted file bodies
    #[arg(long, value_name = "BYTES")]
    max_total_size: Option<usize>,

    /// Maximum number of files
    #[arg(long, value_name = "N")]
    max_files: Option<usize>,

    /// Write the context to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print a JSON summary instead of the context
    #[arg(long)]
    meta: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CONTEXTPACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let root = match cli.root {
        Some(r) => r,
        None => std::env::current_dir().context("Failed to get current dir")?,
    };

    let mut cfg = load_config(&root);
    if let Some(n) = cli.max_file_size {
        cfg.limits.max_file_size = n;
    }
    if let Some(n) = cli.max_total_size {
        cfg.limits.max_total_size = n;
    }
    if let Some(n) = cli.max_files {
        cfg.limits.max_file_count = n;
    }

    let selectors = Selectors {
        include: if cli.include.is_empty() {
            cfg.selectors.include.clone()
        } else {
            cli.include.clone()
        },
        exclude: cfg
            .selectors
            .exclude
            .iter()
            .chain(cli.exclude.iter())
            .cloned()
            .collect(),
    };

    let paths = FileSelector::from_selectors(&root, &selectors)
        .select()
        .context("Failed to select files")?;
    tracing::debug!(count = paths.len(), "selected files");

    let mut builder = ContextBuilder::new(&root).with_limits(cfg.limits);
    for rel in &paths {
        builder
            .add_file(rel)
            .with_context(|| format!("Failed to add {rel}"))?;
    }

    let context = match builder.build() {
        Ok(c) => c,
        Err(e) if e.is_context_too_large() => {
            anyhow::bail!("{e} (narrow the selection or raise the limits)")
        }
        Err(e) => return Err(e.into()),
    };

    if cli.meta {
        let meta_json = json!({
            "root": root.to_string_lossy(),
            "files": builder.file_count(),
            "rawBytes": builder.total_size(),
            "renderedBytes": context.len(),
            "paths": paths,
            "limits": builder.limits(),
        });
        println!("{}", serde_json::to_string_pretty(&meta_json)?);
        return Ok(());
    }

    if let Some(out) = cli.output.as_ref() {
        std::fs::write(out, &context)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        eprintln!("Wrote {} bytes to {}", context.len(), out.display());
    } else {
        print!("{}", context);
    }

    Ok(())
}
