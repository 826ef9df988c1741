// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// File-backed tracing init. The terminal is owned by the TUI, so log
/// records go to a file beside the database. Filter via `CASOVISTA_LOG`
/// (same syntax as `RUST_LOG`), default `info`.
pub fn init(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_env("CASOVISTA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init keeps the already-installed subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
