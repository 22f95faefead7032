// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CANTEEN_LOG";

/// `CANTEEN_LOG` wins over the configured directive.
pub fn filter(configured: &str) -> Result<EnvFilter> {
    if let Ok(raw) = std::env::var(LOG_ENV)
        && !raw.trim().is_empty()
    {
        return EnvFilter::try_new(&raw).with_context(|| format!("parse {LOG_ENV} {raw:?}"));
    }
    EnvFilter::try_new(configured).with_context(|| format!("parse log.level {configured:?}"))
}

/// Installs the global subscriber. The terminal belongs to the TUI, so
/// events are appended to `path` without ANSI colors.
pub fn init(path: &Path, configured: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {} -- if this path is wrong, set [log].file",
                path.display()
            )
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(configured)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}
