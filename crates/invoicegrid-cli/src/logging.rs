// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "INVOICEGRID_LOG";

/// Env directive wins over the configured level; blank env values are ignored.
fn filter_directive(env_value: Option<&str>, configured_level: &str) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => configured_level.to_owned(),
    }
}

/// Sends tracing output to `path`. The terminal belongs to the grid, so nothing
/// is written to stdout or stderr.
pub fn init(path: &Path, configured_level: &str) -> Result<()> {
    let env_value = env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), configured_level);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter {directive:?}; check {LOG_ENV} or [log].level"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    tracing::info!(log = %path.display(), filter = directive.as_str(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::filter_directive;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn env_value_overrides_configured_level() {
        assert_eq!(
            filter_directive(Some("invoicegrid_app=trace"), "info"),
            "invoicegrid_app=trace"
        );
    }

    #[test]
    fn blank_env_value_falls_back_to_config() {
        assert_eq!(filter_directive(Some("  "), "warn"), "warn");
        assert_eq!(filter_directive(None, "debug"), "debug");
    }

    #[test]
    fn configured_levels_are_valid_filters() {
        for level in ["off", "error", "warn", "info", "debug", "trace"] {
            assert!(EnvFilter::try_new(level).is_ok(), "{level}");
        }
    }
}
