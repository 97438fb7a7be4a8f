// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use invoicegrid_app::{
    ColumnKey, DEFAULT_DEMO_ROWS, DEFAULT_DEMO_SEED, SortDirection, SortSpec,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "invoicegrid";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub path: Option<String>,
    pub demo_rows: Option<i64>,
    pub demo_seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub sort_column: Option<String>,
    pub sort_direction: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("INVOICEGRID_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set INVOICEGRID_CONFIG_PATH to the config file"
            )
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [data], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(data_path) = &self.data.path
            && data_path.trim().is_empty()
        {
            bail!(
                "data.path in {} is empty; remove it or point it at a JSON file",
                path.display()
            );
        }

        if let Some(rows) = self.data.demo_rows
            && rows <= 0
        {
            bail!(
                "data.demo_rows in {} must be positive, got {}",
                path.display(),
                rows
            );
        }

        if let Some(column) = &self.ui.sort_column {
            ColumnKey::resolve(column)
                .with_context(|| format!("ui.sort_column in {}", path.display()))?;
        }

        if let Some(direction) = &self.ui.sort_direction
            && SortDirection::parse(direction).is_none()
        {
            bail!(
                "ui.sort_direction in {} must be asc or desc, got {:?}",
                path.display(),
                direction
            );
        }

        if self.ui.sort_direction.is_some() && self.ui.sort_column.is_none() {
            bail!(
                "ui.sort_direction in {} needs ui.sort_column",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {:?}",
                path.display(),
                LOG_LEVELS.join(", "),
                level
            );
        }

        Ok(())
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.data.path.as_deref().map(PathBuf::from)
    }

    pub fn demo_rows(&self) -> usize {
        self.data
            .demo_rows
            .and_then(|rows| usize::try_from(rows).ok())
            .unwrap_or(DEFAULT_DEMO_ROWS)
    }

    pub fn demo_seed(&self) -> u64 {
        self.data.demo_seed.unwrap_or(DEFAULT_DEMO_SEED)
    }

    /// Initial sort; direction defaults to ascending when only a column is given.
    pub fn initial_sort(&self) -> Result<Option<SortSpec>> {
        let Some(column) = &self.ui.sort_column else {
            return Ok(None);
        };
        let column = ColumnKey::resolve(column)?;
        let direction = match &self.ui.sort_direction {
            Some(raw) => SortDirection::parse(raw)
                .ok_or_else(|| anyhow!("invalid sort direction {raw:?}; use asc or desc"))?,
            None => SortDirection::Asc,
        };
        Ok(Some(SortSpec::new(column, direction)))
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let state_root = dirs::state_dir()
            .or_else(dirs::cache_dir)
            .ok_or_else(|| anyhow!("cannot resolve a log directory; set [log].file"))?;
        Ok(state_root.join(APP_NAME).join("invoicegrid.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# invoicegrid config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. JSON array of invoices; without it a generated demo set is shown.\n# path = \"/absolute/path/to/invoices.json\"\ndemo_rows = {}\ndemo_seed = {}\n\n[ui]\n# One of: id, name, date, amount, status\n# sort_column = \"date\"\n# sort_direction = \"asc\"\n\n[log]\n# One of: off, error, warn, info, debug, trace. INVOICEGRID_LOG overrides.\nlevel = \"{}\"\n# file = \"/absolute/path/to/invoicegrid.log\"\n",
            path.display(),
            DEFAULT_DEMO_ROWS,
            DEFAULT_DEMO_SEED,
            DEFAULT_LOG_LEVEL,
        )
    }
}
