// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ColumnKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightColor {
    Warning,
    Success,
    Danger,
}

impl HighlightColor {
    pub const ALL: [Self; 3] = [Self::Warning, Self::Success, Self::Danger];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Warning => "yellow",
            Self::Success => "green",
            Self::Danger => "red",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Warning => (0xff, 0xf3, 0xcd),
            Self::Success => (0xd4, 0xed, 0xda),
            Self::Danger => (0xf8, 0xd7, 0xda),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "warning" => Some(Self::Warning),
            "success" => Some(Self::Success),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }

    pub fn resolve(value: &str) -> Result<Self> {
        Self::parse(value.trim()).ok_or_else(|| {
            anyhow!("unknown highlight color {value:?}; expected warning, success, or danger")
        })
    }
}

/// Per-column annotation. Independent of filtering and sorting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightState {
    colors: BTreeMap<ColumnKey, HighlightColor>,
}

impl HighlightState {
    pub fn set(&mut self, column: ColumnKey, color: HighlightColor) {
        self.colors.insert(column, color);
    }

    /// Returns whether an entry was removed.
    pub fn clear(&mut self, column: ColumnKey) -> bool {
        self.colors.remove(&column).is_some()
    }

    pub fn color_of(&self, column: ColumnKey) -> Option<HighlightColor> {
        self.colors.get(&column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnKey, HighlightColor)> + '_ {
        self.colors.iter().map(|(column, color)| (*column, *color))
    }
}
