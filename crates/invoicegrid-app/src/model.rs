// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
    PartiallyPaid,
}

impl InvoiceStatus {
    pub const ALL: [Self; 3] = [Self::Paid, Self::Unpaid, Self::PartiallyPaid];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
            Self::PartiallyPaid => "PartiallyPaid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Paid" => Some(Self::Paid),
            "Unpaid" => Some(Self::Unpaid),
            "PartiallyPaid" => Some(Self::PartiallyPaid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    Id,
    Name,
    Date,
    Amount,
    Status,
}

impl ColumnKey {
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::Name,
        Self::Date,
        Self::Amount,
        Self::Status,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "invoice",
            Self::Name => "client",
            Self::Date => "date",
            Self::Amount => "total",
            Self::Status => "status",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    /// Column keys are a closed set, so an unknown name is an integration bug
    /// and gets rejected instead of ignored.
    pub fn resolve(value: &str) -> Result<Self> {
        Self::parse(value.trim()).ok_or_else(|| {
            anyhow!(
                "unknown column {value:?}; expected one of: {}",
                Self::ALL.map(Self::as_str).join(", ")
            )
        })
    }

    /// Position in `ALL`; variants are declared in display order.
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRow {
    pub id: String,
    pub name: String,
    pub date: Date,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

impl InvoiceRow {
    pub fn date_text(&self) -> String {
        format_date(self.date)
    }

    pub fn amount_text(&self) -> String {
        format_amount(self.amount_cents)
    }

    pub fn cell_text(&self, column: ColumnKey) -> String {
        match column {
            ColumnKey::Id => self.id.clone(),
            ColumnKey::Name => self.name.clone(),
            ColumnKey::Date => self.date_text(),
            ColumnKey::Amount => self.amount_text(),
            ColumnKey::Status => self.status.as_str().to_owned(),
        }
    }
}

/// Canonical `yyyy-mm-dd` form used for display and text search.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_date(raw: &str) -> Result<Date> {
    Date::parse(raw.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date {raw:?}; use yyyy-mm-dd"))
}

/// Fixed-point, two decimals, no thousands separators.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
}
