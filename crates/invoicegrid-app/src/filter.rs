// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::InvoiceRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

impl DateBound {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "from",
            Self::End => "to",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn bound(&self, bound: DateBound) -> Option<Date> {
        match bound {
            DateBound::Start => self.start,
            DateBound::End => self.end,
        }
    }

    pub fn set(&mut self, bound: DateBound, value: Option<Date>) {
        match bound {
            DateBound::Start => self.start = value,
            DateBound::End => self.end = value,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both bounds set with the start after the end. Bounds are still applied
    /// independently, so nothing can match.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, date: Date) -> bool {
        let after_start = self.start.is_none_or(|start| date >= start);
        let before_end = self.end.is_none_or(|end| date <= end);
        after_start && before_end
    }
}

/// Only built through `new`/`set_search`, so the needle is always normalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterQuery {
    search: String,
    pub range: DateRange,
}

impl FilterQuery {
    pub fn new(search: &str, range: DateRange) -> Self {
        let mut query = Self {
            search: String::new(),
            range,
        };
        query.set_search(search);
        query
    }

    /// Stores the trimmed, lower-cased form; the raw input is the renderer's concern.
    pub fn set_search(&mut self, raw: &str) {
        self.search = raw.trim().to_lowercase();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.range.is_unbounded()
    }

    pub fn matches(&self, row: &InvoiceRow) -> bool {
        self.matches_text(row) && self.range.contains(row.date)
    }

    fn matches_text(&self, row: &InvoiceRow) -> bool {
        let needle = self.search.as_str();
        if needle.is_empty() {
            return true;
        }

        row.id.to_lowercase().contains(needle)
            || row.name.to_lowercase().contains(needle)
            || row.status.as_str().to_lowercase().contains(needle)
            || row.date_text().contains(needle)
            || row.amount_text().contains(needle)
    }
}

/// Positions of matching rows, in input order.
pub fn visible_indices(rows: &[InvoiceRow], query: &FilterQuery) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| query.matches(row))
        .map(|(index, _)| index)
        .collect()
}

pub fn compute_visible<'a>(rows: &'a [InvoiceRow], query: &FilterQuery) -> Vec<&'a InvoiceRow> {
    rows.iter().filter(|row| query.matches(row)).collect()
}
