// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{ColumnKey, InvoiceRow, SortDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: ColumnKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn new(column: ColumnKey, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Next state when sort is activated on `column`: a fresh column starts
    /// ascending, then descending, then unsorted.
    pub fn cycle(current: Option<Self>, column: ColumnKey) -> Option<Self> {
        match current {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Asc => Some(Self::new(column, SortDirection::Desc)),
                SortDirection::Desc => None,
            },
            _ => Some(Self::new(column, SortDirection::Asc)),
        }
    }

    pub fn compare(&self, left: &InvoiceRow, right: &InvoiceRow) -> Ordering {
        let order = compare_column(left, right, self.column);
        match self.direction {
            SortDirection::Asc => order,
            SortDirection::Desc => order.reverse(),
        }
    }
}

fn compare_column(left: &InvoiceRow, right: &InvoiceRow, column: ColumnKey) -> Ordering {
    match column {
        ColumnKey::Id => left.id.cmp(&right.id),
        ColumnKey::Name => left.name.cmp(&right.name),
        ColumnKey::Date => left.date.cmp(&right.date),
        ColumnKey::Amount => left.amount_cents.cmp(&right.amount_cents),
        ColumnKey::Status => left.status.as_str().cmp(right.status.as_str()),
    }
}

/// Stable: rows equal on the key keep their relative order in either direction.
pub fn sort_visible(rows: &mut [&InvoiceRow], spec: SortSpec) {
    rows.sort_by(|left, right| spec.compare(left, right));
}

pub fn sort_indices(rows: &[InvoiceRow], indices: &mut [usize], spec: SortSpec) {
    indices.sort_by(|left, right| spec.compare(&rows[*left], &rows[*right]));
}
