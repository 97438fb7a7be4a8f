// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::{InvoiceRow, InvoiceStatus, parse_date};

/// Read-only dataset for one viewing session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowStore {
    rows: Vec<InvoiceRow>,
}

impl RowStore {
    pub fn new(rows: Vec<InvoiceRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[InvoiceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn from_records(records: Vec<RowRecord>) -> Result<Self> {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .into_row()
                    .with_context(|| format!("row {index} is invalid"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let records: Vec<RowRecord> =
            serde_json::from_str(raw).context("decode dataset; expected a JSON array of rows")?;
        Self::from_records(records)
    }
}

/// Wire shape of one dataset row, validated before it enters the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowRecord {
    pub id: String,
    pub name: String,
    pub date: String,
    pub amount: f64,
    pub status: String,
}

impl RowRecord {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("row id is required");
        }
        if !self.amount.is_finite() {
            bail!("row {} amount must be a finite number", self.id);
        }
        if (self.amount * 100.0).abs() > i64::MAX as f64 {
            bail!("row {} amount {} is out of range", self.id, self.amount);
        }
        if InvoiceStatus::parse(&self.status).is_none() {
            bail!(
                "row {} has unknown status {:?}; expected Paid, Unpaid, or PartiallyPaid",
                self.id,
                self.status
            );
        }
        Ok(())
    }

    pub fn into_row(self) -> Result<InvoiceRow> {
        self.validate()?;
        let date = parse_date(&self.date).with_context(|| format!("row {} date", self.id))?;
        let Some(status) = InvoiceStatus::parse(&self.status) else {
            bail!("row {} has unknown status {:?}", self.id, self.status);
        };
        Ok(InvoiceRow {
            amount_cents: (self.amount * 100.0).round() as i64,
            id: self.id,
            name: self.name,
            date,
            status,
        })
    }
}
