// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use invoicegrid_app::{InvoiceRow, InvoiceStatus, RowStore};
use std::path::PathBuf;
use time::{Date, Month};

pub fn calendar_date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid calendar date")
}

pub fn invoice(
    id: &str,
    name: &str,
    date: Date,
    amount_cents: i64,
    status: InvoiceStatus,
) -> InvoiceRow {
    InvoiceRow {
        id: id.to_owned(),
        name: name.to_owned(),
        date,
        amount_cents,
        status,
    }
}

/// The two-row dataset used by the acceptance scenarios.
pub fn scenario_rows() -> Vec<InvoiceRow> {
    vec![
        invoice(
            "001",
            "Acme",
            calendar_date(2025, Month::January, 10),
            10_000,
            InvoiceStatus::Paid,
        ),
        invoice(
            "002",
            "Beta",
            calendar_date(2025, Month::February, 15),
            25_050,
            InvoiceStatus::Unpaid,
        ),
    ]
}

pub fn scenario_store() -> RowStore {
    RowStore::new(scenario_rows())
}

/// Hand-entered invoices dated 2026, after the generated demo range. Used as a
/// data-file fixture.
pub fn sample_rows() -> Vec<InvoiceRow> {
    vec![
        invoice(
            "18809",
            "Elite Technologies",
            calendar_date(2026, Month::February, 1),
            152_055,
            InvoiceStatus::Unpaid,
        ),
        invoice(
            "18810",
            "Elite Technologies",
            calendar_date(2026, Month::February, 2),
            98_000,
            InvoiceStatus::Paid,
        ),
        invoice(
            "32561",
            "Ascot Site Solutions",
            calendar_date(2026, Month::January, 28),
            420_000,
            InvoiceStatus::PartiallyPaid,
        ),
    ]
}

pub fn rows_to_json(rows: &[InvoiceRow]) -> String {
    let records = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "id": row.id,
                "name": row.name,
                "date": row.date_text(),
                "amount": row.amount_cents as f64 / 100.0,
                "status": row.status.as_str(),
            })
        })
        .collect::<Vec<_>>();
    serde_json::Value::Array(records).to_string()
}

pub fn temp_data_path(rows: &[InvoiceRow]) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("invoices.json");
    std::fs::write(&path, rows_to_json(rows))
        .with_context(|| format!("write dataset {}", path.display()))?;
    Ok((dir, path))
}

#[cfg(test)]
mod tests {
    use super::{rows_to_json, sample_rows, scenario_rows};
    use anyhow::Result;
    use invoicegrid_app::{LAST_DEMO_DATE, RowStore};

    #[test]
    fn json_export_loads_back_into_store() -> Result<()> {
        let rows = scenario_rows();
        let store = RowStore::from_json(&rows_to_json(&rows))?;
        assert_eq!(store.rows(), rows.as_slice());
        Ok(())
    }

    #[test]
    fn sample_rows_fall_after_demo_range() {
        let rows = sample_rows();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.date > LAST_DEMO_DATE));
    }
}
