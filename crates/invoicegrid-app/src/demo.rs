// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::macros::date;
use time::{Date, Duration};

use crate::{InvoiceRow, InvoiceStatus, RowStore};

pub const DEFAULT_DEMO_ROWS: usize = 500;
pub const DEFAULT_DEMO_SEED: u64 = 42;

pub const FIRST_DEMO_DATE: Date = date!(2024 - 01 - 01);
pub const LAST_DEMO_DATE: Date = date!(2025 - 12 - 31);

const MIN_AMOUNT_CENTS: i64 = 10_000;
const MAX_AMOUNT_CENTS: i64 = 5_000_000;

const COMPANY_PREFIXES: [&str; 18] = [
    "Elite", "Ascot", "Summit", "Harbor", "Northwind", "Bluebird", "Keystone", "Pioneer",
    "Redwood", "Silverline", "Granite", "Meridian", "Evergreen", "Lakeside", "Ironbridge",
    "Copperfield", "Oakmont", "Brightwater",
];

const COMPANY_CORES: [&str; 12] = [
    "Technologies",
    "Site",
    "Logistics",
    "Consulting",
    "Foods",
    "Analytics",
    "Construction",
    "Media",
    "Energy",
    "Supply",
    "Health",
    "Design",
];

const COMPANY_SUFFIXES: [&str; 8] = [
    "Solutions", "Group", "Inc", "LLC", "Partners", "Co", "Holdings", "Ltd",
];

struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded invoice generator behind the demo dataset. Same seed, same rows.
pub struct InvoiceFaker {
    rng: DeterministicRng,
}

impl InvoiceFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn invoice(&mut self) -> InvoiceRow {
        InvoiceRow {
            id: format!("{:05}", self.int_range_i64(0, 99_999)),
            name: self.company_name(),
            date: self.date_between(FIRST_DEMO_DATE, LAST_DEMO_DATE),
            amount_cents: self.int_range_i64(MIN_AMOUNT_CENTS, MAX_AMOUNT_CENTS),
            status: InvoiceStatus::ALL[self.rng.int_n(InvoiceStatus::ALL.len())],
        }
    }

    pub fn invoices(&mut self, count: usize) -> Vec<InvoiceRow> {
        (0..count).map(|_| self.invoice()).collect()
    }

    pub fn store(&mut self, count: usize) -> RowStore {
        RowStore::new(self.invoices(count))
    }

    pub fn company_name(&mut self) -> String {
        let prefix = self.pick(&COMPANY_PREFIXES);
        let core = self.pick(&COMPANY_CORES);
        if self.rng.bool() {
            format!("{prefix} {core}")
        } else {
            format!("{prefix} {core} {}", self.pick(&COMPANY_SUFFIXES))
        }
    }

    pub fn date_between(&mut self, start: Date, end: Date) -> Date {
        if end <= start {
            return start;
        }
        let span = (end - start).whole_days();
        start + Duration::days(self.int_range_i64(0, span))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn demo_store(rows: usize, seed: u64) -> RowStore {
    InvoiceFaker::new(seed).store(rows)
}
