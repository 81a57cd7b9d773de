//! Inventory rule evaluation

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::config::AlertThresholds;
use crate::models::{InventoryTable, MatchedSubset, DAYS_IDLE_COLUMN};

/// Source of "today" for date-based rules
pub trait Clock: Send + Sync {
    /// Current calendar date
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Records whose expiration date is at most `threshold_days` after `today`.
///
/// Already-expired records match. Records without a date never match.
pub fn expiring_soon(table: &InventoryTable, threshold_days: i64, today: NaiveDate) -> MatchedSubset<'_> {
    let records = table
        .records()
        .iter()
        .filter(|r| {
            r.expiration_date
                .is_some_and(|d| d.signed_duration_since(today).num_days() <= threshold_days)
        })
        .collect();
    MatchedSubset::new(table.columns(), records)
}

/// Records idle for at least `threshold_days`.
///
/// A table without a `days_idle` column yields no matches; so do records
/// whose idle count is missing or non-numeric. Fractional counts compare as-is.
#[allow(clippy::cast_precision_loss)]
pub fn idle_stock(table: &InventoryTable, threshold_days: i64) -> MatchedSubset<'_> {
    if !table.has_column(DAYS_IDLE_COLUMN) {
        debug!("Inventory has no {DAYS_IDLE_COLUMN} column, idle rule skipped");
        return MatchedSubset::none(table);
    }

    let threshold = threshold_days as f64;
    let records = table
        .records()
        .iter()
        .filter(|r| r.days_idle.is_some_and(|d| d >= threshold))
        .collect();
    MatchedSubset::new(table.columns(), records)
}

/// Matches of both rules over one snapshot
#[derive(Debug, Clone)]
pub struct Evaluation<'a> {
    /// Expiration-proximity matches
    pub expiring: MatchedSubset<'a>,
    /// Stalled-inventory matches
    pub idle: MatchedSubset<'a>,
}

/// Applies both inventory rules with fixed thresholds
#[derive(Clone)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
    clock: Arc<dyn Clock>,
}

impl AlertEvaluator {
    /// Create an evaluator using the system clock
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self::with_clock(thresholds, Arc::new(SystemClock))
    }

    /// Create an evaluator with an injected clock
    pub fn with_clock(thresholds: AlertThresholds, clock: Arc<dyn Clock>) -> Self {
        Self { thresholds, clock }
    }

    /// Thresholds in effect
    pub fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    /// Run both rules against the same snapshot
    pub fn evaluate<'a>(&self, table: &'a InventoryTable) -> Evaluation<'a> {
        let today = self.clock.today();
        let expiring = expiring_soon(table, self.thresholds.expiration_days, today);
        let idle = idle_stock(table, self.thresholds.idle_days);

        debug!(
            rows = table.len(),
            %today,
            expiration_days = self.thresholds.expiration_days,
            idle_days = self.thresholds.idle_days,
            expiring = expiring.len(),
            idle = idle.len(),
            "Evaluated inventory rules"
        );

        Evaluation { expiring, idle }
    }
}
