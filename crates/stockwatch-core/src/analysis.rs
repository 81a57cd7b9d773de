//! Sales aggregation

use chrono::NaiveDateTime;
use tracing::debug;

use crate::models::{MonthlyRevenue, TransactionRecord};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sum revenue per calendar month.
///
/// Lines whose timestamp is not `YYYY-MM-DD HH:MM:SS`, or that lack a
/// quantity or unit price, are skipped.
pub fn monthly_revenue(transactions: &[TransactionRecord]) -> MonthlyRevenue {
    let mut series = MonthlyRevenue::new();
    let mut skipped = 0usize;

    for tx in transactions {
        let Ok(at) = NaiveDateTime::parse_from_str(tx.timestamp.trim(), TIMESTAMP_FORMAT) else {
            skipped += 1;
            continue;
        };
        let Some(revenue) = tx.revenue() else {
            skipped += 1;
            continue;
        };

        *series.entry(at.format("%Y-%m").to_string()).or_insert(0.0) += revenue;
    }

    debug!(
        months = series.len(),
        skipped,
        total = transactions.len(),
        "Aggregated monthly revenue"
    );

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tx(id: &str, ts: &str, qty: Option<f64>, price: Option<f64>) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            timestamp: ts.to_string(),
            product: "Milk".to_string(),
            quantity: qty,
            unit_price: price,
        }
    }

    #[test]
    fn groups_by_month_in_ascending_order() {
        let series = monthly_revenue(&[
            tx("1", "2024-03-01 09:00:00", Some(1.0), Some(10.0)),
            tx("2", "2024-01-15 12:00:00", Some(2.0), Some(2.5)),
            tx("3", "2024-01-31 23:59:59", Some(1.0), Some(5.0)),
        ]);

        let months: Vec<_> = series.iter().map(|(m, v)| (m.as_str(), *v)).collect();
        assert_eq!(months, vec![("2024-01", 10.0), ("2024-03", 10.0)]);
    }

    #[test]
    fn skips_unparsable_timestamps_and_missing_factors() {
        let series = monthly_revenue(&[
            tx("1", "2024-02-01", Some(1.0), Some(10.0)),
            tx("2", "yesterday", Some(1.0), Some(10.0)),
            tx("3", "2024-02-02 10:00:00", None, Some(10.0)),
            tx("4", "2024-02-03 10:00:00", Some(3.0), None),
            tx("5", "2024-02-04 10:00:00", Some(3.0), Some(1.5)),
        ]);

        assert_eq!(series.len(), 1);
        assert_eq!(series["2024-02"], 4.5);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(monthly_revenue(&[]).is_empty());
        assert!(monthly_revenue(&[tx("1", "bad", Some(1.0), Some(1.0))]).is_empty());
    }
}
