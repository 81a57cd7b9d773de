//! Record sources
//!
//! Load CSV snapshots into in-memory tables. Loaders return an explicit
//! [`LoadError`]; callers decide how to degrade (the alert pipeline treats a
//! failed load as an empty snapshot).

mod inventory;
mod transactions;

pub use inventory::{load_inventory, parse_date, read_inventory};
pub use transactions::{load_transactions, read_transactions};

use thiserror::Error;

/// Reasons a snapshot could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not well-formed CSV or not valid UTF-8
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns are absent from the header
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns {
        /// Absent column names
        missing: Vec<String>,
    },
}

/// Locate every `required` column in `headers`, reporting all absent ones.
fn require_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<Vec<usize>, LoadError> {
    let mut idxs = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match headers.iter().position(|h| h == *name) {
            Some(idx) => idxs.push(idx),
            None => missing.push((*name).to_string()),
        }
    }

    if missing.is_empty() {
        Ok(idxs)
    } else {
        Err(LoadError::MissingColumns { missing })
    }
}

/// Parse an integer cell; integral floats such as `12.0` are accepted.
fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Some(42))]
    #[case(" -3 ", Some(-3))]
    #[case("12.0", Some(12))]
    #[case("12.5", None)]
    #[case("abc", None)]
    #[case("", None)]
    fn int_cells(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_int(raw), expected);
    }

    #[test]
    fn float_cells_reject_non_finite() {
        assert_eq!(parse_float("2.5"), Some(2.5));
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("x"), None);
    }

    #[test]
    fn require_columns_reports_every_missing_name() {
        let headers = csv::StringRecord::from(vec!["product", "quantity"]);
        let err = require_columns(&headers, &["transaction_id", "timestamp", "product"]).unwrap_err();
        match err {
            LoadError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["transaction_id", "timestamp"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
