//! Transaction CSV loading

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{parse_float, require_columns, LoadError};
use crate::models::{TransactionRecord, REQUIRED_TRANSACTION_COLUMNS};

/// Load sale lines from a CSV file.
///
/// Requires `transaction_id`, `timestamp` and `product`. `quantity` and
/// `unit_price` are optional; non-numeric cells are kept as missing.
pub fn load_transactions(path: impl AsRef<Path>) -> Result<Vec<TransactionRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let records = read_transactions(&mut rdr)?;
    debug!(path = %path.display(), rows = records.len(), "Loaded transactions");
    Ok(records)
}

/// Read sale lines from an existing CSV reader.
pub fn read_transactions<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<TransactionRecord>, LoadError> {
    let headers = rdr.headers()?.clone();
    let idxs = require_columns(&headers, &REQUIRED_TRANSACTION_COLUMNS)?;
    let quantity_idx = headers.iter().position(|h| h == "quantity");
    let price_idx = headers.iter().position(|h| h == "unit_price");

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        records.push(TransactionRecord {
            transaction_id: cell(idxs[0]).to_string(),
            timestamp: cell(idxs[1]).to_string(),
            product: cell(idxs[2]).to_string(),
            quantity: quantity_idx.and_then(|i| parse_float(cell(i))),
            unit_price: price_idx.and_then(|i| parse_float(cell(i))),
        });
    }

    Ok(records)
}
