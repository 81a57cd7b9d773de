//! Inventory CSV loading

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::{parse_float, parse_int, require_columns, LoadError};
use crate::models::{
    InventoryRecord, InventoryTable, DAYS_IDLE_COLUMN, EXPIRATION_DATE_COLUMN, PRODUCT_COLUMN,
    STOCK_QUANTITY_COLUMN,
};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Load an inventory snapshot from a CSV file.
///
/// The header must name `product` and `expiration_date`; `stock_quantity`
/// and `days_idle` are optional and any other column is carried along for
/// display.
pub fn load_inventory(path: impl AsRef<Path>) -> Result<InventoryTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);
    let table = read_inventory(&mut rdr)?;
    debug!(path = %path.display(), rows = table.len(), "Loaded inventory");
    Ok(table)
}

/// Read an inventory snapshot from an existing CSV reader.
pub fn read_inventory<R: Read>(rdr: &mut csv::Reader<R>) -> Result<InventoryTable, LoadError> {
    let headers = rdr.headers()?.clone();
    let idxs = require_columns(&headers, &[PRODUCT_COLUMN, EXPIRATION_DATE_COLUMN])?;
    let (product_idx, expiration_idx) = (idxs[0], idxs[1]);
    let quantity_idx = headers.iter().position(|h| h == STOCK_QUANTITY_COLUMN);
    let idle_idx = headers.iter().position(|h| h == DAYS_IDLE_COLUMN);

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        records.push(InventoryRecord {
            product: cell(product_idx).to_string(),
            stock_quantity: quantity_idx.and_then(|i| parse_int(cell(i))),
            expiration_date: parse_date(cell(expiration_idx)),
            days_idle: idle_idx.and_then(|i| parse_float(cell(i))),
            cells: row.iter().map(String::from).collect(),
        });
    }

    let columns = headers.iter().map(String::from).collect();
    Ok(InventoryTable::new(columns, records))
}

/// Parse a calendar date, tolerating several layouts.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, month-first `MM/DD/YYYY`, and
/// timestamps whose time part is dropped. Returns `None` for anything else.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}
