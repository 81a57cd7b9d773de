//! Inventory data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column holding the product identifier
pub const PRODUCT_COLUMN: &str = "product";
/// Column holding the quantity on hand
pub const STOCK_QUANTITY_COLUMN: &str = "stock_quantity";
/// Column holding the expiration date
pub const EXPIRATION_DATE_COLUMN: &str = "expiration_date";
/// Column holding the number of days without movement
pub const DAYS_IDLE_COLUMN: &str = "days_idle";

/// One row of an inventory snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Product identifier (not unique)
    pub product: String,

    /// Quantity on hand; negative values are kept as-is
    pub stock_quantity: Option<i64>,

    /// Expiration date, `None` when blank or unparsable
    pub expiration_date: Option<NaiveDate>,

    /// Days without movement, `None` when absent or non-numeric
    pub days_idle: Option<f64>,

    /// Raw cell values in source column order
    pub cells: Vec<String>,
}

/// An immutable inventory snapshot: the source header plus its rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryTable {
    columns: Vec<String>,
    records: Vec<InventoryRecord>,
}

impl InventoryTable {
    /// Create a table from a header and rows
    pub fn new(columns: Vec<String>, records: Vec<InventoryRecord>) -> Self {
        Self { columns, records }
    }

    /// A table with no columns and no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Column names in source order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the source header carried `name`
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Rows in source order
    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Rows of one snapshot that satisfied a rule, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedSubset<'a> {
    columns: &'a [String],
    records: Vec<&'a InventoryRecord>,
}

impl<'a> MatchedSubset<'a> {
    /// Build a subset borrowing the table's header
    pub fn new(columns: &'a [String], records: Vec<&'a InventoryRecord>) -> Self {
        Self { columns, records }
    }

    /// A subset with no rows for the given table
    pub fn none(table: &'a InventoryTable) -> Self {
        Self::new(table.columns(), Vec::new())
    }

    /// Header of the source table
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    /// Matched rows
    pub fn records(&self) -> &[&'a InventoryRecord] {
        &self.records
    }

    /// Product identifiers of the matched rows
    pub fn products(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.product.as_str()).collect()
    }

    /// Number of matched rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
