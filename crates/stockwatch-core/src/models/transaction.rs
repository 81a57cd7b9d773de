//! Sales transaction data models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Columns a transactions file must carry
pub const REQUIRED_TRANSACTION_COLUMNS: [&str; 3] = ["transaction_id", "timestamp", "product"];

/// A single sale line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction identifier
    pub transaction_id: String,

    /// Raw timestamp text, expected as `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,

    /// Product sold
    pub product: String,

    /// Units sold
    pub quantity: Option<f64>,

    /// Price per unit
    pub unit_price: Option<f64>,
}

impl TransactionRecord {
    /// Line revenue, when both factors are known
    pub fn revenue(&self) -> Option<f64> {
        Some(self.quantity? * self.unit_price?)
    }
}

/// Revenue per calendar month keyed by `YYYY-MM`, ascending
pub type MonthlyRevenue = BTreeMap<String, f64>;
