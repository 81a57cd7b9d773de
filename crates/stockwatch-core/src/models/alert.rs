//! Alert data models

use serde::{Deserialize, Serialize};

/// A composed alert ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    /// Subject line (email only)
    pub subject: String,

    /// Plain-text body
    pub body: String,
}

/// Outcome of one orchestration run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Records matched by the expiration rule
    pub expiration_matches: usize,

    /// Records matched by the idle-stock rule
    pub idle_matches: usize,

    /// Whether the delivery channel reported success
    pub delivered: bool,
}

impl RunSummary {
    /// Whether any rule matched
    pub fn has_matches(&self) -> bool {
        self.expiration_matches > 0 || self.idle_matches > 0
    }
}
