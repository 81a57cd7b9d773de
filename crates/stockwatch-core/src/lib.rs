//! # stockwatch
//!
//! Retail inventory analysis and threshold alerting.
//!
//! stockwatch reads inventory and sales CSV exports, charts monthly revenue,
//! and notifies staff by email or WhatsApp when stock is close to expiring
//! or has not moved for too long.
//!
//! ## Architecture
//!
//! - **Source**: CSV loaders returning typed snapshots or a load error
//! - **Alerting**: rule evaluation, message composition, delivery channels
//!   and the orchestrator tying them together
//! - **Analysis / Chart**: monthly revenue aggregation and its SVG chart
//!
//! ## Quick Start
//!
//! ```bash
//! # Chart monthly sales and run inventory alerts
//! stockwatch report --transactions transactions.csv --inventory inventory.csv
//!
//! # Only run inventory alerts over WhatsApp
//! stockwatch alerts --inventory inventory.csv --channel whatsapp
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod analysis;
pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod source;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{
        AlertEvaluator, AlertOrchestrator, DeliveryChannel, EmailChannel, WhatsAppChannel,
    };
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
}
