//! Data models for stockwatch

mod alert;
mod inventory;
mod transaction;

pub use alert::*;
pub use inventory::*;
pub use transaction::*;
