//! Alerting system for stockwatch
//!
//! Evaluates the expiration and idle-stock rules over an inventory snapshot,
//! composes a single message and hands it to one delivery channel.

mod composer;
mod email;
mod evaluator;
mod notifier;
mod orchestrator;
mod whatsapp;

pub use composer::{compose, render_subset, ALERT_SUBJECT, EXPIRATION_LABEL, IDLE_LABEL};
pub use email::{EmailChannel, LettreTransport, MailTransport, OutgoingMail};
pub use evaluator::{
    expiring_soon, idle_stock, AlertEvaluator, Clock, Evaluation, FixedClock, SystemClock,
};
pub use notifier::{DeliveryChannel, NotificationError};
pub use orchestrator::AlertOrchestrator;
pub use whatsapp::WhatsAppChannel;
