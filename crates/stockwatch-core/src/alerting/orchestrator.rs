//! End-to-end alert run: load, evaluate, compose, deliver.

use std::path::Path;

use tracing::{error, info};

use super::composer::{compose, EXPIRATION_LABEL, IDLE_LABEL};
use super::evaluator::AlertEvaluator;
use super::notifier::DeliveryChannel;
use crate::models::{InventoryTable, RunSummary};
use crate::source::load_inventory;

/// Runs the inventory alert pipeline over one delivery channel
pub struct AlertOrchestrator {
    evaluator: AlertEvaluator,
    channel: Box<dyn DeliveryChannel>,
}

impl AlertOrchestrator {
    /// Create a new orchestrator
    pub fn new(evaluator: AlertEvaluator, channel: Box<dyn DeliveryChannel>) -> Self {
        Self { evaluator, channel }
    }

    /// Run the pipeline once against the inventory file at `inventory_path`.
    ///
    /// A file that cannot be loaded counts as an empty snapshot. Nothing is
    /// sent when neither rule matches.
    pub async fn run(&self, inventory_path: impl AsRef<Path>, recipients: &[String]) -> RunSummary {
        let inventory_path = inventory_path.as_ref();
        let table = match load_inventory(inventory_path) {
            Ok(table) => table,
            Err(e) => {
                error!(path = %inventory_path.display(), error = %e, "Failed to load inventory");
                InventoryTable::empty()
            }
        };

        self.run_snapshot(&table, recipients).await
    }

    /// Run the pipeline against an already loaded snapshot.
    pub async fn run_snapshot(&self, table: &InventoryTable, recipients: &[String]) -> RunSummary {
        let evaluation = self.evaluator.evaluate(table);

        let Some(message) = compose(&[
            (EXPIRATION_LABEL, &evaluation.expiring),
            (IDLE_LABEL, &evaluation.idle),
        ]) else {
            info!(rows = table.len(), "No inventory alerts");
            return RunSummary::default();
        };

        let delivered = self.channel.deliver(&message, recipients).await;

        let summary = RunSummary {
            expiration_matches: evaluation.expiring.len(),
            idle_matches: evaluation.idle.len(),
            delivered,
        };

        info!(
            channel = self.channel.channel_type(),
            expiration_matches = summary.expiration_matches,
            idle_matches = summary.idle_matches,
            delivered,
            "Inventory alert run finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::evaluator::FixedClock;
    use crate::config::AlertThresholds;
    use crate::models::AlertMessage;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Captures deliveries and answers with a fixed outcome
    struct SpyChannel {
        outcome: bool,
        calls: Arc<Mutex<Vec<(AlertMessage, Vec<String>)>>>,
    }

    #[async_trait]
    impl DeliveryChannel for SpyChannel {
        fn channel_type(&self) -> &'static str {
            "spy"
        }

        async fn deliver(&self, message: &AlertMessage, recipients: &[String]) -> bool {
            self.calls
                .lock()
                .unwrap()
                .push((message.clone(), recipients.to_vec()));
            self.outcome
        }
    }

    type Calls = Arc<Mutex<Vec<(AlertMessage, Vec<String>)>>>;

    fn orchestrator(thresholds: AlertThresholds, outcome: bool) -> (AlertOrchestrator, Calls) {
        let calls: Calls = Arc::default();
        let evaluator = AlertEvaluator::with_clock(
            thresholds,
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())),
        );
        let channel = SpyChannel {
            outcome,
            calls: calls.clone(),
        };
        (AlertOrchestrator::new(evaluator, Box::new(channel)), calls)
    }

    fn inventory(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn recipients() -> Vec<String> {
        vec!["ops@shop.test".to_string()]
    }

    #[tokio::test]
    async fn no_matches_means_no_delivery() {
        let file = inventory("product,expiration_date,days_idle\nRice,2030-01-01,3\n");
        let (orch, calls) = orchestrator(AlertThresholds::default(), true);

        let summary = orch.run(file.path(), &recipients()).await;

        assert_eq!(summary, RunSummary::default());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_file_counts_as_empty_snapshot() {
        let (orch, calls) = orchestrator(AlertThresholds::default(), true);

        let summary = orch.run("/no/such/inventory.csv", &recipients()).await;

        assert_eq!(
            summary,
            RunSummary { expiration_matches: 0, idle_matches: 0, delivered: false }
        );
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn matches_are_composed_and_delivered_once() {
        let file = inventory(
            "product,stock_quantity,expiration_date,days_idle\n\
             Milk,10,2025-01-10,5\n\
             Bread,5,2000-01-01,200\n\
             Rice,50,2030-01-01,120\n",
        );
        let (orch, calls) = orchestrator(AlertThresholds::default(), true);

        let summary = orch.run(file.path(), &recipients()).await;

        assert_eq!(
            summary,
            RunSummary { expiration_matches: 2, idle_matches: 2, delivered: true }
        );
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (message, to) = &calls[0];
        assert_eq!(to, &recipients());
        assert!(message.body.contains(EXPIRATION_LABEL));
        assert!(message.body.contains(IDLE_LABEL));
    }

    #[tokio::test]
    async fn channel_failure_is_reported_in_summary() {
        let file = inventory("product,expiration_date,days_idle\nBread,2000-01-01,200\n");
        let (orch, _) = orchestrator(AlertThresholds::default(), false);

        let summary = orch.run(file.path(), &recipients()).await;

        assert!(summary.has_matches());
        assert!(!summary.delivered);
    }
}
