//! Alert message composition

use tabled::{builder::Builder, settings::Style};

use crate::models::{AlertMessage, MatchedSubset};

/// Subject used for inventory alerts
pub const ALERT_SUBJECT: &str = "Inventory Alert - stockwatch";
/// Heading for the expiration-proximity block
pub const EXPIRATION_LABEL: &str = "Products close to expiration:";
/// Heading for the stalled-inventory block
pub const IDLE_LABEL: &str = "Products idle for too long:";

/// Compose one message from labelled subsets.
///
/// Empty subsets are skipped. Returns `None` when every subset is empty.
pub fn compose(sections: &[(&str, &MatchedSubset<'_>)]) -> Option<AlertMessage> {
    let blocks: Vec<String> = sections
        .iter()
        .filter(|(_, subset)| !subset.is_empty())
        .map(|(label, subset)| format!("{label}\n{}", render_subset(subset)))
        .collect();

    if blocks.is_empty() {
        return None;
    }

    Some(AlertMessage {
        subject: ALERT_SUBJECT.to_string(),
        body: blocks.join("\n\n"),
    })
}

/// Render a subset as a borderless text table in source column order
pub fn render_subset(subset: &MatchedSubset<'_>) -> String {
    let columns = subset.columns();
    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());

    for record in subset.records() {
        let mut row: Vec<String> = record.cells.iter().take(columns.len()).cloned().collect();
        row.resize(columns.len(), String::new());
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}
