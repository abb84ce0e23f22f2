//! Categorize incoming records once and append them to the ledger.
//!
//! Rows already in the ledger are never re-categorized, so manual category
//! edits survive later imports.

use buddy_core::{Categorizer, Ledger, Transaction};
use tracing::info;

use crate::types::IngestRecord;

pub fn categorize_record(record: IngestRecord, categorizer: &Categorizer) -> Transaction {
    let category = categorizer
        .categorize(&record.description, record.entry_type.as_str())
        .to_string();
    Transaction::new(
        record.date,
        record.description,
        record.amount,
        record.entry_type,
        category,
    )
}

/// Returns how many rows were appended.
pub fn ingest(
    records: impl IntoIterator<Item = IngestRecord>,
    categorizer: &Categorizer,
    ledger: &mut Ledger,
) -> usize {
    let before = ledger.len();
    ledger.extend(
        records
            .into_iter()
            .map(|r| categorize_record(r, categorizer)),
    );
    let added = ledger.len() - before;
    info!(added, total = ledger.len(), "transactions ingested");
    added
}
