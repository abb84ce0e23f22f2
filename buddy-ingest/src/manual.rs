//! Single transactions typed in by the user.

use anyhow::{Result, bail};
use buddy_core::EntryType;
use chrono::NaiveDate;

use crate::types::IngestRecord;

/// Smallest amount a manual entry accepts.
pub const MIN_MANUAL_AMOUNT: f64 = 0.01;

/// Validate a manual entry. Only `Income` and `Expense` are offered here.
pub fn manual_entry(
    date: NaiveDate,
    description: &str,
    amount: f64,
    entry_type: &str,
) -> Result<IngestRecord> {
    let description = description.trim();
    if description.is_empty() {
        bail!("please enter a description");
    }
    if !amount.is_finite() || amount < MIN_MANUAL_AMOUNT {
        bail!("amount must be at least {MIN_MANUAL_AMOUNT:.2}, got {amount}");
    }
    let entry_type = match EntryType::from(entry_type) {
        EntryType::Unrecognized(other) => bail!("type must be Income or Expense, got {other:?}"),
        known => known,
    };

    Ok(IngestRecord {
        date,
        description: description.to_string(),
        amount,
        entry_type,
    })
}
