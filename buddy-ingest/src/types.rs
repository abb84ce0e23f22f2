use buddy_core::EntryType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A transaction as it arrives, before a category is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub entry_type: EntryType,
}

/// Rows parsed from one upload, plus how many were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadBatch {
    pub records: Vec<IngestRecord>,
    pub skipped: usize,
}
