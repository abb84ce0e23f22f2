//! Ledger record types: categorized income and expense transactions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::CategoryTable;

/// Income/Expense column. Unrecognized values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    Income,
    Expense,
    Unrecognized(String),
}

impl EntryType {
    pub fn as_str(&self) -> &str {
        match self {
            EntryType::Income => "Income",
            EntryType::Expense => "Expense",
            EntryType::Unrecognized(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for EntryType {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "Income" => EntryType::Income,
            "Expense" => EntryType::Expense,
            other => EntryType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for EntryType {
    fn from(raw: String) -> Self {
        EntryType::from(raw.as_str())
    }
}

impl From<EntryType> for String {
    fn from(kind: EntryType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Always non-negative; direction comes from `entry_type`.
    pub amount: f64,
    #[serde(rename = "Income/Expense")]
    pub entry_type: EntryType,
    /// Assigned once at ingestion, afterwards only changed by manual edits.
    pub category: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        entry_type: EntryType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            entry_type,
            category: category.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.entry_type == EntryType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.entry_type == EntryType::Expense
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("no transaction at row {index} (ledger has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
}

/// Append-only list of transactions, plus manual category edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn push(&mut self, txn: Transaction) {
        self.transactions.push(txn);
    }

    pub fn extend(&mut self, txns: impl IntoIterator<Item = Transaction>) {
        self.transactions.extend(txns);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    /// Overwrite a row's category. The new label must be in the category list.
    pub fn set_category(
        &mut self,
        index: usize,
        category: &str,
        table: &CategoryTable,
    ) -> Result<(), LedgerError> {
        if !table.is_valid_category(category) {
            return Err(LedgerError::UnknownCategory(category.to_string()));
        }
        let len = self.transactions.len();
        let txn = self
            .transactions
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        txn.category = category.to_string();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Transaction, LedgerError> {
        if index >= self.transactions.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.transactions.len(),
            });
        }
        Ok(self.transactions.remove(index))
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
