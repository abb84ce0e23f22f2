//! Dashboard figures over a filtered slice of the ledger.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::ledger::{EntryType, Ledger, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("month must be 1-12, got {0}")]
    InvalidMonth(u32),
}

/// Which rows the dashboard looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodFilter {
    #[default]
    Overall,
    Year(i32),
    Month { year: i32, month: u32 },
    /// Inclusive on both ends.
    Range { start: NaiveDate, end: NaiveDate },
}

impl PeriodFilter {
    pub fn validate(&self) -> Result<(), FilterError> {
        match *self {
            PeriodFilter::Month { month, .. } if !(1..=12).contains(&month) => {
                Err(FilterError::InvalidMonth(month))
            }
            PeriodFilter::Range { start, end } if start > end => {
                Err(FilterError::InvertedRange { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn includes(&self, date: NaiveDate) -> bool {
        match *self {
            PeriodFilter::Overall => true,
            PeriodFilter::Year(y) => date.year() == y,
            PeriodFilter::Month { year, month } => date.year() == year && date.month() == month,
            PeriodFilter::Range { start, end } => start <= date && date <= end,
        }
    }

    /// Rows in ledger order that fall inside the period.
    pub fn apply<'a>(&self, ledger: &'a Ledger) -> Result<Vec<&'a Transaction>, FilterError> {
        self.validate()?;
        Ok(ledger.iter().filter(|t| self.includes(t.date)).collect())
    }
}

/// Distinct years present, newest first.
pub fn available_years(ledger: &Ledger) -> Vec<i32> {
    let mut years: Vec<i32> = ledger.iter().map(|t| t.date.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Distinct (year, month) pairs present, newest first.
pub fn available_months(ledger: &Ledger) -> Vec<(i32, u32)> {
    let mut months: Vec<(i32, u32)> = ledger
        .iter()
        .map(|t| (t.date.year(), t.date.month()))
        .collect();
    months.sort_unstable_by(|a, b| b.cmp(a));
    months.dedup();
    months
}

/// "March 2025"
pub fn month_label(year: i32, month: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.format("%B %Y").to_string())
}

/// Headline KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overview {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    /// Percentage of income kept; 0 when there is no income.
    pub savings_rate: f64,
}

impl Overview {
    pub fn from_rows(rows: &[&Transaction]) -> Self {
        let total_income: f64 = rows.iter().filter(|t| t.is_income()).map(|t| t.amount).sum();
        let total_expenses: f64 = rows.iter().filter(|t| t.is_expense()).map(|t| t.amount).sum();
        let net_balance = total_income - total_expenses;
        let savings_rate = if total_income > 0.0 {
            net_balance / total_income * 100.0
        } else {
            0.0
        };
        Self {
            total_income,
            total_expenses,
            net_balance,
            savings_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Expense totals per category, largest first.
pub fn spending_by_category(rows: &[&Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for t in rows.iter().filter(|t| t.is_expense()) {
        *totals.entry(t.category.as_str()).or_insert(0.0) += t.amount;
    }
    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    // stable sort keeps name order among equal totals
    out.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    out
}

/// Totals per entry type, for the income vs expense split.
pub fn type_split(rows: &[&Transaction]) -> BTreeMap<EntryType, f64> {
    let mut split = BTreeMap::new();
    for t in rows {
        *split.entry(t.entry_type.clone()).or_insert(0.0) += t.amount;
    }
    split
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub amount: f64,
}

/// Daily totals per entry type, oldest first.
pub fn daily_trend(rows: &[&Transaction]) -> Vec<TrendPoint> {
    let mut grouped: BTreeMap<(NaiveDate, &EntryType), f64> = BTreeMap::new();
    for t in rows {
        *grouped.entry((t.date, &t.entry_type)).or_insert(0.0) += t.amount;
    }
    grouped
        .into_iter()
        .map(|((date, entry_type), amount)| TrendPoint {
            date,
            entry_type: entry_type.clone(),
            amount,
        })
        .collect()
}
