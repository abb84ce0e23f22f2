//! Expense projection against monthly goals.
//!
//! The time-series model itself sits behind [`Forecaster`]; this module only
//! prepares the daily history, turns a forecast into a projected monthly
//! spend, and compares that with a goal.

use std::ops::RangeInclusive;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::ledger::{Ledger, Transaction};

/// Fewest daily points a forecast is fitted on.
pub const MIN_HISTORY_DAYS: usize = 7;
pub const HORIZON_DAYS: RangeInclusive<usize> = 30..=365;
pub const DEFAULT_HORIZON_DAYS: usize = 90;
/// Average month length used to scale a daily mean.
pub const DAYS_PER_MONTH: f64 = 30.44;

pub const ALL_EXPENSES: &str = "All Expenses";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastScope {
    AllExpenses,
    Category(String),
}

impl ForecastScope {
    pub fn label(&self) -> &str {
        match self {
            ForecastScope::AllExpenses => ALL_EXPENSES,
            ForecastScope::Category(c) => c.as_str(),
        }
    }

    fn includes(&self, txn: &Transaction) -> bool {
        match self {
            ForecastScope::AllExpenses => txn.is_expense(),
            ForecastScope::Category(c) => txn.is_expense() && txn.category == *c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("no expense data to forecast")]
    NoExpenses,
    #[error("not enough data to forecast: {points} daily points, need 7")]
    NotEnoughData { points: usize },
    #[error("forecast horizon must be 30-365 days, got {0}")]
    HorizonOutOfRange(usize),
    #[error("forecast model failed: {0}")]
    Model(String),
}

/// Scopes worth offering: all expenses, then each expense category by name.
pub fn scope_options(ledger: &Ledger) -> Vec<ForecastScope> {
    let mut categories: Vec<&str> = ledger
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.category.as_str())
        .collect();
    categories.sort_unstable();
    categories.dedup();
    std::iter::once(ForecastScope::AllExpenses)
        .chain(
            categories
                .into_iter()
                .map(|c| ForecastScope::Category(c.to_string())),
        )
        .collect()
}

/// Expense totals per day from the first to the last matching date, with
/// empty days filled as zero.
pub fn daily_series(ledger: &Ledger, scope: &ForecastScope) -> Vec<DailyPoint> {
    let rows: Vec<&Transaction> = ledger.iter().filter(|t| scope.includes(t)).collect();
    let (Some(first), Some(last)) = (
        rows.iter().map(|t| t.date).min(),
        rows.iter().map(|t| t.date).max(),
    ) else {
        return Vec::new();
    };

    let mut series: Vec<DailyPoint> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| DailyPoint { date, value: 0.0 })
        .collect();
    for t in rows {
        let offset = (t.date - first).num_days() as usize;
        series[offset].value += t.amount;
    }
    series
}

/// A time-series model: fit on daily history, predict `horizon_days` ahead.
///
/// Implementations return the fitted history followed by the future points,
/// oldest first.
pub trait Forecaster {
    fn forecast(
        &self,
        history: &[DailyPoint],
        horizon_days: usize,
    ) -> Result<Vec<DailyPoint>, ForecastError>;
}

/// Baseline model: every prediction is the mean of the last `window` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingMeanForecaster {
    pub window: usize,
}

impl Default for TrailingMeanForecaster {
    fn default() -> Self {
        Self { window: 28 }
    }
}

impl Forecaster for TrailingMeanForecaster {
    fn forecast(
        &self,
        history: &[DailyPoint],
        horizon_days: usize,
    ) -> Result<Vec<DailyPoint>, ForecastError> {
        let Some(last) = history.last() else {
            return Err(ForecastError::NotEnoughData { points: 0 });
        };
        let window = &history[history.len().saturating_sub(self.window.max(1))..];
        let mean = window.iter().map(|p| p.value).sum::<f64>() / window.len() as f64;

        let fitted = history.iter().map(|p| DailyPoint {
            date: p.date,
            value: mean,
        });
        let future = (1..=horizon_days).map(|i| DailyPoint {
            date: last.date + Duration::days(i as i64),
            value: mean,
        });
        Ok(fitted.chain(future).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub scope: String,
    pub horizon_days: usize,
    pub forecast: Vec<DailyPoint>,
    /// Mean predicted daily spend over the horizon, scaled to a month.
    pub projected_monthly: f64,
}

/// Fit `forecaster` on the scope's daily history and project monthly spend.
pub fn project(
    ledger: &Ledger,
    scope: &ForecastScope,
    horizon_days: usize,
    forecaster: &dyn Forecaster,
) -> Result<Projection, ForecastError> {
    if !HORIZON_DAYS.contains(&horizon_days) {
        return Err(ForecastError::HorizonOutOfRange(horizon_days));
    }
    if !ledger.iter().any(|t| t.is_expense()) {
        return Err(ForecastError::NoExpenses);
    }
    let history = daily_series(ledger, scope);
    if history.len() < MIN_HISTORY_DAYS {
        return Err(ForecastError::NotEnoughData {
            points: history.len(),
        });
    }

    let forecast = forecaster.forecast(&history, horizon_days)?;
    let tail = &forecast[forecast.len().saturating_sub(horizon_days)..];
    if tail.is_empty() {
        return Err(ForecastError::Model("empty forecast".to_string()));
    }
    let avg_daily = tail.iter().map(|p| p.value).sum::<f64>() / tail.len() as f64;

    Ok(Projection {
        scope: scope.label().to_string(),
        horizon_days,
        forecast,
        projected_monthly: avg_daily * DAYS_PER_MONTH,
    })
}

/// Projected monthly spend next to the user's goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalComparison {
    pub projected: f64,
    pub goal: f64,
    /// Positive when the projection overshoots the goal.
    pub difference: f64,
    pub on_track: bool,
}

impl GoalComparison {
    pub fn new(projected: f64, goal: f64) -> Self {
        let difference = projected - goal;
        Self {
            projected,
            goal,
            difference,
            on_track: difference <= 0.0,
        }
    }
}
