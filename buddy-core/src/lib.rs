//! buddy-core: categorizer, ledger types, dashboard summaries, goals and projections

pub mod category;
pub mod currency;
pub mod forecast;
pub mod goals;
pub mod ledger;
pub mod stopwords;
pub mod summary;

pub use category::{
    CategoryRule, CategoryTable, Categorizer, TableError, TokenizerMode, INCOME, OTHER,
};
pub use currency::format_inr;
pub use forecast::{
    DailyPoint, ForecastError, ForecastScope, Forecaster, GoalComparison, Projection,
    TrailingMeanForecaster, daily_series, project, scope_options,
};
pub use goals::{GoalBook, GoalError, MonthlyGoal};
pub use ledger::{EntryType, Ledger, LedgerError, Transaction};
pub use stopwords::StopWords;
pub use summary::{
    CategoryTotal, FilterError, Overview, PeriodFilter, TrendPoint, available_months,
    available_years, daily_trend, month_label, spending_by_category, type_split,
};
