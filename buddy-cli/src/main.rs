use anyhow::{Context, Result, bail};
use buddy_core::{
    CategoryTable, Categorizer, ForecastScope, Ledger, PeriodFilter, StopWords, TokenizerMode,
    TrailingMeanForecaster, available_months, available_years, project, scope_options,
};
use buddy_ingest::{Store, ingest, manual_entry, parse_upload_csv};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "buddy", version, about = "Personal expense ledger with keyword categorization")]
struct Cli {
    /// Override the configured user
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the category a description would get
    Categorize {
        /// Omitted means an empty description
        description: Option<String>,

        /// Income or Expense
        #[arg(long = "type", default_value = "Expense")]
        entry_type: String,
    },

    /// List every valid category, in match order
    Categories {
        /// Only categories a spending goal can target
        #[arg(long)]
        expense: bool,
    },

    /// Years and months that have transactions
    Periods,

    /// Import a CSV with date,description,amount,Income/Expense columns
    Import {
        csv: PathBuf,

        /// Override the configured date format
        #[arg(long)]
        date_format: Option<String>,
    },

    /// Add one transaction by hand
    Add {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        description: String,

        #[arg(long)]
        amount: f64,

        #[arg(long = "type", default_value = "Expense")]
        entry_type: String,
    },

    /// Show transactions with their row numbers
    List {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Income, expenses, savings rate and spending by category
    Summary {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Overwrite the category of one row
    Recategorize { row: usize, category: String },

    /// Delete one row
    Remove { row: usize },

    /// Monthly spending goals
    Goal {
        #[command(subcommand)]
        command: GoalCommand,
    },

    /// Project monthly spend and compare it with the goal
    Forecast {
        /// Expense category (default: all expenses)
        #[arg(long)]
        category: Option<String>,

        /// Horizon in days, 30-365
        #[arg(long)]
        days: Option<usize>,
    },

    /// Totals across every user in the data directory
    Stats,

    /// Configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// Set or replace the goal for a category
    Set { category: String, amount: f64 },
    /// Show current goals
    List,
    /// Drop the goal for a category
    Remove { category: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug, Default)]
struct PeriodArgs {
    /// Only this year
    #[arg(long, conflicts_with_all = ["month", "from", "to"])]
    year: Option<i32>,

    /// Only this month, YYYY-MM
    #[arg(long, conflicts_with_all = ["from", "to"])]
    month: Option<String>,

    /// Range start, YYYY-MM-DD (default: first transaction)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Range end, YYYY-MM-DD (default: last transaction)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    fn to_filter(&self, ledger: &Ledger) -> Result<PeriodFilter> {
        if let Some(year) = self.year {
            return Ok(PeriodFilter::Year(year));
        }
        if let Some(month) = &self.month {
            let (year, month) = parse_year_month(month)?;
            return Ok(PeriodFilter::Month { year, month });
        }
        if self.from.is_none() && self.to.is_none() {
            return Ok(PeriodFilter::Overall);
        }
        let first = ledger.iter().map(|t| t.date).min();
        let last = ledger.iter().map(|t| t.date).max();
        match (self.from.or(first), self.to.or(last)) {
            (Some(start), Some(end)) => Ok(PeriodFilter::Range { start, end }),
            _ => Ok(PeriodFilter::Overall),
        }
    }
}

fn parse_year_month(s: &str) -> Result<(i32, u32)> {
    let (y, m) = s
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got {s:?}"))?;
    let year = y.parse().with_context(|| format!("bad year in {s:?}"))?;
    let month = m.parse().with_context(|| format!("bad month in {s:?}"))?;
    Ok((year, month))
}

/// An explicit category must have expense history to forecast.
fn resolve_scope(ledger: &Ledger, category: Option<String>) -> Result<ForecastScope> {
    let Some(category) = category else {
        return Ok(ForecastScope::AllExpenses);
    };
    let options = scope_options(ledger);
    let scope = ForecastScope::Category(category);
    if !options.contains(&scope) {
        let valid: Vec<&str> = options.iter().map(ForecastScope::label).collect();
        bail!(
            "no expenses recorded under {:?}; choose one of: {}",
            scope.label(),
            valid.join(", ")
        );
    }
    Ok(scope)
}

/// Loaded once per run and shared by every command.
struct App {
    config: Config,
    table: Arc<CategoryTable>,
    categorizer: Categorizer,
    store: Store,
}

impl App {
    fn load(config: Config) -> Result<Self> {
        let table = Arc::new(CategoryTable::standard());
        let stopwords = load_stopwords(&config);
        let categorizer = Categorizer::new(Arc::clone(&table), stopwords);
        if categorizer.mode() == TokenizerMode::Degraded {
            warn!("stopwords unavailable, categorizing with plain whitespace tokens");
        }
        let store = Store::open(config.data_dir()?, &config.user)?;
        Ok(Self {
            config,
            table,
            categorizer,
            store,
        })
    }
}

/// `None` when a configured list cannot be read.
fn load_stopwords(config: &Config) -> Option<Arc<StopWords>> {
    let Some(path) = &config.stopwords_file else {
        return Some(Arc::new(StopWords::english()));
    };
    match std::fs::read_to_string(path) {
        Ok(text) => Some(Arc::new(StopWords::from_list(&text))),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read stopwords file");
            None
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(user) = cli.user {
        config.user = user;
    }
    init_tracing(&config.log_level);

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => match Config::init()? {
                (path, true) => println!("Wrote {}", path.display()),
                (path, false) => println!("Config already exists: {}", path.display()),
            },
            ConfigCommand::Show => print!("{}", config.to_toml()?),
        },

        Command::Categorize {
            description,
            entry_type,
        } => {
            let app = App::load(config)?;
            println!(
                "{}",
                app.categorizer
                    .categorize_opt(description.as_deref(), &entry_type)
            );
        }

        Command::Categories { expense } => {
            let app = App::load(config)?;
            let names = if expense {
                app.table.expense_categories()
            } else {
                app.table.all_categories()
            };
            for name in names {
                println!("{name}");
            }
        }

        Command::Periods => {
            let app = App::load(config)?;
            let ledger = app.store.load_ledger()?;
            if ledger.is_empty() {
                println!("No transactions yet.");
                return Ok(());
            }
            render::periods(&available_years(&ledger), &available_months(&ledger));
        }

        Command::Stats => {
            let app = App::load(config)?;
            render::stats(&app.store.system_stats()?);
        }

        Command::Import { csv, date_format } => {
            let app = App::load(config)?;
            if !csv.exists() {
                bail!("CSV not found: {}", csv.display());
            }
            let format = date_format.unwrap_or_else(|| app.config.upload.date_format.clone());
            let batch = parse_upload_csv(&csv, &format)
                .with_context(|| format!("could not read {}", csv.display()))?;

            let mut ledger = app.store.load_ledger()?;
            let added = ingest(batch.records, &app.categorizer, &mut ledger);
            app.store.save_ledger(&ledger)?;
            info!(user = app.store.user(), added, skipped = batch.skipped, "import finished");

            println!("Imported {added} transactions from {}", csv.display());
            if batch.skipped > 0 {
                println!("Skipped {} unreadable rows", batch.skipped);
            }
        }

        Command::Add {
            date,
            description,
            amount,
            entry_type,
        } => {
            let app = App::load(config)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let record = manual_entry(date, &description, amount, &entry_type)?;

            let mut ledger = app.store.load_ledger()?;
            ingest([record], &app.categorizer, &mut ledger);
            app.store.save_ledger(&ledger)?;

            if let Some(txn) = ledger.transactions().last() {
                println!("Added row {}: {}", ledger.len() - 1, render::transaction_line(txn));
            }
        }

        Command::List { period } => {
            let app = App::load(config)?;
            let ledger = app.store.load_ledger()?;
            let filter = period.to_filter(&ledger)?;
            filter.validate()?;
            let rows: Vec<(usize, &buddy_core::Transaction)> = ledger
                .iter()
                .enumerate()
                .filter(|(_, t)| filter.includes(t.date))
                .collect();
            if rows.is_empty() {
                println!("No transactions found for the selected period.");
            }
            for (i, t) in rows {
                println!("{i:>5}  {}", render::transaction_line(t));
            }
        }

        Command::Summary { period } => {
            let app = App::load(config)?;
            let ledger = app.store.load_ledger()?;
            if ledger.is_empty() {
                println!("No transactions yet. Import a file or add one to get started.");
                return Ok(());
            }
            let filter = period.to_filter(&ledger)?;
            let rows = filter.apply(&ledger)?;
            if rows.is_empty() {
                println!("No transactions found for the selected period.");
                return Ok(());
            }
            render::summary(&rows);
        }

        Command::Recategorize { row, category } => {
            let app = App::load(config)?;
            let mut ledger = app.store.load_ledger()?;
            ledger.set_category(row, &category, &app.table)?;
            app.store.save_ledger(&ledger)?;
            info!(row, category = %category, "category updated");
            println!("Row {row} is now {category}");
        }

        Command::Remove { row } => {
            let app = App::load(config)?;
            let mut ledger = app.store.load_ledger()?;
            let removed = ledger.remove(row)?;
            app.store.save_ledger(&ledger)?;
            println!("Removed: {}", render::transaction_line(&removed));
        }

        Command::Goal { command } => {
            let app = App::load(config)?;
            let mut goals = app.store.load_goals()?;
            match command {
                GoalCommand::Set { category, amount } => {
                    goals.set(&category, amount, &app.table)?;
                    app.store.save_goals(&goals)?;
                    println!(
                        "Goal set for {category}: {} per month.",
                        buddy_core::format_inr(amount)
                    );
                }
                GoalCommand::List => render::goals(&goals),
                GoalCommand::Remove { category } => {
                    if goals.remove(&category).is_none() {
                        bail!("no goal set for {category}");
                    }
                    app.store.save_goals(&goals)?;
                    println!("Removed goal for {category}");
                }
            }
        }

        Command::Forecast { category, days } => {
            let app = App::load(config)?;
            let ledger = app.store.load_ledger()?;
            let goals = app.store.load_goals()?;
            let scope = resolve_scope(&ledger, category)?;
            let days = days.unwrap_or(app.config.forecast.default_days);

            let projection = project(&ledger, &scope, days, &TrailingMeanForecaster::default())?;
            let goal = match &scope {
                ForecastScope::Category(c) => goals.get(c),
                ForecastScope::AllExpenses => None,
            };
            render::projection(&projection, goal);
        }
    }

    Ok(())
}
