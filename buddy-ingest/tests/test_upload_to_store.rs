use std::fs;
use std::path::PathBuf;

use buddy_core::{
    CategoryTable, Categorizer, ForecastScope, GoalBook, GoalComparison, Overview, PeriodFilter,
    TrailingMeanForecaster, project, spending_by_category,
};
use buddy_ingest::{DEFAULT_DATE_FORMAT, Store, ingest, manual_entry, parse_upload_csv};
use chrono::NaiveDate;

const UPLOAD: &str = "\
date,description,amount,Income/Expense
01-03-2025 08:00,Salary credited,60000,Income
01-03-2025 09:10,Uber to office,220,Expense
02-03-2025 13:05,Swiggy lunch,350,Expense
03-03-2025 19:30,Netflix premium plan,649,Expense
04-03-2025 10:00,House rent March,18000,Expense
05-03-2025 11:45,Airtel postpaid bill,599,Expense
06-03-2025 17:20,Apollo pharmacy,410,Expense
07-03-2025 21:00,###,75,Expense
08-03-2025 08:30,Ola auto,90,Expense
";

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("buddy-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Upload -> categorize once -> persist -> reload, then summarize.
#[test]
fn test_upload_categorize_store_reload() {
    let dir = scratch("upload");
    let csv_path = dir.join("march.csv");
    fs::write(&csv_path, UPLOAD).unwrap();

    let categorizer = Categorizer::standard();
    let store = Store::open(dir.join("user_data"), "ravi").unwrap();
    let mut ledger = store.load_ledger().unwrap();

    let batch = parse_upload_csv(&csv_path, DEFAULT_DATE_FORMAT).unwrap();
    assert_eq!(batch.skipped, 0);
    assert_eq!(ingest(batch.records, &categorizer, &mut ledger), 9);
    store.save_ledger(&ledger).unwrap();

    let reloaded = store.load_ledger().unwrap();
    let cats: Vec<&str> = reloaded.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(
        cats,
        vec![
            "Income",
            "Transport",
            "Food & Groceries",
            "Entertainment & Subscriptions",
            "Housing & Rent",
            "Utilities & Bills",
            "Health & Wellness",
            "Other",
            "Transport",
        ]
    );

    let rows = PeriodFilter::Month { year: 2025, month: 3 }.apply(&reloaded).unwrap();
    let overview = Overview::from_rows(&rows);
    assert_eq!(overview.total_income, 60000.0);
    assert_eq!(overview.total_expenses, 20393.0);
    assert_eq!(spending_by_category(&rows)[0].category, "Housing & Rent");
}

/// Importing the same file twice yields the same labels for both copies.
#[test]
fn test_reimport_is_idempotent() {
    let dir = scratch("reimport");
    let csv_path = dir.join("march.csv");
    fs::write(&csv_path, UPLOAD).unwrap();

    let categorizer = Categorizer::standard();
    let mut ledger = buddy_core::Ledger::new();
    for _ in 0..2 {
        let batch = parse_upload_csv(&csv_path, DEFAULT_DATE_FORMAT).unwrap();
        ingest(batch.records, &categorizer, &mut ledger);
    }
    let (first, second) = ledger.transactions().split_at(9);
    for (a, b) in first.iter().zip(second) {
        assert_eq!(a.category, b.category);
    }
}

/// Manual entry plus a goal, projected with the baseline forecaster.
#[test]
fn test_manual_entries_goal_and_projection() {
    let dir = scratch("goals");
    let categorizer = Categorizer::standard();
    let table = CategoryTable::standard();
    let store = Store::open(&dir, "ravi").unwrap();
    let mut ledger = store.load_ledger().unwrap();

    let records = (1..=10).map(|day| {
        manual_entry(
            NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            "metro card top-up",
            50.0,
            "Expense",
        )
        .unwrap()
    });
    ingest(records, &categorizer, &mut ledger);
    assert!(ledger.iter().all(|t| t.category == "Transport"));

    let mut goals: GoalBook = store.load_goals().unwrap();
    goals.set("Transport", 1000.0, &table).unwrap();
    store.save_goals(&goals).unwrap();

    let goals = store.load_goals().unwrap();
    let scope = ForecastScope::Category("Transport".to_string());
    let projection = project(&ledger, &scope, 30, &TrailingMeanForecaster::default()).unwrap();
    let goal = goals.get("Transport").unwrap();
    let cmp = GoalComparison::new(projection.projected_monthly, goal.amount);

    assert!((cmp.projected - 1522.0).abs() < 1e-6);
    assert!(!cmp.on_track);
}
