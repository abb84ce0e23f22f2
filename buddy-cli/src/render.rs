//! Plain-text output for the dashboard commands.

use buddy_core::{
    GoalBook, GoalComparison, MonthlyGoal, Overview, Projection, Transaction, daily_trend,
    format_inr, month_label, spending_by_category, type_split,
};
use buddy_ingest::SystemStats;

pub fn transaction_line(t: &Transaction) -> String {
    format!(
        "{}  {:<8} {:>14}  {:<30} {}",
        t.date,
        t.entry_type,
        format_inr(t.amount),
        t.category,
        t.description
    )
}

pub fn summary(rows: &[&Transaction]) {
    let o = Overview::from_rows(rows);
    println!("Total income    {}", format_inr(o.total_income));
    println!("Total expenses  {}", format_inr(o.total_expenses));
    println!("Net balance     {}", format_inr(o.net_balance));
    println!("Savings rate    {:.1}%", o.savings_rate);

    println!("\nIncome vs expense");
    for (kind, amount) in type_split(rows) {
        println!("  {:<10} {}", kind, format_inr(amount));
    }

    let spending = spending_by_category(rows);
    if !spending.is_empty() {
        println!("\nSpending by category");
        for c in &spending {
            println!("  {:<32} {}", c.category, format_inr(c.amount));
        }
    }

    println!("\nDaily cash flow");
    for p in daily_trend(rows) {
        println!("  {}  {:<8} {}", p.date, p.entry_type, format_inr(p.amount));
    }
}

pub fn goals(goals: &GoalBook) {
    if goals.is_empty() {
        println!("No goals set. Try: buddy goal set <category> <amount>");
        return;
    }
    for g in goals.iter() {
        println!("{:<32} {} per month", g.category, format_inr(g.amount));
    }
}

pub fn projection(p: &Projection, goal: Option<&MonthlyGoal>) {
    println!(
        "Projected monthly spend ({}, next {} days): {}",
        p.scope,
        p.horizon_days,
        format_inr(p.projected_monthly)
    );
    match goal {
        Some(goal) => {
            let cmp = GoalComparison::new(p.projected_monthly, goal.amount);
            println!(
                "Goal: {} (difference {})",
                format_inr(cmp.goal),
                format_inr(cmp.difference)
            );
            if cmp.on_track {
                println!("You are on track to meet your goal.");
            } else {
                println!("You are currently projected to spend more than your goal.");
            }
        }
        None if p.scope != buddy_core::forecast::ALL_EXPENSES => {
            println!("No goal set for {}. Set one with: buddy goal set", p.scope);
        }
        None => {}
    }
}

pub fn periods(years: &[i32], months: &[(i32, u32)]) {
    let years: Vec<String> = years.iter().map(i32::to_string).collect();
    println!("Years: {}", years.join(", "));
    println!("Months:");
    for (year, month) in months {
        if let Some(label) = month_label(*year, *month) {
            println!("  {label:<16} --month {year}-{month:02}");
        }
    }
}

pub fn stats(s: &SystemStats) {
    println!("Users with data     {}", s.users);
    println!("Transactions        {}", s.transactions);
    println!("Transaction volume  {}", format_inr(s.volume));
    if s.unreadable > 0 {
        println!("Unreadable ledgers  {}", s.unreadable);
    }
}
