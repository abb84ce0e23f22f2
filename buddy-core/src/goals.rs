//! Monthly spending goals, one per expense category.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::{CategoryTable, INCOME};

/// Smallest goal a user may set, in rupees.
pub const MIN_GOAL_AMOUNT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGoal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    #[error("goals can only target expense categories, not {0:?}")]
    NotAnExpenseCategory(String),
    #[error("goal amount must be at least 1, got {0}")]
    AmountTooSmall(f64),
}

/// The user's goals, oldest first. Replacing a goal moves it to the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalBook {
    goals: Vec<MonthlyGoal>,
}

impl GoalBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the goal for `category`.
    pub fn set(
        &mut self,
        category: &str,
        amount: f64,
        table: &CategoryTable,
    ) -> Result<(), GoalError> {
        if category == INCOME || !table.is_valid_category(category) {
            return Err(GoalError::NotAnExpenseCategory(category.to_string()));
        }
        if !(amount >= MIN_GOAL_AMOUNT) || !amount.is_finite() {
            return Err(GoalError::AmountTooSmall(amount));
        }
        self.goals.retain(|g| g.category != category);
        self.goals.push(MonthlyGoal {
            category: category.to_string(),
            amount,
        });
        Ok(())
    }

    pub fn get(&self, category: &str) -> Option<&MonthlyGoal> {
        self.goals.iter().find(|g| g.category == category)
    }

    pub fn remove(&mut self, category: &str) -> Option<MonthlyGoal> {
        let pos = self.goals.iter().position(|g| g.category == category)?;
        Some(self.goals.remove(pos))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthlyGoal> {
        self.goals.iter()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_goal() {
        let table = CategoryTable::standard();
        let mut book = GoalBook::new();
        book.set("Transport", 3000.0, &table).unwrap();
        book.set("Travel", 10000.0, &table).unwrap();
        book.set("Transport", 2500.0, &table).unwrap();

        assert_eq!(book.len(), 2);
        assert_eq!(book.get("Transport").unwrap().amount, 2500.0);
        // replacing moves the goal to the end
        assert_eq!(book.iter().next().unwrap().category, "Travel");
    }

    #[test]
    fn test_rejects_income_and_unknown() {
        let table = CategoryTable::standard();
        let mut book = GoalBook::new();
        assert_eq!(
            book.set("Income", 100.0, &table),
            Err(GoalError::NotAnExpenseCategory("Income".to_string()))
        );
        assert!(book.set("Pets", 100.0, &table).is_err());
        assert_eq!(
            book.set("Other", 0.5, &table),
            Err(GoalError::AmountTooSmall(0.5))
        );
        assert!(book.set("Other", f64::NAN, &table).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_remove_and_json() {
        let table = CategoryTable::standard();
        let mut book = GoalBook::new();
        book.set("Insurance", 1500.0, &table).unwrap();

        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(json, r#"[{"category":"Insurance","amount":1500.0}]"#);

        assert!(book.remove("Insurance").is_some());
        assert!(book.remove("Insurance").is_none());
    }
}
