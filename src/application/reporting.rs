use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::{BudgetLimits, Money, Transaction, remaining_allowance, spent_in_category};

use super::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub categories: Vec<CategorySummary>,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    /// Sum of expense magnitudes (positive)
    pub total: Money,
    pub count: usize,
    /// Share of all expenses, 0-100
    pub percentage: f64,
}

impl ExpenseReport {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Spending against a category budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    pub category: String,
    pub limit: Money,
    /// Sum of expenses in the category, zero or negative
    pub spent: Money,
    /// `limit + spent`, floored at zero
    pub remaining: Money,
}

impl BudgetUtilization {
    /// Percentages of (remaining, spent) over their sum, as drawn in the budget chart.
    pub fn shares(&self) -> (f64, f64) {
        let spent = self.spent.abs();
        let whole = self.remaining.saturating_add(spent);
        if whole.is_zero() {
            return (0.0, 0.0);
        }
        (percentage(self.remaining, whole), percentage(spent, whole))
    }

    pub fn is_overspent(&self) -> bool {
        remaining_allowance(self.limit, self.spent) < Money::ZERO
    }
}

/// Sum of expense magnitudes per category. Income is ignored.
/// An empty map means no expenses were recorded.
pub fn category_expense_totals(transactions: &[Transaction]) -> BTreeMap<String, Money> {
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();
    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        let total = totals
            .entry(transaction.category.clone())
            .or_insert(Money::ZERO);
        *total = total.saturating_add(transaction.magnitude());
    }
    totals
}

/// Expense breakdown with counts and shares, ordered by category.
pub fn expense_report(transactions: &[Transaction]) -> ExpenseReport {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *counts.entry(transaction.category.as_str()).or_insert(0) += 1;
    }

    let totals = category_expense_totals(transactions);
    let total = totals
        .values()
        .fold(Money::ZERO, |acc, amount| acc.saturating_add(*amount));

    let categories = totals
        .into_iter()
        .map(|(category, amount)| CategorySummary {
            count: counts.get(category.as_str()).copied().unwrap_or(0),
            percentage: percentage(amount, total),
            total: amount,
            category,
        })
        .collect();

    ExpenseReport { categories, total }
}

/// Remaining allowance and amount spent for a budgeted category.
pub fn budget_utilization(
    category: &str,
    budgets: &BudgetLimits,
    transactions: &[Transaction],
) -> Result<BudgetUtilization, AppError> {
    let limit = budgets
        .get(category)
        .copied()
        .ok_or_else(|| AppError::NotFound(format!("No budget set for {}", category)))?;

    let spent = spent_in_category(category, transactions);
    let remaining = remaining_allowance(limit, spent).max(Money::ZERO);

    Ok(BudgetUtilization {
        category: category.to_string(),
        limit,
        spent,
        remaining,
    })
}

/// Utilization of every budget, ordered by category.
pub fn budget_overview(
    budgets: &BudgetLimits,
    transactions: &[Transaction],
) -> Vec<BudgetUtilization> {
    budgets
        .keys()
        .filter_map(|category| budget_utilization(category, budgets, transactions).ok())
        .collect()
}

fn percentage(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    part
        .checked_div(whole)
        .and_then(|share| share.checked_mul(Money::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}
