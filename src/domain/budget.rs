use std::collections::BTreeMap;

use super::{Money, Transaction, spent_in_category};

/// Spending limits keyed by category. At most one limit per category.
pub type BudgetLimits = BTreeMap<String, Money>;

/// Allowance left for a category before a new expense is recorded.
/// `spent` is the (non-positive) sum of existing expenses; the result can be negative.
pub fn remaining_allowance(limit: Money, spent: Money) -> Money {
    limit.saturating_add(spent)
}

/// Check whether an expense of `amount` (positive) fits in the category's budget.
/// Categories without a limit always pass.
pub fn check_budget(
    limits: &BudgetLimits,
    transactions: &[Transaction],
    category: &str,
    amount: Money,
) -> Result<(), BudgetCheckError> {
    let Some(&limit) = limits.get(category) else {
        return Ok(());
    };

    let remaining = remaining_allowance(limit, spent_in_category(category, transactions));
    if amount > remaining {
        return Err(BudgetCheckError::Exceeded {
            category: category.to_string(),
            limit,
            remaining,
            requested: amount,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetCheckError {
    Exceeded {
        category: String,
        limit: Money,
        remaining: Money,
        requested: Money,
    },
}

impl BudgetCheckError {
    /// How far the expense goes past the remaining allowance.
    pub fn overrun(&self) -> Money {
        match self {
            BudgetCheckError::Exceeded {
                remaining,
                requested,
                ..
            } => requested.saturating_sub(*remaining),
        }
    }
}

impl std::fmt::Display for BudgetCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetCheckError::Exceeded { category, .. } => {
                write!(
                    f,
                    "This purchase exceeds your {} budget by {}",
                    category,
                    super::format_currency(self.overrun())
                )
            }
        }
    }
}

impl std::error::Error for BudgetCheckError {}
