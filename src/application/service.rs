use chrono::NaiveDate;

use crate::domain::{
    Money, Transaction, TransactionKind, check_budget, checked_balance, format_date,
    parse_amount, parse_date,
};
use crate::storage::{BudgetStore, LedgerStore, StoragePaths};

use super::{
    AppError, BudgetUtilization, ExpenseReport, FilteredTransactions, TransactionFilter,
    budget_overview, budget_utilization, expense_report,
};

/// Raw values for a new or edited transaction, as entered by the user.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// `DD-MM-YYYY`
    pub date: String,
    pub description: String,
    /// Positive amount; the kind decides the sign
    pub amount: String,
    pub category: String,
    pub kind: TransactionKind,
}

/// Result of editing a transaction
#[derive(Debug, Clone)]
pub struct EditResult {
    pub previous: Transaction,
    pub updated: Transaction,
}

/// Application service providing the operations of the tracker.
/// This is the primary interface for any client (CLI, TUI, etc.).
pub struct TransactionService {
    ledger: LedgerStore,
    budgets: BudgetStore,
}

struct ValidatedInput {
    date: NaiveDate,
    description: String,
    magnitude: Money,
    category: String,
    kind: TransactionKind,
}

impl TransactionService {
    /// Create a service over already loaded stores.
    pub fn new(ledger: LedgerStore, budgets: BudgetStore) -> Self {
        Self { ledger, budgets }
    }

    /// Load both data files (missing files start empty).
    pub fn open(paths: &StoragePaths) -> Result<Self, AppError> {
        let ledger = LedgerStore::load(&paths.ledger)?;
        let budgets = BudgetStore::load(&paths.budgets)?;
        Ok(Self::new(ledger, budgets))
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn budgets(&self) -> &BudgetStore {
        &self.budgets
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn balance(&self) -> Money {
        self.ledger.balance()
    }

    // ========================
    // Transaction operations
    // ========================

    /// Record a new income or expense.
    pub fn add(&mut self, input: TransactionInput) -> Result<Transaction, AppError> {
        let input = validate(input)?;

        if input.kind == TransactionKind::Expense {
            let available = self.ledger.balance();
            if input.magnitude > available {
                return Err(AppError::InsufficientBalance {
                    available,
                    required: input.magnitude,
                });
            }
            check_budget(
                self.budgets.limits(),
                self.ledger.transactions(),
                &input.category,
                input.magnitude,
            )?;
        }

        let transaction = Transaction::new(
            input.date,
            input.description,
            input.magnitude,
            input.category,
            input.kind,
        );
        let projected = self
            .ledger
            .transactions()
            .iter()
            .chain(std::iter::once(&transaction));
        ensure_balance_in_range(projected)?;

        self.ledger.append(transaction.clone());
        if let Err(err) = self.ledger.save() {
            self.ledger.remove(self.ledger.len() - 1);
            return Err(err.into());
        }

        tracing::info!(
            kind = %transaction.kind(),
            amount = %transaction.amount,
            category = %transaction.category,
            balance = %self.ledger.balance(),
            "transaction added"
        );
        Ok(transaction)
    }

    /// Replace the transaction at `index` with new values.
    /// The balance check allows spending what the old transaction accounted for;
    /// the budget check uses the new amount against all recorded expenses.
    pub fn edit(&mut self, index: usize, input: TransactionInput) -> Result<EditResult, AppError> {
        let old_amount = self
            .ledger
            .get(index)
            .map(|t| t.amount)
            .ok_or_else(|| transaction_not_found(index))?;
        let input = validate(input)?;

        if input.kind == TransactionKind::Expense {
            let available = self.ledger.balance().saturating_add(old_amount.abs());
            if input.magnitude > available {
                return Err(AppError::InsufficientBalance {
                    available,
                    required: input.magnitude,
                });
            }
            check_budget(
                self.budgets.limits(),
                self.ledger.transactions(),
                &input.category,
                input.magnitude,
            )?;
        }

        let updated = Transaction::new(
            input.date,
            input.description,
            input.magnitude,
            input.category,
            input.kind,
        );

        let projected = self
            .ledger
            .transactions()
            .iter()
            .enumerate()
            .map(|(i, t)| if i == index { &updated } else { t });
        ensure_balance_in_range(projected)?;

        let previous = self
            .ledger
            .replace(index, updated.clone())
            .ok_or_else(|| transaction_not_found(index))?;
        if let Err(err) = self.ledger.save() {
            self.ledger.replace(index, previous);
            return Err(err.into());
        }

        tracing::info!(
            index,
            old_amount = %previous.amount,
            new_amount = %updated.amount,
            balance = %self.ledger.balance(),
            "transaction updated"
        );
        Ok(EditResult { previous, updated })
    }

    /// Remove the transaction at `index`. Confirmation is up to the caller.
    pub fn delete(&mut self, index: usize) -> Result<Transaction, AppError> {
        if self.ledger.get(index).is_none() {
            return Err(transaction_not_found(index));
        }
        let projected = self
            .ledger
            .transactions()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, t)| t);
        ensure_balance_in_range(projected)?;

        let removed = self
            .ledger
            .remove(index)
            .ok_or_else(|| transaction_not_found(index))?;
        if let Err(err) = self.ledger.save() {
            self.ledger.insert(index, removed);
            return Err(err.into());
        }

        tracing::info!(
            index,
            amount = %removed.amount,
            balance = %self.ledger.balance(),
            "transaction deleted"
        );
        Ok(removed)
    }

    /// Filter the ledger; see [`TransactionFilter`].
    pub fn filter(&self, filter: &TransactionFilter) -> FilteredTransactions<'_> {
        filter.apply(self.ledger.transactions())
    }

    // ========================
    // Budget operations
    // ========================

    /// Set (or overwrite) the spending limit for a category.
    /// Returns the previous limit, if any.
    pub fn set_budget(&mut self, category: &str, limit: &str) -> Result<Option<Money>, AppError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(AppError::validation("Please enter a custom category name."));
        }
        let limit = parse_amount(limit)
            .map_err(|_| AppError::validation("Please enter a positive number"))?;
        if limit <= Money::ZERO {
            return Err(AppError::validation("Please enter a positive number"));
        }

        let previous = self.budgets.set(category, limit);
        if let Err(err) = self.budgets.save() {
            match previous {
                Some(old) => self.budgets.set(category, old),
                None => self.budgets.remove(category),
            };
            return Err(err.into());
        }

        tracing::info!(category, limit = %limit, "budget set");
        Ok(previous)
    }

    /// Remove the limit for a category.
    /// `Ok(None)` means there was nothing to remove, which is not an error.
    pub fn remove_budget(&mut self, category: &str) -> Result<Option<Money>, AppError> {
        let category = category.trim();
        let Some(limit) = self.budgets.remove(category) else {
            tracing::debug!(category, "no budget to remove");
            return Ok(None);
        };
        if let Err(err) = self.budgets.save() {
            self.budgets.set(category, limit);
            return Err(err.into());
        }

        tracing::info!(category, "budget removed");
        Ok(Some(limit))
    }

    /// Delete every transaction and budget and reset the balance.
    pub fn clear_all(&mut self) -> Result<(), AppError> {
        let transactions = self.ledger.clear();
        let limits = self.budgets.clear();

        let saved = self.ledger.save().and_then(|_| self.budgets.save());
        if let Err(err) = saved {
            self.ledger.restore(transactions);
            self.budgets.restore(limits);
            // Best effort: put whichever file was already emptied back in line with memory.
            let _ = self.ledger.save();
            return Err(err.into());
        }

        tracing::info!("all data deleted");
        Ok(())
    }

    // ========================
    // Reporting
    // ========================

    pub fn expense_report(&self) -> ExpenseReport {
        expense_report(self.ledger.transactions())
    }

    pub fn budget_utilization(&self, category: &str) -> Result<BudgetUtilization, AppError> {
        budget_utilization(category, self.budgets.limits(), self.ledger.transactions())
    }

    pub fn budget_overview(&self) -> Vec<BudgetUtilization> {
        budget_overview(self.budgets.limits(), self.ledger.transactions())
    }
}

/// Reject a change whose resulting ledger cannot be summed within the `Money` range.
fn ensure_balance_in_range<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Result<(), AppError> {
    checked_balance(transactions)
        .map(|_| ())
        .ok_or_else(|| AppError::validation("The resulting balance is too large to record."))
}

fn transaction_not_found(index: usize) -> AppError {
    AppError::NotFound(format!("Transaction #{} not found", index + 1))
}

fn validate(input: TransactionInput) -> Result<ValidatedInput, AppError> {
    let description = input.description.trim();
    let amount = input.amount.trim();
    let date = input.date.trim();
    if description.is_empty() || amount.is_empty() || date.is_empty() {
        return Err(AppError::validation("Please fill in all fields."));
    }

    let date = parse_date(date).map_err(|_| {
        AppError::validation(format!("Invalid date '{}'. Please use DD-MM-YYYY format", date))
    })?;
    let magnitude = parse_amount(amount).map_err(|e| AppError::validation(e.to_string()))?;
    if magnitude <= Money::ZERO {
        return Err(AppError::validation("Amount must be positive."));
    }

    let category = input.category.trim();
    if category.is_empty() {
        return Err(AppError::validation("Please enter a custom category name."));
    }

    tracing::debug!(date = %format_date(date), amount = %magnitude, "input validated");
    Ok(ValidatedInput {
        date,
        description: description.to_string(),
        magnitude,
        category: category.to_string(),
        kind: input.kind,
    })
}
