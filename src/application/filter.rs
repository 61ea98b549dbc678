use chrono::NaiveDate;

use crate::domain::{ALL_CATEGORIES, Transaction, parse_date};

use super::AppError;

/// Filter for browsing transactions.
/// Date bounds are `DD-MM-YYYY` strings exactly as the user typed them.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// `None` or `"All"` disables the category filter
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A transaction that passed the filter, with its position in the ledger.
#[derive(Debug, Clone, Copy)]
pub struct FilteredRow<'a> {
    pub index: usize,
    pub transaction: &'a Transaction,
}

/// Result of filtering: the matching rows in ledger order, plus any bound that
/// could not be parsed. Unparsable bounds are reported and then ignored.
#[derive(Debug)]
pub struct FilteredTransactions<'a> {
    pub rows: Vec<FilteredRow<'a>>,
    pub errors: Vec<AppError>,
}

impl FilteredTransactions<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.rows.iter().map(|row| row.transaction)
    }
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> FilteredTransactions<'a> {
        let mut errors = Vec::new();
        let start = parse_bound("start", self.start_date.as_deref(), &mut errors);
        let end = parse_bound("end", self.end_date.as_deref(), &mut errors);
        let category = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

        let rows = transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| category.is_none_or(|c| t.category == c))
            .filter(|(_, t)| start.is_none_or(|s| t.date >= s))
            .filter(|(_, t)| end.is_none_or(|e| t.date <= e))
            .map(|(index, transaction)| FilteredRow { index, transaction })
            .collect();

        FilteredTransactions { rows, errors }
    }
}

/// Filter `transactions` by category (`"All"` for any) and inclusive date bounds.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    category_or_all: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> FilteredTransactions<'a> {
    TransactionFilter {
        category: Some(category_or_all.to_string()),
        start_date: start_date.map(str::to_string),
        end_date: end_date.map(str::to_string),
    }
    .apply(transactions)
}

fn parse_bound(label: &str, raw: Option<&str>, errors: &mut Vec<AppError>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match parse_date(raw) {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!(bound = label, value = raw, "ignoring unparsable filter date");
            errors.push(AppError::validation(format!(
                "Invalid {} date '{}'. Please use DD-MM-YYYY format",
                label, raw
            )));
            None
        }
    }
}
