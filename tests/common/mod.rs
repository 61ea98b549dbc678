// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::str::FromStr;

use anyhow::Result;
use moneymap::application::{TransactionInput, TransactionService};
use moneymap::domain::{Money, TransactionKind};
use moneymap::storage::StoragePaths;
use tempfile::TempDir;

/// Helper to create a test service over a temporary data directory
pub fn test_service() -> Result<(TransactionService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = TransactionService::open(&StoragePaths::in_dir(temp_dir.path()))?;
    Ok((service, temp_dir))
}

/// Load a fresh service from the files written in `temp_dir`
pub fn reopen(temp_dir: &TempDir) -> Result<TransactionService> {
    Ok(TransactionService::open(&StoragePaths::in_dir(
        temp_dir.path(),
    ))?)
}

/// Helper to parse a decimal literal
pub fn money(amount: &str) -> Money {
    Money::from_str(amount).unwrap()
}

pub fn income(date: &str, description: &str, amount: &str, category: &str) -> TransactionInput {
    TransactionInput {
        date: date.to_string(),
        description: description.to_string(),
        amount: amount.to_string(),
        category: category.to_string(),
        kind: TransactionKind::Income,
    }
}

pub fn expense(date: &str, description: &str, amount: &str, category: &str) -> TransactionInput {
    TransactionInput {
        kind: TransactionKind::Expense,
        ..income(date, description, amount, category)
    }
}

/// Test fixture: a ledger funded with a salary
pub fn funded_service(salary: &str) -> Result<(TransactionService, TempDir)> {
    let (mut service, temp) = test_service()?;
    service.add(income("01-01-2024", "Salary", salary, "Salary"))?;
    Ok((service, temp))
}

/// The reconciliation invariant: balance equals the sum of all amounts
pub fn assert_reconciled(service: &TransactionService) {
    let sum: Money = service.transactions().iter().map(|t| t.amount).sum();
    assert_eq!(service.balance(), sum, "balance must equal the sum of amounts");
}
