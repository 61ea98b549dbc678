mod common;

use std::fs;

use anyhow::Result;
use common::{expense, funded_service, income, money, reopen, test_service};
use moneymap::application::{AppError, TransactionService};
use moneymap::io::Exporter;
use moneymap::storage::{BUDGET_FILE, LEDGER_FILE, StoragePaths};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn test_ledger_file_format() -> Result<()> {
    let (mut service, temp) = funded_service("1000")?;
    service.add(expense("02-01-2024", "Groceries", "150.5", "Food"))?;

    let raw = fs::read_to_string(temp.path().join(LEDGER_FILE))?;
    let json: Value = serde_json::from_str(&raw)?;

    assert_eq!(json["balance"].as_f64(), Some(849.5));
    let transactions = json["transactions"].as_array().expect("transactions array");
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[1]["date"], "02-01-2024");
    assert_eq!(transactions[1]["description"], "Groceries");
    assert_eq!(transactions[1]["amount"].as_f64(), Some(-150.5));
    assert_eq!(transactions[1]["category"], "Food");

    // Pretty printed with two-space indentation
    assert!(raw.contains("\n  \"balance\""));
    Ok(())
}

#[test]
fn test_large_amounts_survive_reload_exactly() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.add(income("01-01-2024", "Windfall", "12345678901234567.89", "Others"))?;
    service.add(expense("02-01-2024", "Stamp", "0.01", "Others"))?;
    assert_eq!(service.balance(), money("12345678901234567.88"));

    let raw = fs::read_to_string(temp.path().join(LEDGER_FILE))?;
    assert!(raw.contains("12345678901234567.89"));

    let reloaded = reopen(&temp)?;
    assert_eq!(reloaded.balance(), money("12345678901234567.88"));
    assert_eq!(reloaded.transactions()[0].amount, money("12345678901234567.89"));
    assert_eq!(reloaded.transactions(), service.transactions());
    Ok(())
}

#[test]
fn test_budget_limit_survives_reload_exactly() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.set_budget("Travel", "98765432109876543.21")?;

    let reloaded = reopen(&temp)?;
    assert_eq!(
        reloaded.budgets().get("Travel"),
        Some(money("98765432109876543.21"))
    );
    Ok(())
}

#[test]
fn test_budget_file_format() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.set_budget("Food", "200")?;
    service.set_budget("Gym", "35.5")?;

    let json: Value = serde_json::from_str(&fs::read_to_string(temp.path().join(BUDGET_FILE))?)?;
    assert_eq!(json["Food"].as_f64(), Some(200.0));
    assert_eq!(json["Gym"].as_f64(), Some(35.5));
    Ok(())
}

#[test]
fn test_loads_existing_data_files() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join(LEDGER_FILE),
        r#"{
  "balance": 850.0,
  "transactions": [
    {"date": "01-01-2024", "description": "Salary", "amount": 1000.0, "category": "Salary"},
    {"date": "02-01-2024", "description": "Groceries", "amount": -150.0, "category": "Food"}
  ]
}"#,
    )?;
    fs::write(temp.path().join(BUDGET_FILE), r#"{"Food": 200.0}"#)?;

    let mut service = reopen(&temp)?;
    assert_eq!(service.transactions().len(), 2);
    assert_eq!(service.balance(), money("850"));
    assert_eq!(service.budget_utilization("Food")?.remaining, money("50"));

    let result = service.add(expense("03-01-2024", "Dinner", "60", "Food"));
    assert!(matches!(result, Err(AppError::BudgetExceeded { .. })));
    Ok(())
}

#[test]
fn test_missing_balance_key_defaults_to_sum() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join(LEDGER_FILE),
        r#"{"transactions": [{"date": "01-01-2024", "description": "Salary", "amount": 10, "category": "Salary"}]}"#,
    )?;

    let service = reopen(&temp)?;
    assert_eq!(service.balance(), money("10"));
    Ok(())
}

#[test]
fn test_corrupt_file_is_a_storage_error() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join(LEDGER_FILE), "{\"balance\": 1")?;

    let result = TransactionService::open(&StoragePaths::in_dir(temp.path()));
    assert!(matches!(result, Err(AppError::Storage(_))));
    Ok(())
}

#[test]
fn test_failed_write_leaves_state_untouched() -> Result<()> {
    let temp = TempDir::new()?;
    // A regular file where the data directory should be makes every save fail.
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory")?;

    let mut service = TransactionService::open(&StoragePaths::in_dir(&blocker))?;
    let result = service.add(income("01-01-2024", "Salary", "1000", "Salary"));

    assert!(matches!(result, Err(AppError::Storage(_))));
    assert!(service.transactions().is_empty());
    assert_eq!(service.balance(), money("0"));

    let result = service.set_budget("Food", "200");
    assert!(matches!(result, Err(AppError::Storage(_))));
    assert!(service.budgets().is_empty());
    Ok(())
}

#[test]
fn test_export_transactions_csv() -> Result<()> {
    let (mut service, _temp) = funded_service("1000")?;
    service.add(expense("02-01-2024", "Groceries", "150.25", "Food"))?;

    let mut out = Vec::new();
    let count = Exporter::new(&service).export_transactions_csv(&mut out)?;
    assert_eq!(count, 2);

    let text = String::from_utf8(out)?;
    assert_eq!(
        text,
        "Date,Description,Amount,Category\n\
         01-01-2024,Salary,1000,Salary\n\
         02-01-2024,Groceries,-150.25,Food\n"
    );
    Ok(())
}

#[test]
fn test_export_full_json() -> Result<()> {
    let (mut service, _temp) = funded_service("1000")?;
    service.set_budget("Food", "200")?;
    service.add(expense("02-01-2024", "Groceries", "150", "Food"))?;

    let mut out = Vec::new();
    let snapshot = Exporter::new(&service).export_full_json(&mut out)?;
    assert_eq!(snapshot.transactions.len(), 2);
    assert_eq!(snapshot.balance, money("850"));

    let json: Value = serde_json::from_slice(&out)?;
    assert_eq!(json["balance"].as_f64(), Some(850.0));
    assert_eq!(json["budgets"]["Food"].as_f64(), Some(200.0));
    assert_eq!(json["transactions"][1]["amount"].as_f64(), Some(-150.0));
    Ok(())
}
