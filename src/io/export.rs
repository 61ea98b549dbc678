use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::TransactionService;
use crate::domain::{BudgetLimits, Money, Transaction, format_date};

/// Snapshot of all data for a JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub balance: Money,
    pub transactions: Vec<Transaction>,
    pub budgets: BudgetLimits,
}

/// Exporter for writing ledger data to other formats
pub struct Exporter<'a> {
    service: &'a TransactionService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a TransactionService) -> Self {
        Self { service }
    }

    /// Export transactions to CSV: one row per transaction, signed raw amount.
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        write_transactions_csv(self.service.transactions(), writer)
    }

    /// Export balance, transactions and budgets as one JSON document
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DataSnapshot> {
        let snapshot = DataSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            balance: self.service.balance(),
            transactions: self.service.transactions().to_vec(),
            budgets: self.service.budgets().limits().clone(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

/// Write transactions as CSV with a `Date,Description,Amount,Category` header.
pub fn write_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Date", "Description", "Amount", "Category"])?;

    let mut count = 0;
    for transaction in transactions {
        csv_writer.write_record([
            format_date(transaction.date),
            transaction.description.clone(),
            transaction.amount.to_string(),
            transaction.category.clone(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    tracing::debug!(rows = count, "transactions exported to csv");
    Ok(count)
}
