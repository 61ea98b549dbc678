use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::domain::{Money, Transaction, checked_balance, compute_balance};

use super::{read_json_or_default, write_json};

/// On-disk shape of the ledger file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    balance: Money,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// Ordered transactions plus the running balance, backed by one JSON file.
/// After every mutation `balance` equals the sum of all transaction amounts.
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
    transactions: Vec<Transaction>,
    balance: Money,
}

impl LedgerStore {
    /// An empty ledger that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            transactions: Vec::new(),
            balance: Money::ZERO,
        }
    }

    /// Load the ledger from `path`. A missing file yields an empty ledger.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file: LedgerFile = read_json_or_default(&path)?;
        if checked_balance(&file.transactions).is_none() {
            bail!("Balance of {} is out of range", path.display());
        }
        for index in zero_amount_positions(&file.transactions) {
            tracing::warn!(
                path = %path.display(),
                number = index + 1,
                "loaded transaction has a zero amount"
            );
        }

        let mut store = Self {
            path,
            transactions: file.transactions,
            balance: file.balance,
        };
        let stored_balance = store.balance;
        store.recompute_balance();
        if store.balance != stored_balance {
            tracing::warn!(
                stored = %stored_balance,
                computed = %store.balance,
                "stored balance did not match transactions, using computed balance"
            );
        }
        tracing::debug!(
            transactions = store.transactions.len(),
            balance = %store.balance,
            "ledger loaded"
        );
        Ok(store)
    }

    /// Overwrite the ledger file with the current state.
    pub fn save(&self) -> Result<()> {
        let file = LedgerFile {
            balance: self.balance,
            transactions: self.transactions.clone(),
        };
        write_json(&self.path, &file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.transactions.get(index)
    }

    /// Append a transaction at the end of the ledger.
    pub fn append(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
        self.recompute_balance();
    }

    /// Replace the transaction at `index`, returning the previous one.
    /// Returns `None` (and changes nothing) if the index is out of range.
    pub fn replace(&mut self, index: usize, transaction: Transaction) -> Option<Transaction> {
        let slot = self.transactions.get_mut(index)?;
        let previous = std::mem::replace(slot, transaction);
        self.recompute_balance();
        Some(previous)
    }

    /// Remove the transaction at `index`, returning it.
    /// Returns `None` (and changes nothing) if the index is out of range.
    pub fn remove(&mut self, index: usize) -> Option<Transaction> {
        if index >= self.transactions.len() {
            return None;
        }
        let removed = self.transactions.remove(index);
        self.recompute_balance();
        Some(removed)
    }

    /// Put a transaction back at `index` (used to undo a removal).
    pub(crate) fn insert(&mut self, index: usize, transaction: Transaction) {
        let index = index.min(self.transactions.len());
        self.transactions.insert(index, transaction);
        self.recompute_balance();
    }

    /// Drop every transaction; the balance goes back to zero.
    pub fn clear(&mut self) -> Vec<Transaction> {
        let drained = std::mem::take(&mut self.transactions);
        self.recompute_balance();
        drained
    }

    /// Restore a previously taken set of transactions.
    pub(crate) fn restore(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
        self.recompute_balance();
    }

    /// Recompute the balance from scratch.
    pub fn recompute_balance(&mut self) {
        self.balance = compute_balance(&self.transactions);
    }
}

/// Positions of transactions whose amount is zero. These are never created
/// through the service but may appear in a hand-edited file.
fn zero_amount_positions(transactions: &[Transaction]) -> Vec<usize> {
    transactions
        .iter()
        .enumerate()
        .filter(|(_, t)| t.amount.is_zero())
        .map(|(index, _)| index)
        .collect()
}
