use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Money;

/// Dates are entered, stored and exported as day-month-year.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a `DD-MM-YYYY` date string.
pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
}

/// Format a date as `DD-MM-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (stored with a positive amount)
    Income,
    /// Money going out (stored with a negative amount)
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }

    /// Apply the sign convention to a positive magnitude.
    pub fn signed(&self, magnitude: Money) -> Money {
        match self {
            TransactionKind::Income => magnitude,
            TransactionKind::Expense => -magnitude,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded money movement.
/// Transactions have no identity of their own: their position in the ledger is
/// what edit and delete refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount: positive is income, negative is expense. Never zero.
    pub amount: Money,
    pub category: String,
}

impl Transaction {
    /// Create a transaction from a positive magnitude and its kind.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        magnitude: Money,
        category: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        assert!(
            magnitude > Money::ZERO,
            "Transaction amount must be positive"
        );
        Self {
            date,
            description: description.into(),
            amount: kind.signed(magnitude),
            category: category.into(),
        }
    }

    /// Income when the amount is positive, expense otherwise.
    pub fn kind(&self) -> TransactionKind {
        if self.amount > Money::ZERO {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Money::ZERO
    }

    /// Unsigned amount.
    pub fn magnitude(&self) -> Money {
        self.amount.abs()
    }
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
