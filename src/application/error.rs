use thiserror::Error;

use crate::domain::{BudgetCheckError, Money, format_currency};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(
        "Insufficient balance: available {}, required {}",
        currency(.available),
        currency(.required)
    )]
    InsufficientBalance { available: Money, required: Money },

    #[error("This purchase exceeds your {category} budget by {}", currency(.overrun))]
    BudgetExceeded {
        category: String,
        limit: Money,
        remaining: Money,
        overrun: Money,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

fn currency(amount: &Money) -> String {
    format_currency(*amount)
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Errors the user can fix by changing the input, as opposed to storage failures.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Storage(_))
    }
}

impl From<BudgetCheckError> for AppError {
    fn from(err: BudgetCheckError) -> Self {
        let overrun = err.overrun();
        match err {
            BudgetCheckError::Exceeded {
                category,
                limit,
                remaining,
                ..
            } => AppError::BudgetExceeded {
                category,
                limit,
                remaining,
                overrun,
            },
        }
    }
}
