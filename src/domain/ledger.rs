use super::{Money, Transaction};

/// Compute the balance from a list of transactions.
/// Balance = sum of all signed amounts, saturating at the `Money` range.
pub fn compute_balance(transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .fold(Money::ZERO, |acc, t| acc.saturating_add(t.amount))
}

/// Balance of a (possibly projected) ledger, or `None` if any running sum
/// leaves the `Money` range.
pub fn checked_balance<'a, I>(transactions: I) -> Option<Money>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .try_fold(Money::ZERO, |acc, t| acc.checked_add(t.amount))
}

/// Sum of the expense amounts recorded in a category.
/// The result is zero or negative, matching the sign of stored expenses.
pub fn spent_in_category(category: &str, transactions: &[Transaction]) -> Money {
    transactions
        .iter()
        .filter(|t| t.category == category && t.is_expense())
        .fold(Money::ZERO, |acc, t| acc.saturating_add(t.amount))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::domain::{TransactionKind, parse_date};

    fn d(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn make(amount: &str, category: &str, kind: TransactionKind) -> Transaction {
        Transaction::new(
            parse_date("01-01-2024").unwrap(),
            "test",
            d(amount),
            category,
            kind,
        )
    }

    #[test]
    fn test_compute_balance_empty() {
        assert_eq!(compute_balance(&[]), Money::ZERO);
    }

    #[test]
    fn test_compute_balance_mixed() {
        let transactions = vec![
            make("1000", "Salary", TransactionKind::Income),
            make("150", "Food", TransactionKind::Expense),
            make("0.10", "Food", TransactionKind::Expense),
            make("0.20", "Food", TransactionKind::Expense),
        ];

        assert_eq!(compute_balance(&transactions), d("849.70"));
    }

    #[test]
    fn test_checked_balance_detects_overflow() {
        let transactions = vec![
            Transaction::new(
                parse_date("01-01-2024").unwrap(),
                "max",
                Money::MAX,
                "Salary",
                TransactionKind::Income,
            ),
            make("1", "Salary", TransactionKind::Income),
        ];

        assert_eq!(checked_balance(&transactions[..1]), Some(Money::MAX));
        assert_eq!(checked_balance(&transactions), None);
        assert_eq!(compute_balance(&transactions), Money::MAX);
    }

    #[test]
    fn test_spent_in_category_ignores_income_and_other_categories() {
        let transactions = vec![
            make("1000", "Salary", TransactionKind::Income),
            make("150", "Food", TransactionKind::Expense),
            make("40", "Food", TransactionKind::Income),
            make("700", "Rent", TransactionKind::Expense),
        ];

        assert_eq!(spent_in_category("Food", &transactions), d("-150"));
        assert_eq!(spent_in_category("Rent", &transactions), d("-700"));
        assert_eq!(spent_in_category("Travel", &transactions), Money::ZERO);
    }
}
