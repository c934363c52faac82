//! Wallet statistics over a date period

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::WalletTransaction;

/// Totals for a wallet over an inclusive period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WalletStats {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Sum of all entries in the period
    pub balance: f64,
    /// Sum of positive entries
    pub income: f64,
    /// Sum of negative entries, as a positive number
    pub expenses: f64,
    /// Net change over the period (same as balance for a single period)
    pub change: f64,
    pub transaction_count: usize,
}

/// Order a period so that start <= end
pub fn normalize_period(start: NaiveDate, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// Entries dated within `start..=end`
pub fn transactions_in_period(
    transactions: &[WalletTransaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&WalletTransaction> {
    let (start, end) = normalize_period(start, end);
    transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .collect()
}

/// Compute wallet totals for `start..=end`
pub fn compute_wallet_stats(
    transactions: &[WalletTransaction],
    start: NaiveDate,
    end: NaiveDate,
) -> WalletStats {
    let (start, end) = normalize_period(start, end);
    let in_period = transactions_in_period(transactions, start, end);

    let balance: f64 = in_period.iter().map(|t| t.amount).sum();
    let income: f64 = in_period
        .iter()
        .filter(|t| t.amount > 0.0)
        .map(|t| t.amount)
        .sum();
    let expenses: f64 = in_period
        .iter()
        .filter(|t| t.amount < 0.0)
        .map(|t| -t.amount)
        .sum();

    WalletStats {
        start: Some(start),
        end: Some(end),
        balance,
        income,
        expenses,
        change: balance,
        transaction_count: in_period.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tx(id: i64, date: &str, amount: f64) -> WalletTransaction {
        WalletTransaction {
            id,
            wallet_id: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category: "General".to_string(),
            note: String::new(),
            amount,
            created_at: Utc::now(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_stats_inclusive_period() {
        let txns = vec![
            tx(1, "2026-01-01", 3000.0),
            tx(2, "2026-01-15", -1200.0),
            tx(3, "2026-01-31", -300.0),
            tx(4, "2026-02-01", -50.0),
        ];

        let stats = compute_wallet_stats(&txns, day("2026-01-01"), day("2026-01-31"));
        assert_eq!(stats.transaction_count, 3);
        assert_eq!(stats.balance, 1500.0);
        assert_eq!(stats.income, 3000.0);
        assert_eq!(stats.expenses, 1500.0);
        assert_eq!(stats.change, stats.balance);
    }

    #[test]
    fn test_reversed_period_is_normalized() {
        let txns = vec![tx(1, "2026-03-10", -20.0)];
        let stats = compute_wallet_stats(&txns, day("2026-03-31"), day("2026-03-01"));
        assert_eq!(stats.transaction_count, 1);
        assert_eq!(stats.start, Some(day("2026-03-01")));
        assert_eq!(stats.expenses, 20.0);
    }

    #[test]
    fn test_empty_period() {
        let stats = compute_wallet_stats(&[], day("2026-03-01"), day("2026-03-01"));
        assert_eq!(stats.transaction_count, 0);
        assert_eq!(stats.balance, 0.0);
    }
}
