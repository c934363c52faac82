//! Wallet and wallet transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{format_date, parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewWalletTransaction, Wallet, WalletTransaction, DEFAULT_WALLET_NAME};
use crate::wallet::{compute_wallet_stats, normalize_period, WalletStats};

fn wallet_from_row(row: &Row<'_>) -> rusqlite::Result<Wallet> {
    let created_at: String = row.get(3)?;
    Ok(Wallet {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&created_at),
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<WalletTransaction> {
    let date: String = row.get(2)?;
    let created_at: String = row.get(6)?;
    Ok(WalletTransaction {
        id: row.get(0)?,
        wallet_id: row.get(1)?,
        date: parse_date(&date)?,
        category: row.get(3)?,
        note: row.get(4)?,
        amount: row.get(5)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Create or get a wallet by name
    pub fn upsert_wallet(&self, user_id: &str, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("wallet name cannot be empty".to_string()));
        }
        let conn = self.conn()?;

        let id = conn.query_row(
            r#"
            INSERT INTO wallets (user_id, name) VALUES (?1, ?2)
            ON CONFLICT(user_id, name) DO UPDATE SET name = excluded.name
            RETURNING id
            "#,
            params![user_id, name],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    /// List a user's wallets, creating the default wallet on first use
    pub fn list_wallets(&self, user_id: &str) -> Result<Vec<Wallet>> {
        let wallets = self.query_wallets(user_id)?;
        if !wallets.is_empty() {
            return Ok(wallets);
        }

        self.upsert_wallet(user_id, DEFAULT_WALLET_NAME)?;
        self.query_wallets(user_id)
    }

    fn query_wallets(&self, user_id: &str) -> Result<Vec<Wallet>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, created_at FROM wallets WHERE user_id = ? ORDER BY id",
        )?;

        let wallets = stmt
            .query_map(params![user_id], wallet_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(wallets)
    }

    /// Get one of a user's wallets
    pub fn get_wallet(&self, user_id: &str, id: i64) -> Result<Option<Wallet>> {
        let conn = self.conn()?;
        let wallet = conn
            .query_row(
                "SELECT id, user_id, name, created_at FROM wallets WHERE user_id = ? AND id = ?",
                params![user_id, id],
                wallet_from_row,
            )
            .optional()?;

        Ok(wallet)
    }

    fn require_wallet(&self, user_id: &str, wallet_id: i64) -> Result<Wallet> {
        self.get_wallet(user_id, wallet_id)?
            .ok_or_else(|| Error::NotFound(format!("Wallet {} not found", wallet_id)))
    }

    /// Record an entry in a wallet
    pub fn add_wallet_transaction(
        &self,
        user_id: &str,
        wallet_id: i64,
        tx: &NewWalletTransaction,
    ) -> Result<WalletTransaction> {
        if !tx.amount.is_finite() {
            return Err(Error::InvalidData("amount must be a number".to_string()));
        }
        self.require_wallet(user_id, wallet_id)?;

        let conn = self.conn()?;
        let note = tx.note.as_deref().unwrap_or("").trim().to_string();
        conn.execute(
            "INSERT INTO wallet_transactions (wallet_id, date, category, note, amount) VALUES (?, ?, ?, ?, ?)",
            params![
                wallet_id,
                format_date(tx.date),
                tx.category_or_default(),
                note,
                tx.amount
            ],
        )?;
        let id = conn.last_insert_rowid();

        let created = conn.query_row(
            "SELECT id, wallet_id, date, category, note, amount, created_at FROM wallet_transactions WHERE id = ?",
            params![id],
            transaction_from_row,
        )?;

        Ok(created)
    }

    /// Entries in a wallet dated within `start..=end`, oldest first
    pub fn list_wallet_transactions(
        &self,
        user_id: &str,
        wallet_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WalletTransaction>> {
        self.require_wallet(user_id, wallet_id)?;
        let (start, end) = normalize_period(start, end);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, wallet_id, date, category, note, amount, created_at
            FROM wallet_transactions
            WHERE wallet_id = ? AND date >= ? AND date <= ?
            ORDER BY date, id
            "#,
        )?;

        let transactions = stmt
            .query_map(
                params![wallet_id, format_date(start), format_date(end)],
                transaction_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Totals for a wallet over `start..=end`
    pub fn wallet_stats(
        &self,
        user_id: &str,
        wallet_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WalletStats> {
        let transactions = self.list_wallet_transactions(user_id, wallet_id, start, end)?;
        Ok(compute_wallet_stats(&transactions, start, end))
    }
}
