//! Wallet command implementations (list, add, tx, stats)

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use tesorin_core::{db::Database, models::NewWalletTransaction};

use super::{money, parse_date, user_country};

/// Resolve an explicit wallet id, or the user's first wallet
fn resolve_wallet(db: &Database, user_id: &str, wallet: Option<i64>) -> Result<i64> {
    match wallet {
        Some(id) => Ok(id),
        None => db
            .list_wallets(user_id)?
            .first()
            .map(|w| w.id)
            .context("No wallet available"),
    }
}

/// Resolve optional period arguments, defaulting to this month so far
pub fn resolve_period(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let start = match start {
        Some(s) => parse_date(s)?,
        None => NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today),
    };
    let end = match end {
        Some(s) => parse_date(s)?,
        None => today,
    };
    Ok((start, end))
}

pub fn cmd_wallet_list(db: &Database, user_id: &str) -> Result<()> {
    let wallets = db.list_wallets(user_id)?;

    println!();
    println!("👛 Wallets");
    println!("   ─────────────────────────────");
    for wallet in wallets {
        println!("   #{:<4} {}", wallet.id, wallet.name);
    }
    println!();

    Ok(())
}

pub fn cmd_wallet_add(db: &Database, user_id: &str, name: &str) -> Result<()> {
    let id = db.upsert_wallet(user_id, name)?;
    db.log_audit(
        user_id,
        "create",
        Some("wallet"),
        Some(id),
        Some(&format!("name={}", name.trim())),
    )?;
    println!("✓ Wallet #{}: {}", id, name.trim());
    Ok(())
}

pub fn cmd_wallet_tx(
    db: &Database,
    user_id: &str,
    wallet: Option<i64>,
    tx: &NewWalletTransaction,
) -> Result<()> {
    let wallet_id = resolve_wallet(db, user_id, wallet)?;
    let created = db.add_wallet_transaction(user_id, wallet_id, tx)?;

    db.log_audit(
        user_id,
        "create",
        Some("wallet_transaction"),
        Some(created.id),
        Some(&format!("wallet={}, amount={}", wallet_id, created.amount)),
    )?;

    let c = user_country(db, user_id)?;
    let kind = if created.amount < 0.0 {
        "expense"
    } else {
        "income"
    };
    println!(
        "✓ Recorded {} {} on {} ({})",
        kind,
        money(c, created.amount.abs()),
        created.date,
        created.category
    );

    Ok(())
}

pub fn cmd_wallet_stats(
    db: &Database,
    user_id: &str,
    wallet: Option<i64>,
    start: NaiveDate,
    end: NaiveDate,
    show_entries: bool,
) -> Result<()> {
    let wallet_id = resolve_wallet(db, user_id, wallet)?;
    let stats = db.wallet_stats(user_id, wallet_id, start, end)?;
    let c = user_country(db, user_id)?;

    println!();
    println!(
        "📈 Wallet #{}: {} to {}",
        wallet_id,
        stats.start.unwrap_or(start),
        stats.end.unwrap_or(end)
    );
    println!("   ─────────────────────────────");
    println!("   Income:    {}", money(c, stats.income));
    println!("   Expenses:  {}", money(c, stats.expenses));
    println!("   Balance:   {}", money(c, stats.balance));
    println!("   Entries:   {}", stats.transaction_count);

    if show_entries {
        let transactions = db.list_wallet_transactions(user_id, wallet_id, start, end)?;
        if !transactions.is_empty() {
            println!();
            for tx in transactions {
                println!(
                    "   {}  {:>12}  {:<14} {}",
                    tx.date,
                    money(c, tx.amount),
                    tx.category,
                    tx.note
                );
            }
        }
    }
    println!();

    Ok(())
}
