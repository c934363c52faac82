//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_planner)
//! - `goals` - Tracked goal commands (list, add, contribute, delete, estimate)
//! - `plan` - Plan, dashboard and next-step guidance
//! - `profile` - Profile commands (show, set, reset)
//! - `serve` - Web server command
//! - `status` - Status, audit log and reset commands
//! - `wallet` - Wallet commands (list, add, tx, stats)

pub mod core;
pub mod goals;
pub mod plan;
pub mod profile;
pub mod serve;
pub mod status;
pub mod wallet;

// Re-export command functions for main.rs
pub use core::*;
pub use goals::*;
pub use plan::*;
pub use profile::*;
pub use serve::*;
pub use status::*;
pub use wallet::*;

use anyhow::Result;
use chrono::NaiveDate;
use tesorin_core::{db::Database, Country};

/// Format an amount with the country's currency symbol
pub fn money(country: Country, amount: f64) -> String {
    let symbol = country.currency_symbol();
    if amount < 0.0 {
        format!("-{}{:.2}", symbol, -amount)
    } else {
        format!("{}{:.2}", symbol, amount)
    }
}

/// Currency for amounts: the stored profile's country, or the default
pub fn user_country(db: &Database, user_id: &str) -> Result<Country> {
    Ok(db
        .get_profile(user_id)?
        .map(|p| p.snapshot.country)
        .unwrap_or_default())
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{}' (expected YYYY-MM-DD)", s))
}

/// Text progress bar for a 0-100 percentage
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
