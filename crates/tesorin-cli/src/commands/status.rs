//! Status-related command implementations (status, audit, reset)

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use tesorin_core::{db::Database, policy::default_policy_path};

use super::open_db;

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use std::fs;
    use tesorin_core::db::DB_KEY_ENV;

    println!();
    println!("📊 Tesorin Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    // Check encryption status
    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    // Policy source
    match default_policy_path() {
        Some(path) if path.exists() => println!("   Policy: {}", path.display()),
        _ => println!("   Policy: built-in"),
    }

    // Try to open the database and show stats
    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if let Ok(stats) = db.stats() {
                    println!();
                    println!("   Profiles: {}", stats.profiles);
                    println!("   Goals: {}", stats.goals);
                    println!("   Wallets: {}", stats.wallets);
                    println!("   Wallet entries: {}", stats.wallet_transactions);
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}

pub fn cmd_audit(db: &Database, user_id: &str, limit: i64) -> Result<()> {
    let entries = db.list_audit_log(user_id, limit.max(1))?;

    if entries.is_empty() {
        println!("No audit entries for '{}'", user_id);
        return Ok(());
    }

    println!();
    println!("📜 Audit Log ({})", user_id);
    println!("   ─────────────────────────────────────────────────────────────");
    for entry in entries {
        let entity = match (&entry.entity_type, entry.entity_id) {
            (Some(t), Some(id)) => format!("{} #{}", t, id),
            (Some(t), None) => t.clone(),
            _ => String::new(),
        };
        println!(
            "   {}  {:<10} {:<24} {}",
            entry.timestamp,
            entry.action,
            entity,
            entry.details.as_deref().unwrap_or("")
        );
    }
    println!();

    Ok(())
}

/// Delete everything stored for a user ("reset local data")
pub fn cmd_reset(db: &Database, user_id: &str, yes: bool) -> Result<()> {
    if !yes {
        print!(
            "⚠️  This will delete the profile, goals and wallets for '{}'.\n\n",
            user_id
        );
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    db.reset_user(user_id)?;
    db.log_audit(user_id, "reset", Some("user"), None, None)?;

    println!("✅ All data for '{}' deleted.", user_id);
    Ok(())
}
