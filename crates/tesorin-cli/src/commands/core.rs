//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_planner` - Build the planner from the policy file
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tesorin_core::{db::Database, policy::default_policy_path, Planner, PlanningPolicy};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Build the planner from an explicit policy file, the data-dir override, or the built-in policy
pub fn load_planner(policy_path: Option<&Path>) -> Result<Planner<'static>> {
    let policy = match policy_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Policy file not found: {}", path.display());
            }
            debug!(path = %path.display(), "Using policy file");
            PlanningPolicy::from_path(path)
                .with_context(|| format!("Failed to load policy from {}", path.display()))?
        }
        None => PlanningPolicy::load().context("Failed to load planning policy")?,
    };
    Ok(Planner::new(policy))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let stats = db.stats().context("Failed to read database")?;
    println!("   Profiles stored: {}", stats.profiles);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    if let Some(path) = default_policy_path() {
        if path.exists() {
            println!("   Policy override: {}", path.display());
        } else {
            println!("   Policy: built-in (override at {})", path.display());
        }
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Save your numbers: tesorin profile set --country IN --income 50000 --expenses 30000");
    println!("  2. See your plan: tesorin dashboard");
    println!("  3. Start web UI: tesorin serve");

    Ok(())
}
