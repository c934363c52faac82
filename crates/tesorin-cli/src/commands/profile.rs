//! Profile command implementations (show, set, reset)

use std::io::{self, Write};

use anyhow::Result;
use tesorin_core::{
    db::Database,
    models::{EmploymentStatus, MoneyFeeling, PrimaryFocus},
    Profile,
};
use tracing::info;

use super::money;
use crate::cli::ProfileSetArgs;

pub fn cmd_profile_show(db: &Database, user_id: &str) -> Result<()> {
    let Some(profile) = db.get_profile(user_id)? else {
        println!("No profile saved for '{}'. Save one with:", user_id);
        println!("  tesorin profile set --country IN --income 50000 --expenses 30000");
        return Ok(());
    };

    let s = &profile.snapshot;
    let c = s.country;

    println!();
    println!("👤 Profile ({})", user_id);
    println!("   ─────────────────────────────────────────");
    println!("   Country:          {}", c.display_name());
    println!("   Monthly income:   {}", money(c, s.monthly_income));
    println!("   Monthly expenses: {}", money(c, s.monthly_expenses));
    println!("   Savings:          {}", money(c, s.current_savings));
    let high = if s.has_high_interest_debt {
        " (high interest)"
    } else {
        ""
    };
    println!("   Debt:             {}{}", money(c, s.current_debt), high);
    println!();
    println!("   Age:              {}", profile.age);
    println!(
        "   Employment:       {}",
        profile.employment_status.label()
    );
    println!(
        "   Household:        {} ({} dependents)",
        profile.household_size, profile.dependents
    );
    println!("   Focus:            {}", profile.primary_focus.label());
    println!("   Risk comfort:     {}/5", profile.risk_comfort);
    println!("   Money feels:      {}", profile.money_feeling);
    if !profile.goals.is_empty() {
        println!("   Goals:            {}", profile.goals.join(", "));
    }
    println!();

    Ok(())
}

/// Build the updated profile from flags over the stored one
pub fn apply_profile_args(base: Profile, args: &ProfileSetArgs) -> Result<Profile> {
    let snapshot = args.snapshot.apply(base.snapshot)?;

    let employment_status = match &args.employment {
        Some(e) => e
            .parse::<EmploymentStatus>()
            .map_err(anyhow::Error::msg)?,
        None => base.employment_status,
    };
    let primary_focus = match &args.focus {
        Some(f) => f.parse::<PrimaryFocus>().map_err(anyhow::Error::msg)?,
        None => base.primary_focus,
    };
    let money_feeling = match &args.feeling {
        Some(f) => f.parse::<MoneyFeeling>().map_err(anyhow::Error::msg)?,
        None => base.money_feeling,
    };
    let goals = match &args.goals {
        Some(goals) => goals
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect(),
        None => base.goals,
    };

    Ok(Profile {
        snapshot,
        age: args.age.unwrap_or(base.age),
        employment_status,
        household_size: args.household.unwrap_or(base.household_size),
        dependents: args.dependents.unwrap_or(base.dependents),
        primary_focus,
        risk_comfort: args.risk.unwrap_or(base.risk_comfort),
        money_feeling,
        goals,
    })
}

pub fn cmd_profile_set(db: &Database, user_id: &str, args: &ProfileSetArgs) -> Result<()> {
    let base = db.get_profile_or_default(user_id)?;
    let profile = apply_profile_args(base, args)?;

    db.save_profile(user_id, &profile)?;
    db.log_audit(
        user_id,
        "update",
        Some("profile"),
        None,
        Some(&format!("country={}", profile.snapshot.country)),
    )?;
    info!(user = %user_id, "Profile saved");

    println!("✓ Profile saved for '{}'", user_id);
    println!("  See your plan with: tesorin dashboard");

    Ok(())
}

pub fn cmd_profile_reset(db: &Database, user_id: &str, yes: bool) -> Result<()> {
    if !yes {
        print!("⚠️  Delete the stored profile for '{}'? [y/N] ", user_id);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if db.delete_profile(user_id)? {
        db.log_audit(user_id, "delete", Some("profile"), None, None)?;
        println!("✓ Profile deleted");
    } else {
        println!("No profile saved for '{}'", user_id);
    }

    Ok(())
}
