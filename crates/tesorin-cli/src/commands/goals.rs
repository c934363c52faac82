//! Tracked goal command implementations

use anyhow::Result;
use chrono::Datelike;
use tesorin_core::{
    db::Database,
    models::{GoalKind, NewTrackedGoal, Timeframe},
    planner,
};

use super::{money, progress_bar, user_country};
use crate::cli::GoalAddArgs;

pub fn cmd_goals_list(db: &Database, user_id: &str) -> Result<()> {
    let goals = db.list_goals(user_id)?;

    if goals.is_empty() {
        println!("No tracked goals. Add one with:");
        println!("  tesorin goals add \"New laptop\" --target 1200 --year 2027");
        return Ok(());
    }

    let c = user_country(db, user_id)?;

    println!();
    println!("🎯 Tracked Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    for goal in goals {
        let year = goal
            .target_year
            .map(|y| format!(" by {}", y))
            .unwrap_or_default();
        println!(
            "   #{:<4} {} ({}){}",
            goal.id,
            goal.name,
            goal.kind.label(),
            year
        );
        println!(
            "         {} {:>3}%  {} of {}",
            progress_bar(goal.progress_percent(), 20),
            goal.progress_percent(),
            money(c, goal.amount_saved),
            money(c, goal.target_amount)
        );
        if goal.monthly_target > 0.0 {
            println!("         Monthly: {}", money(c, goal.monthly_target));
        }
        if let Some(why) = &goal.why {
            println!("         Why: {}", why);
        }
    }
    println!();

    Ok(())
}

/// Build the goal to store from command-line arguments
pub fn goal_from_args(args: &GoalAddArgs, current_year: i32) -> Result<NewTrackedGoal> {
    let kind = args.kind.parse::<GoalKind>().map_err(anyhow::Error::msg)?;

    let monthly_target = match (args.monthly, args.year) {
        (Some(monthly), _) => monthly,
        (None, Some(year)) => planner::monthly_goal_contribution(args.target, year, current_year),
        (None, None) => 0.0,
    };

    let timeframe = match args.year.map(|y| y.saturating_sub(current_year)) {
        Some(years) if years <= 0 => Timeframe::Next6To12Months,
        Some(years) if years <= 3 => Timeframe::Next2To3Years,
        Some(_) => Timeframe::MoreThan3Years,
        None => Timeframe::default(),
    };

    let goal = NewTrackedGoal {
        name: args.name.trim().to_string(),
        kind,
        target_amount: args.target,
        target_year: args.year,
        monthly_target,
        timeframe,
        why: args.why.clone(),
    };
    goal.validate()?;
    Ok(goal)
}

pub fn cmd_goals_add(db: &Database, user_id: &str, args: &GoalAddArgs) -> Result<()> {
    let goal = goal_from_args(args, chrono::Local::now().year())?;
    let id = db.upsert_goal(user_id, &goal)?;

    db.log_audit(
        user_id,
        "upsert",
        Some("goal"),
        Some(id),
        Some(&format!("name={}, target={}", goal.name, goal.target_amount)),
    )?;

    let c = user_country(db, user_id)?;
    println!("✓ Tracking goal #{}: {}", id, goal.name);
    if goal.monthly_target > 0.0 {
        println!("  Plan to save {} per month", money(c, goal.monthly_target));
    }

    Ok(())
}

pub fn cmd_goals_contribute(db: &Database, user_id: &str, id: i64, amount: f64) -> Result<()> {
    let goal = db.add_goal_contribution(user_id, id, amount)?;

    db.log_audit(
        user_id,
        "contribute",
        Some("goal"),
        Some(id),
        Some(&format!("amount={}", amount)),
    )?;

    let c = user_country(db, user_id)?;
    println!(
        "✓ {}: {} saved {} {}%",
        goal.name,
        money(c, goal.amount_saved),
        progress_bar(goal.progress_percent(), 20),
        goal.progress_percent()
    );
    if goal.progress_percent() >= 100 {
        println!("  🎉 Goal reached!");
    }

    Ok(())
}

pub fn cmd_goals_delete(db: &Database, user_id: &str, id: i64) -> Result<()> {
    if !db.delete_goal(user_id, id)? {
        anyhow::bail!("Goal {} not found", id);
    }
    db.log_audit(user_id, "delete", Some("goal"), Some(id), None)?;
    println!("✓ Goal #{} deleted", id);
    Ok(())
}

pub fn cmd_goals_estimate(db: &Database, user_id: &str, target: f64, year: i32) -> Result<()> {
    if !target.is_finite() || target < 0.0 {
        anyhow::bail!("--target cannot be negative");
    }

    let current_year = chrono::Local::now().year();
    let monthly = planner::monthly_goal_contribution(target, year, current_year);
    let years = planner::goal_horizon_years(year, current_year);
    let c = user_country(db, user_id)?;

    println!(
        "To reach {} by {}, save about {} per month ({} year{}).",
        money(c, target),
        year,
        money(c, monthly),
        years,
        if years == 1 { "" } else { "s" }
    );

    Ok(())
}
