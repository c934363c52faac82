//! Planning command implementations (plan, dashboard, next-step)

use anyhow::{Context, Result};
use tesorin_core::{
    db::Database,
    goals::find_emergency_goal,
    models::{GoalKind, Timeframe},
    store::{load_or_default, save_best_effort},
    CashflowStatus, NextStepAnswers, NextStepPlan, PlanSummary, Planner,
};

use super::{money, progress_bar};
use crate::cli::{NextStepArgs, SnapshotArgs};

/// Show the plan for a snapshot built from flags over the stored profile
pub fn cmd_plan(
    db: &Database,
    user_id: &str,
    planner: &Planner<'_>,
    args: &SnapshotArgs,
    save: bool,
    json: bool,
) -> Result<()> {
    let stored = load_or_default(db, user_id);
    let snapshot = args.apply(stored)?;

    let summary = planner.summarize(&snapshot);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize plan")?
        );
    } else {
        if args.is_empty() {
            println!();
            println!("   Using stored profile for '{}'", user_id);
        }
        print_summary(&summary);
    }

    if save {
        if save_best_effort(db, user_id, &snapshot) {
            if !json {
                println!("   ✓ Snapshot saved to profile");
            }
        } else {
            eprintln!("   ⚠️  Could not save snapshot (plan shown above is still valid)");
        }
    }

    Ok(())
}

/// Print a plan summary
pub fn print_summary(summary: &PlanSummary) {
    let c = summary.country;
    let plan = &summary.plan;

    println!();
    println!("📊 Monthly Plan ({})", c.display_name());
    println!("   ─────────────────────────────────────────");

    let status = match summary.cashflow_status {
        CashflowStatus::Surplus => "✅ surplus",
        CashflowStatus::BreakEven => "➖ break-even",
        CashflowStatus::Deficit => "⚠️  deficit",
    };
    println!("   Cashflow:          {} ({})", money(c, summary.cashflow), status);
    println!("   Net worth:         {}", money(c, summary.net_worth));
    println!(
        "   Savings rate:      {:.1}% (target {:.0}-{:.0}%)",
        summary.savings_rate, summary.savings_rate_target.0, summary.savings_rate_target.1
    );
    println!(
        "   Emergency fund:    {} target",
        money(c, summary.emergency_fund_target)
    );

    println!();
    if plan.has_allocation() {
        println!("   💰 Save {} per month:", money(c, plan.recommended_saving));
        println!(
            "      Emergency fund:  {}",
            money(c, plan.emergency_share_amount)
        );
        println!(
            "      Investing:       {}",
            money(c, plan.investing_share_amount)
        );
        if plan.debt_share_amount > 0.0 {
            println!("      Debt payoff:     {}", money(c, plan.debt_share_amount));
        }
    } else {
        println!("   No money left over each month yet.");
        println!("   First step: bring expenses below income, even by a little.");
    }
    println!();
}

/// Dashboard for the stored profile
pub fn cmd_dashboard(db: &Database, user_id: &str, planner: &Planner<'_>) -> Result<()> {
    let stored = db.get_profile(user_id)?;
    let profile = stored.clone().unwrap_or_default();
    let summary = planner.summarize(&profile.snapshot);
    let c = profile.snapshot.country;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│          💰 Tesorin Dashboard           │");
    println!("╰─────────────────────────────────────────╯");

    if stored.is_none() {
        println!();
        println!("  No profile saved yet. Start with:");
        println!("    tesorin profile set --country IN --income 50000 --expenses 30000");
    }

    print_summary(&summary);

    let goals = db.list_goals(user_id)?;
    if let Some(goal) = find_emergency_goal(&goals) {
        println!(
            "  🛟 {}: {} of {} {} {}%",
            goal.name,
            money(c, goal.amount_saved),
            money(c, goal.target_amount),
            progress_bar(goal.progress_percent(), 20),
            goal.progress_percent()
        );
    }

    let picked = profile.dashboard_goals();
    if !picked.is_empty() {
        println!("  🎯 Your goals: {}", picked.join(", "));
    }

    let others: Vec<_> = goals.iter().filter(|g| !g.is_emergency_fund()).collect();
    if !others.is_empty() {
        println!();
        println!("  Tracked goals:");
        for goal in others {
            println!(
                "    {:<24} {} {:>3}%",
                goal.name,
                progress_bar(goal.progress_percent(), 20),
                goal.progress_percent()
            );
        }
    }
    println!();

    Ok(())
}

/// Next-step guidance for the stored profile
pub fn cmd_next_step(
    db: &Database,
    user_id: &str,
    planner: &Planner<'_>,
    args: &NextStepArgs,
) -> Result<()> {
    let answers = NextStepAnswers {
        kind: args.kind.parse::<GoalKind>().map_err(anyhow::Error::msg)?,
        timeframe: args
            .timeframe
            .parse::<Timeframe>()
            .map_err(anyhow::Error::msg)?,
        nickname: args.nickname.clone(),
        why: args.why.clone(),
        target_amount: args.target,
        monthly_amount: args.monthly,
        risk: args.risk,
    };
    if !(1..=5).contains(&answers.risk) {
        anyhow::bail!("--risk must be between 1 and 5");
    }
    if answers.target_amount < 0.0 || answers.monthly_amount < 0.0 {
        anyhow::bail!("--target and --monthly cannot be negative");
    }

    let snapshot = load_or_default(db, user_id);
    let plan = NextStepPlan::build_with(planner, &snapshot, &answers);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?
        );
    } else {
        print_next_step(&plan, snapshot.country);
    }

    if args.track {
        let goal = plan.to_tracked_goal(answers.why.clone());
        let id = db.upsert_goal(user_id, &goal)?;
        db.log_audit(
            user_id,
            "track",
            Some("goal"),
            Some(id),
            Some(&format!("name={}, kind={}", goal.name, goal.kind)),
        )?;
        if !args.json {
            println!("   ✓ Tracking '{}' as goal #{}", goal.name, id);
            println!();
        }
    }

    Ok(())
}

fn print_next_step(plan: &NextStepPlan, country: tesorin_core::Country) {
    println!();
    println!("🧭 Next step: {}", plan.goal_name);
    println!("   ─────────────────────────────────────────");
    println!("   {}", plan.focus);
    println!();
    println!(
        "   Monthly amount:  {}",
        money(country, plan.monthly_amount)
    );
    if plan.target_amount > 0.0 {
        println!("   Target:          {}", money(country, plan.target_amount));
    }
    println!("   Timeframe:       {}", plan.timeframe.label());
    println!();
    for action in &plan.actions {
        println!("   • {}", action);
    }
    println!();
    println!("   Next 7 days:");
    for item in &plan.next_7_days {
        println!("   ☐ {}", item);
    }
    println!();
    println!("   Next 30-90 days:");
    for item in &plan.next_30_to_90_days {
        println!("   ☐ {}", item);
    }
    println!();
}
