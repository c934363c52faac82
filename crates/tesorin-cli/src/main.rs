//! Tesorin CLI - A calm first step with your money
//!
//! Usage:
//!   tesorin init                              Initialize database
//!   tesorin plan --income 50000 --expenses 30000
//!                                             Plan from a snapshot
//!   tesorin profile set --country CA ...      Save your numbers
//!   tesorin dashboard                         Plan for the saved profile
//!   tesorin serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tesorin_core::models::NewWalletTransaction;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user.as_str();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            let planner = commands::load_planner(cli.policy.as_deref())?;
            commands::cmd_serve(
                &cli.db,
                planner,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Plan {
            snapshot,
            save,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let planner = commands::load_planner(cli.policy.as_deref())?;
            commands::cmd_plan(&db, user, &planner, &snapshot, save, json)
        }
        Commands::Dashboard => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let planner = commands::load_planner(cli.policy.as_deref())?;
            commands::cmd_dashboard(&db, user, &planner)
        }
        Commands::NextStep(args) => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let planner = commands::load_planner(cli.policy.as_deref())?;
            commands::cmd_next_step(&db, user, &planner, &args)
        }
        Commands::Profile { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(ProfileAction::Show) => commands::cmd_profile_show(&db, user),
                Some(ProfileAction::Set(args)) => commands::cmd_profile_set(&db, user, &args),
                Some(ProfileAction::Reset { yes }) => commands::cmd_profile_reset(&db, user, yes),
            }
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(GoalsAction::List) => commands::cmd_goals_list(&db, user),
                Some(GoalsAction::Add(args)) => commands::cmd_goals_add(&db, user, &args),
                Some(GoalsAction::Contribute { id, amount }) => {
                    commands::cmd_goals_contribute(&db, user, id, amount)
                }
                Some(GoalsAction::Delete { id }) => commands::cmd_goals_delete(&db, user, id),
                Some(GoalsAction::Estimate { target, year }) => {
                    commands::cmd_goals_estimate(&db, user, target, year)
                }
            }
        }
        Commands::Wallet { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(WalletAction::List) => commands::cmd_wallet_list(&db, user),
                Some(WalletAction::Add { name }) => commands::cmd_wallet_add(&db, user, &name),
                Some(WalletAction::Tx {
                    amount,
                    wallet,
                    date,
                    category,
                    note,
                }) => {
                    let date = match date {
                        Some(d) => commands::parse_date(&d)?,
                        None => chrono::Local::now().date_naive(),
                    };
                    let tx = NewWalletTransaction {
                        date,
                        category,
                        note,
                        amount,
                    };
                    commands::cmd_wallet_tx(&db, user, wallet, &tx)
                }
                Some(WalletAction::Stats {
                    wallet,
                    start,
                    end,
                    entries,
                }) => {
                    let (start, end) = commands::resolve_period(
                        start.as_deref(),
                        end.as_deref(),
                        chrono::Local::now().date_naive(),
                    )?;
                    commands::cmd_wallet_stats(&db, user, wallet, start, end, entries)
                }
            }
        }
        Commands::Audit { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_audit(&db, user, limit)
        }
        Commands::Reset { yes } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_reset(&db, user, yes)
        }
    }
}
