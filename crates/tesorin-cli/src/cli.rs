//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tesorin_core::{Country, FinancialSnapshot};

/// Tesorin - A calm first step with your money
#[derive(Parser)]
#[command(name = "tesorin")]
#[command(about = "First-step money planner: cashflow, emergency fund, and a simple monthly plan", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tesorin.db", global = true)]
    pub db: PathBuf,

    /// User id whose data is read and written
    #[arg(long, default_value = "local", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TESORIN_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Planning policy file (defaults to the data-dir override, then built-in values)
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Money snapshot given on the command line
///
/// Flags that are left out keep the stored (or default) value.
#[derive(Args, Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// Country: IN or CA
    #[arg(long)]
    pub country: Option<String>,

    /// Monthly take-home income
    #[arg(long)]
    pub income: Option<f64>,

    /// Monthly expenses
    #[arg(long)]
    pub expenses: Option<f64>,

    /// Current savings
    #[arg(long)]
    pub savings: Option<f64>,

    /// Current debt
    #[arg(long)]
    pub debt: Option<f64>,

    /// Debt carries a high interest rate (e.g. credit cards)
    #[arg(long)]
    pub high_interest: bool,
}

impl SnapshotArgs {
    /// Whether any snapshot flag was given
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.income.is_none()
            && self.expenses.is_none()
            && self.savings.is_none()
            && self.debt.is_none()
            && !self.high_interest
    }

    /// Apply the given flags over a base snapshot
    ///
    /// Giving `--debt` without `--high-interest` clears the high-interest flag.
    pub fn apply(&self, base: FinancialSnapshot) -> Result<FinancialSnapshot> {
        let country = match &self.country {
            Some(c) => c.parse::<Country>().map_err(anyhow::Error::msg)?,
            None => base.country,
        };
        let has_high_interest_debt =
            self.high_interest || (self.debt.is_none() && base.has_high_interest_debt);

        let snapshot = FinancialSnapshot {
            country,
            monthly_income: self.income.unwrap_or(base.monthly_income),
            monthly_expenses: self.expenses.unwrap_or(base.monthly_expenses),
            current_savings: self.savings.unwrap_or(base.current_savings),
            current_debt: self.debt.unwrap_or(base.current_debt),
            has_high_interest_debt,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

/// Answers for next-step guidance
#[derive(Args, Debug, Clone)]
pub struct NextStepArgs {
    /// Priority: emergency_fund, high_interest_debt, investing, specific_purchase, not_sure
    #[arg(short, long, default_value = "emergency_fund")]
    pub kind: String,

    /// When it should happen: next_3_months, next_6_to_12_months, next_2_to_3_years, more_than_3_years
    #[arg(short, long, default_value = "next_6_to_12_months")]
    pub timeframe: String,

    /// Short name for the goal
    #[arg(long)]
    pub nickname: Option<String>,

    /// Why this matters to you
    #[arg(long)]
    pub why: Option<String>,

    /// Target amount (defaults to the emergency-fund target for emergency_fund)
    #[arg(long, default_value = "0")]
    pub target: f64,

    /// Monthly amount you can put toward it (defaults to 30% of cashflow)
    #[arg(long, default_value = "0")]
    pub monthly: f64,

    /// Comfort with investments going up and down (1-5)
    #[arg(long, default_value = "3")]
    pub risk: u8,

    /// Save the plan as a tracked goal
    #[arg(long)]
    pub track: bool,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Profile fields to update
#[derive(Args, Debug, Clone, Default)]
pub struct ProfileSetArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,

    /// Age (18-65)
    #[arg(long)]
    pub age: Option<u8>,

    /// Employment: full_time, part_time, self_employed, student, between_jobs, other
    #[arg(long)]
    pub employment: Option<String>,

    /// People in the household, including you (1-10)
    #[arg(long)]
    pub household: Option<u8>,

    /// People who rely on your income (0-10)
    #[arg(long)]
    pub dependents: Option<u8>,

    /// Focus: emergency_fund, high_interest_debt, long_term_investing, monthly_cashflow, specific_purchase
    #[arg(long)]
    pub focus: Option<String>,

    /// Comfort with investments going up and down (1-5)
    #[arg(long)]
    pub risk: Option<u8>,

    /// How money feels: stressed, okay, confident, avoidant
    #[arg(long)]
    pub feeling: Option<String>,

    /// Goals you care about, comma-separated (replaces the stored list)
    #[arg(long, value_delimiter = ',')]
    pub goals: Option<Vec<String>>,
}

/// A goal to track
#[derive(Args, Debug, Clone)]
pub struct GoalAddArgs {
    /// Goal name
    pub name: String,

    /// Target amount
    #[arg(short, long)]
    pub target: f64,

    /// Year you want to reach it
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Kind: emergency_fund, high_interest_debt, investing, specific_purchase, not_sure
    #[arg(short, long, default_value = "specific_purchase")]
    pub kind: String,

    /// Planned monthly contribution (estimated from the year when omitted)
    #[arg(short, long)]
    pub monthly: Option<f64>,

    /// Why this goal matters
    #[arg(long)]
    pub why: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show the monthly plan for a snapshot
    ///
    /// With no snapshot flags, the stored profile is used.
    Plan {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Store the snapshot in the profile after planning
        #[arg(long)]
        save: bool,

        /// Print the plan summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show dashboard for the stored profile
    Dashboard,

    /// Manage the stored profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Manage tracked goals
    Goals {
        #[command(subcommand)]
        action: Option<GoalsAction>,
    },

    /// Get next-step guidance for your top priority
    NextStep(NextStepArgs),

    /// Manage wallets and manual entries
    Wallet {
        #[command(subcommand)]
        action: Option<WalletAction>,
    },

    /// Show recent audit log entries
    Audit {
        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Show database status (encryption, row counts)
    Status,

    /// Delete everything stored for the current user
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires an API key from TESORIN_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile
    Show,

    /// Update profile answers (unset flags keep their stored values)
    Set(ProfileSetArgs),

    /// Delete the stored profile
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List tracked goals
    List,

    /// Track a goal (updates the goal with the same name)
    Add(GoalAddArgs),

    /// Record money put toward a goal
    Contribute {
        /// Goal ID
        id: i64,

        /// Amount saved
        amount: f64,
    },

    /// Stop tracking a goal
    Delete {
        /// Goal ID
        id: i64,
    },

    /// Estimate the monthly amount needed to reach a target by a year
    Estimate {
        /// Target amount
        #[arg(short, long)]
        target: f64,

        /// Target year
        #[arg(short, long)]
        year: i32,
    },
}

#[derive(Subcommand)]
pub enum WalletAction {
    /// List wallets
    List,

    /// Create a wallet
    Add {
        /// Wallet name
        name: String,
    },

    /// Record an entry (negative amount = expense)
    Tx {
        /// Amount (use a negative number for expenses)
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// Wallet ID (defaults to the first wallet)
        #[arg(short, long)]
        wallet: Option<i64>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Category
        #[arg(short, long)]
        category: Option<String>,

        /// Note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Show totals for a period
    Stats {
        /// Wallet ID (defaults to the first wallet)
        #[arg(short, long)]
        wallet: Option<i64>,

        /// Period start (YYYY-MM-DD, defaults to the first of this month)
        #[arg(long)]
        start: Option<String>,

        /// Period end (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        end: Option<String>,

        /// List the entries as well
        #[arg(long)]
        entries: bool,
    },
}
