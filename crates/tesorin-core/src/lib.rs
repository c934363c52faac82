//! Tesorin Core Library
//!
//! Shared functionality for the Tesorin first-step money planner:
//! - Planning rule engine (cashflow, savings rate, emergency fund, allocation)
//! - Planning policy tables with TOML overrides
//! - Goal tracking and next-step guidance
//! - Wallet statistics
//! - Snapshot store contract and SQLite database

pub mod db;
pub mod error;
pub mod goals;
pub mod models;
pub mod planner;
pub mod policy;
pub mod store;
pub mod wallet;

pub use db::{AuditEntry, Database, DatabaseStats};
pub use error::{Error, Result};
pub use goals::{NextStepAnswers, NextStepPlan};
pub use models::{AllocationPlan, Country, FinancialSnapshot, Goal, Profile, TrackedGoal};
pub use planner::{CashflowStatus, PlanSummary, Planner};
pub use policy::PlanningPolicy;
pub use store::{NullStore, SnapshotStore};
pub use wallet::WalletStats;
