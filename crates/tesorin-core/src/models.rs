//! Domain models for Tesorin

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Country the user manages their money in
///
/// Decides which savings-rate table applies. Amounts are always in the
/// country's own currency; nothing is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Country {
    /// India (amounts in rupees)
    #[default]
    #[serde(rename = "IN", alias = "in")]
    India,
    /// Canada (amounts in dollars)
    #[serde(rename = "CA", alias = "ca")]
    Canada,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::India => "IN",
            Self::Canada => "CA",
        }
    }

    /// Currency symbol used when displaying amounts
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Self::India => "₹",
            Self::Canada => "$",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::India => "India",
            Self::Canada => "Canada",
        }
    }
}

impl std::str::FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "india" => Ok(Self::India),
            "ca" | "canada" => Ok(Self::Canada),
            _ => Err(format!("Unknown country: {}", s)),
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's monthly money picture, as entered
///
/// Held only for the duration of one computation. Persisting it is the
/// job of a [`SnapshotStore`](crate::store::SnapshotStore).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FinancialSnapshot {
    pub country: Country,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub current_savings: f64,
    pub current_debt: f64,
    #[serde(default)]
    pub has_high_interest_debt: bool,
}

impl FinancialSnapshot {
    /// Reject negative or non-finite amounts before they reach the planner
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("monthly_income", self.monthly_income),
            ("monthly_expenses", self.monthly_expenses),
            ("current_savings", self.current_savings),
            ("current_debt", self.current_debt),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::InvalidData(format!("{} must be a number", name)));
            }
            if value < 0.0 {
                return Err(Error::InvalidData(format!(
                    "{} cannot be negative (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn has_debt(&self) -> bool {
        self.current_debt > 0.0
    }
}

/// Recommended monthly saving and how it splits across buckets
///
/// The three bucket amounts always add up to `recommended_saving`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AllocationPlan {
    /// Income minus expenses (may be negative)
    pub monthly_cashflow: f64,
    pub recommended_saving: f64,
    pub emergency_share_amount: f64,
    pub investing_share_amount: f64,
    pub debt_share_amount: f64,
}

impl AllocationPlan {
    /// A plan with nothing to allocate
    pub fn empty(monthly_cashflow: f64) -> Self {
        Self {
            monthly_cashflow,
            ..Default::default()
        }
    }

    /// Sum of the three bucket amounts
    pub fn bucket_total(&self) -> f64 {
        self.emergency_share_amount + self.investing_share_amount + self.debt_share_amount
    }

    pub fn has_allocation(&self) -> bool {
        self.recommended_saving > 0.0
    }
}

/// A savings goal with a target year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub target_amount: f64,
    pub target_year: i32,
    #[serde(default)]
    pub amount_saved: f64,
}

/// Work situation from the profile questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    FullTime,
    PartTime,
    SelfEmployed,
    Student,
    BetweenJobs,
    Other,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::SelfEmployed => "self_employed",
            Self::Student => "student",
            Self::BetweenJobs => "between_jobs",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "Full-time employment",
            Self::PartTime => "Part-time / contract",
            Self::SelfEmployed => "Business / self-employed",
            Self::Student => "Student",
            Self::BetweenJobs => "Between jobs",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for EmploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "full_time" | "fulltime" => Ok(Self::FullTime),
            "part_time" | "parttime" | "contract" => Ok(Self::PartTime),
            "self_employed" | "business" => Ok(Self::SelfEmployed),
            "student" => Ok(Self::Student),
            "between_jobs" | "unemployed" => Ok(Self::BetweenJobs),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown employment status: {}", s)),
        }
    }
}

impl std::fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What feels most important to the user right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryFocus {
    #[default]
    EmergencyFund,
    HighInterestDebt,
    LongTermInvesting,
    MonthlyCashflow,
    SpecificPurchase,
}

impl PrimaryFocus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "emergency_fund",
            Self::HighInterestDebt => "high_interest_debt",
            Self::LongTermInvesting => "long_term_investing",
            Self::MonthlyCashflow => "monthly_cashflow",
            Self::SpecificPurchase => "specific_purchase",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "Build or pad my emergency fund",
            Self::HighInterestDebt => "Clean up high-interest debt",
            Self::LongTermInvesting => "Get started with long-term investing",
            Self::MonthlyCashflow => "Stay on top of monthly cashflow",
            Self::SpecificPurchase => "Save for a specific purchase",
        }
    }
}

impl std::str::FromStr for PrimaryFocus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "emergency_fund" | "emergency" => Ok(Self::EmergencyFund),
            "high_interest_debt" | "debt" => Ok(Self::HighInterestDebt),
            "long_term_investing" | "investing" => Ok(Self::LongTermInvesting),
            "monthly_cashflow" | "cashflow" => Ok(Self::MonthlyCashflow),
            "specific_purchase" | "purchase" => Ok(Self::SpecificPurchase),
            _ => Err(format!("Unknown focus: {}", s)),
        }
    }
}

impl std::fmt::Display for PrimaryFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the user feels when thinking about money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MoneyFeeling {
    #[default]
    Stressed,
    Okay,
    Confident,
    Avoidant,
}

impl MoneyFeeling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stressed => "stressed",
            Self::Okay => "okay",
            Self::Confident => "confident",
            Self::Avoidant => "avoidant",
        }
    }
}

impl std::str::FromStr for MoneyFeeling {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stressed" => Ok(Self::Stressed),
            "okay" | "ok" => Ok(Self::Okay),
            "confident" => Ok(Self::Confident),
            "avoidant" | "avoid" => Ok(Self::Avoidant),
            _ => Err(format!("Unknown money feeling: {}", s)),
        }
    }
}

impl std::fmt::Display for MoneyFeeling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maximum number of selected goals shown on the dashboard
pub const MAX_DASHBOARD_GOALS: usize = 3;

/// A user's profile: the money snapshot plus the "about you" answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(flatten)]
    pub snapshot: FinancialSnapshot,
    pub age: u8,
    pub employment_status: EmploymentStatus,
    /// People in the household, including the user
    pub household_size: u8,
    /// People who fully or mostly rely on the user's income
    pub dependents: u8,
    pub primary_focus: PrimaryFocus,
    /// 1 = dislikes any drops, 5 = fine with swings for long-term growth
    pub risk_comfort: u8,
    pub money_feeling: MoneyFeeling,
    /// Names of the goals picked on the goals screen
    #[serde(default)]
    pub goals: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            snapshot: FinancialSnapshot::default(),
            age: 25,
            employment_status: EmploymentStatus::default(),
            household_size: 1,
            dependents: 0,
            primary_focus: PrimaryFocus::default(),
            risk_comfort: 3,
            money_feeling: MoneyFeeling::default(),
            goals: vec![],
        }
    }
}

impl Profile {
    pub fn from_snapshot(snapshot: FinancialSnapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.snapshot.validate()?;
        if !(18..=65).contains(&self.age) {
            return Err(Error::InvalidData(format!(
                "age must be between 18 and 65 (got {})",
                self.age
            )));
        }
        if !(1..=10).contains(&self.household_size) {
            return Err(Error::InvalidData(format!(
                "household_size must be between 1 and 10 (got {})",
                self.household_size
            )));
        }
        if self.dependents > 10 {
            return Err(Error::InvalidData(format!(
                "dependents must be at most 10 (got {})",
                self.dependents
            )));
        }
        if !(1..=5).contains(&self.risk_comfort) {
            return Err(Error::InvalidData(format!(
                "risk_comfort must be between 1 and 5 (got {})",
                self.risk_comfort
            )));
        }
        Ok(())
    }

    /// Goals to feature on the dashboard
    pub fn dashboard_goals(&self) -> &[String] {
        let n = self.goals.len().min(MAX_DASHBOARD_GOALS);
        &self.goals[..n]
    }
}

/// The top priority picked in next-step guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    #[default]
    EmergencyFund,
    HighInterestDebt,
    Investing,
    SpecificPurchase,
    NotSure,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "emergency_fund",
            Self::HighInterestDebt => "high_interest_debt",
            Self::Investing => "investing",
            Self::SpecificPurchase => "specific_purchase",
            Self::NotSure => "not_sure",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EmergencyFund => "Build or top up my emergency fund",
            Self::HighInterestDebt => "Clean up high-interest debt",
            Self::Investing => "Start long-term investing",
            Self::SpecificPurchase => "Save for a specific purchase",
            Self::NotSure => "I'm not sure yet",
        }
    }
}

impl std::str::FromStr for GoalKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "emergency_fund" | "emergency" => Ok(Self::EmergencyFund),
            "high_interest_debt" | "debt" => Ok(Self::HighInterestDebt),
            "investing" | "invest" => Ok(Self::Investing),
            "specific_purchase" | "purchase" => Ok(Self::SpecificPurchase),
            "not_sure" | "unsure" => Ok(Self::NotSure),
            _ => Err(format!("Unknown goal kind: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// When the user wants to feel real progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Next3Months,
    #[default]
    Next6To12Months,
    Next2To3Years,
    MoreThan3Years,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Next3Months => "next_3_months",
            Self::Next6To12Months => "next_6_to_12_months",
            Self::Next2To3Years => "next_2_to_3_years",
            Self::MoreThan3Years => "more_than_3_years",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Next3Months => "Next 3 months",
            Self::Next6To12Months => "Next 6-12 months",
            Self::Next2To3Years => "Next 2-3 years",
            Self::MoreThan3Years => "More than 3 years",
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "next_3_months" | "3m" => Ok(Self::Next3Months),
            "next_6_to_12_months" | "6_12m" | "1y" => Ok(Self::Next6To12Months),
            "next_2_to_3_years" | "2_3y" => Ok(Self::Next2To3Years),
            "more_than_3_years" | "3y+" | "long" => Ok(Self::MoreThan3Years),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A goal the user is tracking progress on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedGoal {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub kind: GoalKind,
    pub target_amount: f64,
    pub target_year: Option<i32>,
    pub amount_saved: f64,
    /// Planned monthly contribution
    pub monthly_target: f64,
    pub timeframe: Timeframe,
    pub why: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrackedGoal {
    /// Check an amount can be put toward a goal
    pub fn validate_contribution(amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "contribution must be a non-negative amount (got {})",
                amount
            )));
        }
        Ok(())
    }

    /// Record money put toward this goal
    pub fn add_contribution(&mut self, amount: f64) -> Result<()> {
        Self::validate_contribution(amount)?;
        self.amount_saved += amount;
        Ok(())
    }

    /// Progress toward the target, 0-100
    pub fn progress_percent(&self) -> u8 {
        crate::goals::goal_progress_percent(self.amount_saved, self.target_amount)
    }

    pub fn is_emergency_fund(&self) -> bool {
        self.kind == GoalKind::EmergencyFund || self.name.to_lowercase().contains("emergency")
    }
}

/// A goal to be created or updated by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrackedGoal {
    pub name: String,
    #[serde(default)]
    pub kind: GoalKind,
    pub target_amount: f64,
    #[serde(default)]
    pub target_year: Option<i32>,
    #[serde(default)]
    pub monthly_target: f64,
    #[serde(default)]
    pub timeframe: Timeframe,
    #[serde(default)]
    pub why: Option<String>,
}

impl NewTrackedGoal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidData("goal name cannot be empty".to_string()));
        }
        if !self.target_amount.is_finite() || self.target_amount < 0.0 {
            return Err(Error::InvalidData(
                "target_amount cannot be negative".to_string(),
            ));
        }
        if !self.monthly_target.is_finite() || self.monthly_target < 0.0 {
            return Err(Error::InvalidData(
                "monthly_target cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&Goal> for NewTrackedGoal {
    fn from(goal: &Goal) -> Self {
        Self {
            name: goal.name.clone(),
            kind: GoalKind::SpecificPurchase,
            target_amount: goal.target_amount,
            target_year: Some(goal.target_year),
            monthly_target: 0.0,
            timeframe: Timeframe::default(),
            why: None,
        }
    }
}

/// A named ledger of manual income and expense entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Name given to the wallet created on first use
pub const DEFAULT_WALLET_NAME: &str = "Main wallet";

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "General";

/// A manual wallet entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: i64,
    pub wallet_id: i64,
    pub date: NaiveDate,
    pub category: String,
    pub note: String,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// A wallet entry to be recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWalletTransaction {
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub amount: f64,
}

impl NewWalletTransaction {
    /// Category with blanks replaced by the default
    pub fn category_or_default(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }
}
