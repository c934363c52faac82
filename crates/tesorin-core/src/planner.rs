//! Planning rule engine
//!
//! Maps a [`FinancialSnapshot`] to derived metrics and a recommended
//! monthly [`AllocationPlan`]. Every operation is pure and total: degenerate
//! inputs (no income, no expenses, no spare cash, a target year in the past)
//! produce zero or default values instead of errors.
//!
//! The free functions use the built-in policy. [`Planner`] does the same
//! work against a loaded [`PlanningPolicy`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tesorin_core::planner::Planner;
//!
//! let planner = Planner::new(PlanningPolicy::load()?);
//! let summary = planner.summarize(&snapshot);
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::models::{AllocationPlan, Country, FinancialSnapshot};
use crate::policy::PlanningPolicy;

/// Months in a year, for spreading a goal over its horizon
const MONTHS_PER_YEAR: f64 = 12.0;

fn default_policy() -> &'static PlanningPolicy {
    static POLICY: OnceLock<PlanningPolicy> = OnceLock::new();
    POLICY.get_or_init(PlanningPolicy::default)
}

/// Income minus expenses. Negative means a monthly deficit.
pub fn cashflow(income: f64, expenses: f64) -> f64 {
    income - expenses
}

/// Savings minus debt
pub fn net_worth(savings: f64, debt: f64) -> f64 {
    savings - debt
}

/// Cashflow as a percentage of income, 0 when there is no income
pub fn savings_rate(income: f64, cashflow: f64) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }
    (cashflow / income) * 100.0
}

/// Recommended cash buffer: 3 months of expenses, or 1 month while in debt
pub fn emergency_fund_target(expenses: f64, debt: f64) -> f64 {
    Planner::with_policy_ref(default_policy()).emergency_fund_target(expenses, debt)
}

/// Target savings-rate band (low %, high %) for a monthly income
pub fn savings_rate_target(country: Country, income: f64) -> (f64, f64) {
    Planner::with_policy_ref(default_policy()).savings_rate_target(country, income)
}

/// Recommended monthly saving and its split across buckets
pub fn allocate_monthly_plan(
    income: f64,
    expenses: f64,
    country: Country,
    debt: f64,
    has_high_interest_debt: bool,
) -> AllocationPlan {
    Planner::with_policy_ref(default_policy()).allocate_monthly_plan(
        income,
        expenses,
        country,
        debt,
        has_high_interest_debt,
    )
}

/// Share of monthly savings early planner screens sent to debt
pub fn debt_priority_share(has_high_interest_debt: bool) -> f64 {
    Planner::with_policy_ref(default_policy()).debt_priority_share(has_high_interest_debt)
}

/// Whole years a goal amount is spread over, never less than one
pub fn goal_horizon_years(target_year: i32, current_year: i32) -> i32 {
    target_year.saturating_sub(current_year).max(1)
}

/// Flat monthly amount needed to reach `target_amount` by `target_year`
///
/// No growth or interest is modelled. The horizon is at least one year,
/// so past or current target years spread the amount over 12 months.
pub fn monthly_goal_contribution(target_amount: f64, target_year: i32, current_year: i32) -> f64 {
    let years = goal_horizon_years(target_year, current_year);
    target_amount / (f64::from(years) * MONTHS_PER_YEAR)
}

/// Whether there is money left over each month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashflowStatus {
    Surplus,
    BreakEven,
    Deficit,
}

impl CashflowStatus {
    pub fn of(cashflow: f64) -> Self {
        if cashflow > 0.0 {
            Self::Surplus
        } else if cashflow < 0.0 {
            Self::Deficit
        } else {
            Self::BreakEven
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Surplus => "surplus",
            Self::BreakEven => "break_even",
            Self::Deficit => "deficit",
        }
    }
}

/// Everything the dashboard shows for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub country: Country,
    pub currency: String,
    pub cashflow: f64,
    pub cashflow_status: CashflowStatus,
    pub net_worth: f64,
    pub savings_rate: f64,
    pub savings_rate_target: (f64, f64),
    pub emergency_fund_target: f64,
    pub plan: AllocationPlan,
}

enum PolicyRef<'a> {
    Owned(PlanningPolicy),
    Borrowed(&'a PlanningPolicy),
}

/// Planning engine bound to a policy
pub struct Planner<'a> {
    policy: PolicyRef<'a>,
}

impl Default for Planner<'static> {
    fn default() -> Self {
        Self::with_policy_ref(default_policy())
    }
}

impl Planner<'static> {
    /// Create a planner that owns its policy
    pub fn new(policy: PlanningPolicy) -> Self {
        Self {
            policy: PolicyRef::Owned(policy),
        }
    }
}

impl<'a> Planner<'a> {
    /// Create a planner borrowing a policy
    pub fn with_policy_ref(policy: &'a PlanningPolicy) -> Self {
        Self {
            policy: PolicyRef::Borrowed(policy),
        }
    }

    pub fn policy(&self) -> &PlanningPolicy {
        match &self.policy {
            PolicyRef::Owned(p) => p,
            PolicyRef::Borrowed(p) => p,
        }
    }

    pub fn emergency_fund_target(&self, expenses: f64, debt: f64) -> f64 {
        if expenses <= 0.0 {
            return 0.0;
        }
        let policy = self.policy();
        if debt > 0.0 {
            policy.emergency_months_with_debt * expenses
        } else {
            policy.emergency_months_without_debt * expenses
        }
    }

    pub fn savings_rate_target(&self, country: Country, income: f64) -> (f64, f64) {
        if income <= 0.0 {
            return (0.0, 0.0);
        }
        self.policy().band_for(country, income)
    }

    pub fn allocate_monthly_plan(
        &self,
        income: f64,
        expenses: f64,
        country: Country,
        debt: f64,
        has_high_interest_debt: bool,
    ) -> AllocationPlan {
        let monthly_cashflow = cashflow(income, expenses);
        if monthly_cashflow <= 0.0 {
            return AllocationPlan::empty(monthly_cashflow);
        }

        let (low, high) = self.savings_rate_target(country, income);
        let target_rate = if high > 0.0 { (low + high) / 2.0 } else { 0.0 };
        let target_saving = income * (target_rate / 100.0);
        let recommended_saving = monthly_cashflow.min(target_saving);

        let policy = self.policy();
        // High-interest override only applies when there is debt to pay.
        let split = if debt <= 0.0 {
            policy.base_split.without_debt()
        } else if has_high_interest_debt {
            policy.high_interest_split
        } else {
            policy.base_split
        };

        AllocationPlan {
            monthly_cashflow,
            recommended_saving,
            emergency_share_amount: recommended_saving * split.emergency,
            investing_share_amount: recommended_saving * split.investing,
            debt_share_amount: recommended_saving * split.debt,
        }
    }

    pub fn debt_priority_share(&self, has_high_interest_debt: bool) -> f64 {
        let policy = self.policy();
        if has_high_interest_debt {
            policy.legacy_debt_share_high_interest
        } else {
            policy.legacy_debt_share_normal
        }
    }

    /// Allocation plan for a snapshot
    pub fn plan(&self, snapshot: &FinancialSnapshot) -> AllocationPlan {
        self.allocate_monthly_plan(
            snapshot.monthly_income,
            snapshot.monthly_expenses,
            snapshot.country,
            snapshot.current_debt,
            snapshot.has_high_interest_debt,
        )
    }

    /// All derived metrics for a snapshot
    pub fn summarize(&self, snapshot: &FinancialSnapshot) -> PlanSummary {
        let flow = cashflow(snapshot.monthly_income, snapshot.monthly_expenses);
        PlanSummary {
            country: snapshot.country,
            currency: snapshot.country.currency_symbol().to_string(),
            cashflow: flow,
            cashflow_status: CashflowStatus::of(flow),
            net_worth: net_worth(snapshot.current_savings, snapshot.current_debt),
            savings_rate: savings_rate(snapshot.monthly_income, flow),
            savings_rate_target: self
                .savings_rate_target(snapshot.country, snapshot.monthly_income),
            emergency_fund_target: self
                .emergency_fund_target(snapshot.monthly_expenses, snapshot.current_debt),
            plan: self.plan(snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < TOLERANCE, "expected {} to equal {}", a, b);
    }

    #[test]
    fn test_cashflow_allows_deficit() {
        assert_eq!(cashflow(5000.0, 3000.0), 2000.0);
        assert_eq!(cashflow(3000.0, 5000.0), -2000.0);
        assert_eq!(cashflow(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_net_worth() {
        assert_eq!(net_worth(10000.0, 2500.0), 7500.0);
        assert_eq!(net_worth(0.0, 2500.0), -2500.0);
    }

    #[test]
    fn test_savings_rate_zero_without_income() {
        assert_eq!(savings_rate(0.0, 500.0), 0.0);
        assert_eq!(savings_rate(0.0, -500.0), 0.0);
        assert_eq!(savings_rate(-10.0, 500.0), 0.0);
        assert_close(savings_rate(4000.0, 1000.0), 25.0);
        assert_close(savings_rate(4000.0, -1000.0), -25.0);
    }

    #[test]
    fn test_emergency_fund_target() {
        assert_eq!(emergency_fund_target(0.0, 0.0), 0.0);
        assert_eq!(emergency_fund_target(0.0, 1000.0), 0.0);
        assert_eq!(emergency_fund_target(2000.0, 1.0), 2000.0);
        assert_eq!(emergency_fund_target(2000.0, 0.0), 6000.0);
    }

    #[test]
    fn test_savings_rate_target_india() {
        assert_eq!(savings_rate_target(Country::India, 0.0), (0.0, 0.0));
        assert_eq!(savings_rate_target(Country::India, 29999.0), (10.0, 15.0));
        assert_eq!(savings_rate_target(Country::India, 30000.0), (15.0, 25.0));
        assert_eq!(savings_rate_target(Country::India, 59999.0), (15.0, 25.0));
        assert_eq!(savings_rate_target(Country::India, 60000.0), (25.0, 40.0));
    }

    #[test]
    fn test_savings_rate_target_canada() {
        assert_eq!(savings_rate_target(Country::Canada, -1.0), (0.0, 0.0));
        assert_eq!(savings_rate_target(Country::Canada, 2999.0), (10.0, 15.0));
        assert_eq!(savings_rate_target(Country::Canada, 3000.0), (15.0, 25.0));
        assert_eq!(savings_rate_target(Country::Canada, 6000.0), (25.0, 35.0));
    }

    #[test]
    fn test_no_allocation_without_positive_cashflow() {
        let plan = allocate_monthly_plan(3000.0, 3000.0, Country::Canada, 0.0, false);
        assert_eq!(plan.monthly_cashflow, 0.0);
        assert_eq!(plan.recommended_saving, 0.0);
        assert_eq!(plan.bucket_total(), 0.0);

        let plan = allocate_monthly_plan(3000.0, 4500.0, Country::Canada, 500.0, true);
        assert_eq!(plan.monthly_cashflow, -1500.0);
        assert_eq!(plan.emergency_share_amount, 0.0);
        assert_eq!(plan.investing_share_amount, 0.0);
        assert_eq!(plan.debt_share_amount, 0.0);
    }

    #[test]
    fn test_no_debt_folds_debt_share_into_investing() {
        let plan = allocate_monthly_plan(5000.0, 3000.0, Country::Canada, 0.0, true);
        // 15-25% band -> 20% of 5000 = 1000
        assert_close(plan.recommended_saving, 1000.0);
        assert_eq!(plan.debt_share_amount, 0.0);
        assert_close(plan.investing_share_amount, 600.0);
        assert_close(plan.emergency_share_amount, 400.0);
    }

    #[test]
    fn test_regular_debt_uses_base_split() {
        let plan = allocate_monthly_plan(5000.0, 3000.0, Country::Canada, 8000.0, false);
        assert_close(plan.emergency_share_amount, 400.0);
        assert_close(plan.investing_share_amount, 300.0);
        assert_close(plan.debt_share_amount, 300.0);
    }

    #[test]
    fn test_high_interest_debt_prioritises_payoff() {
        let plan = allocate_monthly_plan(5000.0, 3000.0, Country::Canada, 8000.0, true);
        assert_close(plan.debt_share_amount, 0.4 * plan.recommended_saving);
        assert_close(plan.emergency_share_amount, 0.3 * plan.recommended_saving);
        assert_close(plan.investing_share_amount, 0.3 * plan.recommended_saving);
    }

    #[test]
    fn test_recommended_saving_capped_by_cashflow() {
        // Band for 70000 IN is 25-40 -> 32.5% = 22750, but only 5000 is spare
        let plan = allocate_monthly_plan(70000.0, 65000.0, Country::India, 0.0, false);
        assert_close(plan.recommended_saving, 5000.0);
        assert!(plan.recommended_saving <= plan.monthly_cashflow);
    }

    #[test]
    fn test_buckets_sum_to_recommended_saving() {
        let cases = [
            (50000.0, 30000.0, Country::India, 0.0, false),
            (50000.0, 30000.0, Country::India, 1.0, false),
            (50000.0, 30000.0, Country::India, 1.0, true),
            (7321.55, 1234.56, Country::Canada, 99.0, true),
            (2999.0, 10.0, Country::Canada, 0.0, true),
            (123456.0, 100000.0, Country::India, 5.0, false),
        ];
        for (income, expenses, country, debt, high) in cases {
            let plan = allocate_monthly_plan(income, expenses, country, debt, high);
            assert!(plan.recommended_saving > 0.0);
            assert_close(plan.bucket_total(), plan.recommended_saving);
            assert!(plan.recommended_saving <= plan.monthly_cashflow);
        }
    }

    #[test]
    fn test_scenario_india_no_debt() {
        let snapshot = FinancialSnapshot {
            country: Country::India,
            monthly_income: 50000.0,
            monthly_expenses: 30000.0,
            current_savings: 10000.0,
            current_debt: 0.0,
            has_high_interest_debt: false,
        };
        let summary = Planner::default().summarize(&snapshot);

        assert_eq!(summary.cashflow, 20000.0);
        assert_eq!(summary.cashflow_status, CashflowStatus::Surplus);
        assert_eq!(summary.emergency_fund_target, 90000.0);
        assert_eq!(summary.savings_rate_target, (15.0, 25.0));
        assert_close(summary.savings_rate, 40.0);
        assert_eq!(summary.net_worth, 10000.0);
        assert_close(summary.plan.recommended_saving, 10000.0);
        assert_close(summary.plan.investing_share_amount, 6000.0);
        assert_close(summary.plan.emergency_share_amount, 4000.0);
        assert_eq!(summary.plan.debt_share_amount, 0.0);
        assert_eq!(summary.currency, "₹");
    }

    #[test]
    fn test_monthly_goal_contribution() {
        assert_eq!(monthly_goal_contribution(12000.0, 2027, 2026), 1000.0);
        assert_eq!(monthly_goal_contribution(24000.0, 2028, 2026), 1000.0);
    }

    #[test]
    fn test_monthly_goal_contribution_floors_horizon() {
        assert_eq!(monthly_goal_contribution(12000.0, 2020, 2026), 1000.0);
        assert_eq!(monthly_goal_contribution(12000.0, 2026, 2026), 1000.0);
        assert_eq!(monthly_goal_contribution(0.0, 2020, 2026), 0.0);
    }

    #[test]
    fn test_goal_horizon_extreme_years() {
        assert_eq!(goal_horizon_years(i32::MIN, 2026), 1);
        assert_eq!(goal_horizon_years(i32::MAX, i32::MIN), i32::MAX);
        assert_eq!(goal_horizon_years(2031, 2026), 5);

        assert_eq!(monthly_goal_contribution(12000.0, i32::MIN, 2026), 1000.0);
        let far = monthly_goal_contribution(12000.0, i32::MAX, -1);
        assert!(far.is_finite() && far > 0.0);
    }

    #[test]
    fn test_debt_priority_share() {
        assert_eq!(debt_priority_share(true), 0.4);
        assert_eq!(debt_priority_share(false), 0.2);
    }

    #[test]
    fn test_cashflow_status() {
        assert_eq!(CashflowStatus::of(1.0), CashflowStatus::Surplus);
        assert_eq!(CashflowStatus::of(0.0), CashflowStatus::BreakEven);
        assert_eq!(CashflowStatus::of(-1.0), CashflowStatus::Deficit);
    }

    #[test]
    fn test_planner_uses_custom_policy() {
        let mut policy = PlanningPolicy::default();
        policy.emergency_months_without_debt = 6.0;
        let planner = Planner::new(policy);
        assert_eq!(planner.emergency_fund_target(1000.0, 0.0), 6000.0);
        assert_eq!(planner.emergency_fund_target(1000.0, 50.0), 1000.0);
    }
}
