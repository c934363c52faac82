//! Goal tracking and next-step guidance
//!
//! Turns the answers to "what matters most right now?" into a short,
//! concrete plan: a focus, a monthly amount, how long the buffer or goal
//! will take, and the checklists for the next week and the next few months.

use serde::{Deserialize, Serialize};

use crate::models::{FinancialSnapshot, GoalKind, Timeframe, TrackedGoal};
use crate::planner::{self, Planner};

/// Share of spare cash suggested when the user hasn't picked an amount
const DEFAULT_MONTHLY_SHARE_OF_CASHFLOW: f64 = 0.3;

/// Progress toward a target as a whole percentage, clamped to 0-100
pub fn goal_progress_percent(saved: f64, target: f64) -> u8 {
    if target <= 0.0 {
        return 0;
    }
    (saved / target * 100.0).clamp(0.0, 100.0) as u8
}

/// Suggested short name for a goal of this kind
pub fn default_goal_name(kind: GoalKind) -> &'static str {
    match kind {
        GoalKind::EmergencyFund => "Emergency fund",
        GoalKind::HighInterestDebt => "Debt payoff",
        GoalKind::Investing => "Long-term investing",
        GoalKind::SpecificPurchase => "Big purchase",
        GoalKind::NotSure => "",
    }
}

/// First goal that is about the emergency fund
pub fn find_emergency_goal(goals: &[TrackedGoal]) -> Option<&TrackedGoal> {
    goals.iter().find(|g| g.is_emergency_fund())
}

/// Answers from the next-step questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStepAnswers {
    #[serde(default)]
    pub kind: GoalKind,
    #[serde(default)]
    pub timeframe: Timeframe,
    /// Short name for the goal; defaults by kind when blank
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub why: Option<String>,
    /// 0 means "not set"
    #[serde(default)]
    pub target_amount: f64,
    /// 0 means "not set"
    #[serde(default)]
    pub monthly_amount: f64,
    /// 1-5 comfort with investments moving up and down
    #[serde(default = "default_risk")]
    pub risk: u8,
}

fn default_risk() -> u8 {
    3
}

impl Default for NextStepAnswers {
    fn default() -> Self {
        Self {
            kind: GoalKind::default(),
            timeframe: Timeframe::default(),
            nickname: None,
            why: None,
            target_amount: 0.0,
            monthly_amount: 0.0,
            risk: default_risk(),
        }
    }
}

impl NextStepAnswers {
    /// Goal name, falling back to the kind's default name
    pub fn goal_name(&self) -> String {
        self.nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| match self.kind {
                GoalKind::NotSure => self.kind.label().to_string(),
                kind => default_goal_name(kind).to_string(),
            })
    }
}

/// A simple next-step plan for the chosen priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStepPlan {
    pub kind: GoalKind,
    pub goal_name: String,
    pub timeframe: Timeframe,
    pub cashflow: f64,
    /// Monthly amount to put toward the goal
    pub monthly_amount: f64,
    /// Target for the goal (emergency-fund target when left unset)
    pub target_amount: f64,
    pub emergency_fund_target: f64,
    /// Emergency target still missing from current savings
    pub emergency_gap: f64,
    pub months_to_buffer: Option<f64>,
    pub months_to_target: Option<f64>,
    pub focus: String,
    pub actions: Vec<String>,
    pub next_7_days: Vec<String>,
    pub next_30_to_90_days: Vec<String>,
}

impl NextStepPlan {
    /// Build the plan with the built-in policy
    pub fn build(snapshot: &FinancialSnapshot, answers: &NextStepAnswers) -> Self {
        Self::build_with(&Planner::default(), snapshot, answers)
    }

    pub fn build_with(
        planner: &Planner<'_>,
        snapshot: &FinancialSnapshot,
        answers: &NextStepAnswers,
    ) -> Self {
        let currency = snapshot.country.currency_symbol();
        let cashflow = planner::cashflow(snapshot.monthly_income, snapshot.monthly_expenses);

        let monthly_amount = if answers.monthly_amount > 0.0 {
            answers.monthly_amount
        } else if cashflow > 0.0 {
            cashflow * DEFAULT_MONTHLY_SHARE_OF_CASHFLOW
        } else {
            0.0
        };

        let emergency_fund_target =
            planner.emergency_fund_target(snapshot.monthly_expenses, snapshot.current_debt);
        let target_amount =
            if answers.target_amount <= 0.0 && answers.kind == GoalKind::EmergencyFund {
                emergency_fund_target
            } else {
                answers.target_amount.max(0.0)
            };

        let emergency_gap = (emergency_fund_target - snapshot.current_savings).max(0.0);
        let months_to_buffer = (monthly_amount > 0.0).then(|| emergency_gap / monthly_amount);
        let months_to_target = (answers.kind == GoalKind::SpecificPurchase
            && monthly_amount > 0.0
            && target_amount > 0.0)
            .then(|| target_amount / monthly_amount);

        let money = |amount: f64| format!("{}{:.0}", currency, amount);

        let (focus, actions) = match answers.kind {
            GoalKind::EmergencyFund => {
                let mut actions = vec![format!(
                    "Aim to send {} per month into a separate high-safety account.",
                    money(monthly_amount)
                )];
                if let Some(months) = months_to_buffer.filter(|m| *m > 0.0) {
                    actions.push(format!(
                        "At that pace, you'd reach this buffer in roughly {:.1} months.",
                        months
                    ));
                }
                actions.push(
                    "Keep investments very low-risk until this buffer is in place.".to_string(),
                );
                actions.push(
                    "Revisit this plan once the buffer is at least 50-75% funded.".to_string(),
                );
                (
                    format!(
                        "Build a simple emergency fund of about {}.",
                        money(emergency_fund_target)
                    ),
                    actions,
                )
            }
            GoalKind::HighInterestDebt => (
                "Clean up high-interest debt while keeping a small safety cushion.".to_string(),
                vec![
                    format!(
                        "Choose a fixed payment of {} per month toward your highest-interest debt.",
                        money(monthly_amount)
                    ),
                    "Keep a mini-buffer of ~1 month of expenses in cash before making extra payments."
                        .to_string(),
                    "Log payments each month so you can see your balance trend down.".to_string(),
                    "When high-interest debt is gone, redirect this same amount into investing."
                        .to_string(),
                ],
            ),
            GoalKind::Investing => (
                "Start a calm, automatic investing habit.".to_string(),
                vec![
                    format!(
                        "Pick a realistic starting amount, e.g. {} per month.",
                        money(monthly_amount)
                    ),
                    "Use a simple diversified fund rather than chasing single stocks.".to_string(),
                    "Review this plan once per quarter, not every market headline.".to_string(),
                    "Track your overall invested balance, not day-to-day price moves.".to_string(),
                ],
            ),
            GoalKind::SpecificPurchase => {
                let mut actions = vec![
                    format!("Target amount for this goal: {}.", money(target_amount)),
                    format!("Planned saving: {} per month.", money(monthly_amount)),
                ];
                if let Some(months) = months_to_target {
                    actions.push(format!(
                        "At that pace it takes about {:.1} months; compare that to your timeframe ({}).",
                        months,
                        answers.timeframe.label()
                    ));
                }
                actions.push("Keep this pot separate from your emergency fund.".to_string());
                actions.push(
                    "If the timeline feels too long, lower the target or raise the monthly amount once cashflow improves."
                        .to_string(),
                );
                (
                    "Save for a specific purchase without breaking your basics.".to_string(),
                    actions,
                )
            }
            GoalKind::NotSure => (
                "Get the basics solid before picking a specific goal.".to_string(),
                vec![
                    "First, make sure your monthly cashflow is positive.".to_string(),
                    "Build at least 1 month of essential expenses as a starter buffer.".to_string(),
                    "Then pick emergency fund, debt, or long-term investing as your first focus."
                        .to_string(),
                ],
            ),
        };

        Self {
            kind: answers.kind,
            goal_name: answers.goal_name(),
            timeframe: answers.timeframe,
            cashflow,
            monthly_amount,
            target_amount,
            emergency_fund_target,
            emergency_gap,
            months_to_buffer,
            months_to_target,
            focus,
            actions,
            next_7_days: vec![
                "Write down your current balances: cash, debt, and any investments.".to_string(),
                "Decide which account your emergency buffer or goal savings will live in."
                    .to_string(),
                "If you're comfortable, set up an automatic monthly transfer for the amount you chose."
                    .to_string(),
            ],
            next_30_to_90_days: vec![
                "Track at least one month of real spending in a wallet.".to_string(),
                "Adjust your monthly goal amount if it feels too tight or too easy.".to_string(),
                "Revisit this plan in a month to see if your focus still feels right.".to_string(),
            ],
        }
    }

    /// The goal to track for this plan ("add this as a tracked goal")
    pub fn to_tracked_goal(&self, why: Option<String>) -> crate::models::NewTrackedGoal {
        crate::models::NewTrackedGoal {
            name: self.goal_name.clone(),
            kind: self.kind,
            target_amount: self.target_amount,
            target_year: None,
            monthly_target: self.monthly_amount,
            timeframe: self.timeframe,
            why,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Country;
    use chrono::Utc;

    fn snapshot(income: f64, expenses: f64, savings: f64, debt: f64) -> FinancialSnapshot {
        FinancialSnapshot {
            country: Country::Canada,
            monthly_income: income,
            monthly_expenses: expenses,
            current_savings: savings,
            current_debt: debt,
            has_high_interest_debt: false,
        }
    }

    fn tracked(name: &str, kind: GoalKind) -> TrackedGoal {
        TrackedGoal {
            id: 1,
            user_id: "local".to_string(),
            name: name.to_string(),
            kind,
            target_amount: 1000.0,
            target_year: None,
            amount_saved: 0.0,
            monthly_target: 0.0,
            timeframe: Timeframe::default(),
            why: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(goal_progress_percent(50.0, 0.0), 0);
        assert_eq!(goal_progress_percent(250.0, 1000.0), 25);
        assert_eq!(goal_progress_percent(999.0, 1000.0), 99);
        assert_eq!(goal_progress_percent(5000.0, 1000.0), 100);
        assert_eq!(goal_progress_percent(-5.0, 1000.0), 0);
    }

    #[test]
    fn test_default_names() {
        assert_eq!(default_goal_name(GoalKind::EmergencyFund), "Emergency fund");
        assert_eq!(default_goal_name(GoalKind::HighInterestDebt), "Debt payoff");
        assert_eq!(default_goal_name(GoalKind::NotSure), "");
    }

    #[test]
    fn test_goal_name_prefers_nickname() {
        let answers = NextStepAnswers {
            kind: GoalKind::SpecificPurchase,
            nickname: Some("  Car downpayment ".to_string()),
            ..Default::default()
        };
        assert_eq!(answers.goal_name(), "Car downpayment");

        let answers = NextStepAnswers {
            kind: GoalKind::SpecificPurchase,
            nickname: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(answers.goal_name(), "Big purchase");
    }

    #[test]
    fn test_emergency_plan_defaults() {
        // cashflow 1000, no amount picked -> 30% of cashflow
        let plan = NextStepPlan::build(
            &snapshot(4000.0, 3000.0, 3000.0, 0.0),
            &NextStepAnswers::default(),
        );

        assert_eq!(plan.cashflow, 1000.0);
        assert!((plan.monthly_amount - 300.0).abs() < 1e-9);
        assert_eq!(plan.emergency_fund_target, 9000.0);
        assert_eq!(plan.target_amount, 9000.0);
        assert_eq!(plan.emergency_gap, 6000.0);
        assert!((plan.months_to_buffer.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(plan.goal_name, "Emergency fund");
        assert!(plan.focus.contains("$9000"));
    }

    #[test]
    fn test_no_monthly_amount_without_cashflow() {
        let plan = NextStepPlan::build(
            &snapshot(2000.0, 3000.0, 0.0, 500.0),
            &NextStepAnswers {
                kind: GoalKind::HighInterestDebt,
                ..Default::default()
            },
        );
        assert_eq!(plan.monthly_amount, 0.0);
        assert_eq!(plan.months_to_buffer, None);
        // In debt -> one month of expenses
        assert_eq!(plan.emergency_fund_target, 3000.0);
    }

    #[test]
    fn test_gap_never_negative() {
        let plan = NextStepPlan::build(
            &snapshot(4000.0, 1000.0, 50000.0, 0.0),
            &NextStepAnswers::default(),
        );
        assert_eq!(plan.emergency_gap, 0.0);
        assert_eq!(plan.months_to_buffer, Some(0.0));
    }

    #[test]
    fn test_specific_purchase_months_to_target() {
        let plan = NextStepPlan::build(
            &snapshot(4000.0, 3000.0, 0.0, 0.0),
            &NextStepAnswers {
                kind: GoalKind::SpecificPurchase,
                target_amount: 6000.0,
                monthly_amount: 500.0,
                ..Default::default()
            },
        );
        assert_eq!(plan.months_to_target, Some(12.0));
        assert_eq!(plan.target_amount, 6000.0);
    }

    #[test]
    fn test_to_tracked_goal() {
        let plan = NextStepPlan::build(
            &snapshot(4000.0, 3000.0, 0.0, 0.0),
            &NextStepAnswers {
                kind: GoalKind::Investing,
                monthly_amount: 250.0,
                ..Default::default()
            },
        );
        let goal = plan.to_tracked_goal(Some("retire early".to_string()));
        assert_eq!(goal.name, "Long-term investing");
        assert_eq!(goal.monthly_target, 250.0);
        assert_eq!(goal.why.as_deref(), Some("retire early"));
    }

    #[test]
    fn test_find_emergency_goal() {
        let goals = vec![
            tracked("Car", GoalKind::SpecificPurchase),
            tracked("Rainy day", GoalKind::EmergencyFund),
        ];
        assert_eq!(find_emergency_goal(&goals).unwrap().name, "Rainy day");

        let goals = vec![tracked("My Emergency stash", GoalKind::NotSure)];
        assert!(find_emergency_goal(&goals).is_some());

        let goals = vec![tracked("Car", GoalKind::SpecificPurchase)];
        assert!(find_emergency_goal(&goals).is_none());
    }

    #[test]
    fn test_add_contribution() {
        let mut goal = tracked("Car", GoalKind::SpecificPurchase);
        goal.add_contribution(250.0).unwrap();
        goal.add_contribution(0.0).unwrap();
        assert_eq!(goal.amount_saved, 250.0);
        assert_eq!(goal.progress_percent(), 25);
        assert!(goal.add_contribution(-1.0).is_err());
        assert!(goal.add_contribution(f64::NAN).is_err());
    }
}
