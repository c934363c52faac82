//! Planning handlers: health, stateless plans, next-step guidance

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{get_user_id, read_json, AppError, AppState};
use tesorin_core::{
    planner,
    store::load_or_default,
    FinancialSnapshot, NextStepAnswers, NextStepPlan, PlanSummary,
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /api/health - Liveness check (no auth)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /api/plan - Summarize a snapshot without storing it
pub async fn plan(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<PlanSummary>, AppError> {
    let snapshot: FinancialSnapshot = read_json(request).await?;
    snapshot.validate()?;

    Ok(Json(state.planner.summarize(&snapshot)))
}

/// Request body for next-step guidance
#[derive(Debug, Deserialize)]
pub struct NextStepRequest {
    /// Snapshot to plan against; the stored profile is used when omitted
    #[serde(default)]
    pub snapshot: Option<FinancialSnapshot>,
    #[serde(default)]
    pub answers: NextStepAnswers,
    /// Also save the plan as a tracked goal
    #[serde(default)]
    pub track: bool,
}

/// Next-step plan, plus the tracked goal id when one was saved
#[derive(Debug, Serialize)]
pub struct NextStepResponse {
    #[serde(flatten)]
    pub plan: NextStepPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_goal_id: Option<i64>,
}

/// POST /api/plan/next-step - Build next-step guidance for the chosen priority
pub async fn next_step(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<NextStepResponse>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let req: NextStepRequest = read_json(request).await?;

    let snapshot = match req.snapshot {
        Some(snapshot) => {
            snapshot.validate()?;
            snapshot
        }
        None => load_or_default(&state.db, &user_id),
    };
    if !(1..=5).contains(&req.answers.risk) {
        return Err(AppError::bad_request("risk must be between 1 and 5"));
    }

    let plan = NextStepPlan::build_with(&state.planner, &snapshot, &req.answers);

    let tracked_goal_id = if req.track {
        let goal = plan.to_tracked_goal(req.answers.why.clone());
        let id = state.db.upsert_goal(&user_id, &goal)?;
        state.db.log_audit(
            &user_id,
            "track",
            Some("goal"),
            Some(id),
            Some(&format!("name={}, kind={}", goal.name, goal.kind)),
        )?;
        info!(user = %user_id, goal = %goal.name, "Next step tracked as goal");
        Some(id)
    } else {
        None
    };

    Ok(Json(NextStepResponse {
        plan,
        tracked_goal_id,
    }))
}

/// Request body for the goal contribution estimate
#[derive(Debug, Deserialize)]
pub struct GoalContributionRequest {
    pub target_amount: f64,
    pub target_year: i32,
    /// Defaults to the server's current year
    #[serde(default)]
    pub current_year: Option<i32>,
}

/// Monthly amount needed for a goal
#[derive(Debug, Serialize)]
pub struct GoalContributionResponse {
    pub monthly: f64,
    /// Whole years the amount is spread over
    pub years: i32,
}

/// POST /api/goals/contribution - Flat monthly contribution for a target and year
pub async fn goal_contribution(request: Request) -> Result<Json<GoalContributionResponse>, AppError> {
    let req: GoalContributionRequest = read_json(request).await?;

    if !req.target_amount.is_finite() || req.target_amount < 0.0 {
        return Err(AppError::bad_request("target_amount cannot be negative"));
    }

    let current_year = req
        .current_year
        .unwrap_or_else(|| chrono::Local::now().year());
    let monthly =
        planner::monthly_goal_contribution(req.target_amount, req.target_year, current_year);

    Ok(Json(GoalContributionResponse {
        monthly,
        years: planner::goal_horizon_years(req.target_year, current_year),
    }))
}
