//! Profile handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::{get_user_id, read_json, AppError, AppState, SuccessResponse};
use tesorin_core::{
    goals::find_emergency_goal, store::load_or_default, PlanSummary, Profile, TrackedGoal,
};

/// Profile as returned by the API
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// False when nothing is saved and defaults are shown
    pub stored: bool,
    #[serde(flatten)]
    pub profile: Profile,
}

/// GET /api/profile - Stored profile, or defaults
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = get_user_id(request.headers())?;

    let stored = state.db.get_profile(&user_id)?;

    state
        .db
        .log_audit(&user_id, "get", Some("profile"), None, None)?;

    Ok(Json(ProfileResponse {
        stored: stored.is_some(),
        profile: stored.unwrap_or_default(),
    }))
}

/// PUT /api/profile - Save the caller's profile
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let profile: Profile = read_json(request).await?;

    state.db.save_profile(&user_id, &profile)?;

    state.db.log_audit(
        &user_id,
        "update",
        Some("profile"),
        None,
        Some(&format!(
            "country={}, goals={}",
            profile.snapshot.country,
            profile.goals.len()
        )),
    )?;
    info!(user = %user_id, "Profile saved");

    Ok(Json(ProfileResponse {
        stored: true,
        profile,
    }))
}

/// DELETE /api/profile - Remove the caller's profile
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(request.headers())?;

    let deleted = state.db.delete_profile(&user_id)?;
    if !deleted {
        return Err(AppError::not_found("No profile saved"));
    }

    state
        .db
        .log_audit(&user_id, "delete", Some("profile"), None, None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Dashboard view of the stored profile
#[derive(Debug, Serialize)]
pub struct ProfilePlanResponse {
    #[serde(flatten)]
    pub summary: PlanSummary,
    /// Goals picked on the goals screen, at most three
    pub dashboard_goals: Vec<String>,
    /// Tracked emergency-fund goal, if any
    pub emergency_goal: Option<TrackedGoal>,
    pub emergency_goal_progress: Option<u8>,
}

/// GET /api/profile/plan - Plan summary for the stored (or default) profile
pub async fn profile_plan(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ProfilePlanResponse>, AppError> {
    let user_id = get_user_id(request.headers())?;

    let snapshot = load_or_default(&state.db, &user_id);
    let summary = state.planner.summarize(&snapshot);

    let dashboard_goals = state
        .db
        .get_profile(&user_id)?
        .map(|p| p.dashboard_goals().to_vec())
        .unwrap_or_default();

    let goals = state.db.list_goals(&user_id)?;
    let emergency_goal = find_emergency_goal(&goals).cloned();
    let emergency_goal_progress = emergency_goal.as_ref().map(TrackedGoal::progress_percent);

    Ok(Json(ProfilePlanResponse {
        summary,
        dashboard_goals,
        emergency_goal,
        emergency_goal_progress,
    }))
}
