//! Tracked goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{get_user_id, read_json, AppError, AppState, SuccessResponse};
use tesorin_core::{models::NewTrackedGoal, TrackedGoal};

/// GET /api/goals - List the caller's tracked goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<TrackedGoal>>, AppError> {
    let user_id = get_user_id(request.headers())?;

    let goals = state.db.list_goals(&user_id)?;

    state.db.log_audit(
        &user_id,
        "list",
        Some("goal"),
        None,
        Some(&format!("count={}", goals.len())),
    )?;

    Ok(Json(goals))
}

/// POST /api/goals - Create a goal, or update the one with the same name
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<TrackedGoal>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let goal: NewTrackedGoal = read_json(request).await?;

    let id = state.db.upsert_goal(&user_id, &goal)?;

    state.db.log_audit(
        &user_id,
        "upsert",
        Some("goal"),
        Some(id),
        Some(&format!(
            "name={}, target={}",
            goal.name.trim(),
            goal.target_amount
        )),
    )?;
    info!(user = %user_id, goal_id = id, "Goal saved");

    let saved = state
        .db
        .get_goal(&user_id, id)?
        .ok_or_else(|| AppError::internal("Goal not found after save"))?;

    Ok(Json(saved))
}

/// GET /api/goals/:id - Get a single goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<TrackedGoal>, AppError> {
    let user_id = get_user_id(request.headers())?;

    let goal = state
        .db
        .get_goal(&user_id, id)?
        .ok_or_else(|| AppError::not_found(&format!("Goal {} not found", id)))?;

    state
        .db
        .log_audit(&user_id, "get", Some("goal"), Some(id), None)?;

    Ok(Json(goal))
}

/// DELETE /api/goals/:id - Stop tracking a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(request.headers())?;

    if !state.db.delete_goal(&user_id, id)? {
        return Err(AppError::not_found(&format!("Goal {} not found", id)));
    }

    state
        .db
        .log_audit(&user_id, "delete", Some("goal"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Request body for recording money put toward a goal
#[derive(Debug, Deserialize)]
pub struct ContributeRequest {
    pub amount: f64,
}

/// POST /api/goals/:id/contribute - Add to a goal's saved amount
pub async fn contribute_to_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<TrackedGoal>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let req: ContributeRequest = read_json(request).await?;

    let goal = state.db.add_goal_contribution(&user_id, id, req.amount)?;

    state.db.log_audit(
        &user_id,
        "contribute",
        Some("goal"),
        Some(id),
        Some(&format!("amount={}", req.amount)),
    )?;

    Ok(Json(goal))
}
