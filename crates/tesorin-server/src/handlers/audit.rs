//! Audit log and data reset handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::{get_user_id, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use tesorin_core::AuditEntry;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// GET /api/audit - The caller's recent audit entries, newest first
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditQuery>,
    request: Request,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let user_id = get_user_id(request.headers())?;

    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let entries = state.db.list_audit_log(&user_id, limit)?;

    Ok(Json(entries))
}

/// POST /api/reset - Delete everything stored for the caller
pub async fn reset_user_data(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = get_user_id(request.headers())?;

    state.db.reset_user(&user_id)?;

    state
        .db
        .log_audit(&user_id, "reset", Some("user"), None, None)?;
    warn!(user = %user_id, "All user data deleted via API");

    Ok(Json(SuccessResponse { success: true }))
}
