//! Wallet handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::{get_user_id, read_json, AppError, AppState};
use tesorin_core::{
    models::{NewWalletTransaction, Wallet, WalletTransaction},
    WalletStats,
};

/// Request body for creating a wallet
#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    pub name: String,
}

/// Query parameters selecting an inclusive date period
#[derive(Debug, Deserialize, Default)]
pub struct PeriodQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl PeriodQuery {
    /// Resolve missing bounds to the current month so far
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        (self.start.unwrap_or(month_start), self.end.unwrap_or(today))
    }
}

/// GET /api/wallets - List wallets (creates the default wallet on first use)
pub async fn list_wallets(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Wallet>>, AppError> {
    let user_id = get_user_id(request.headers())?;

    let wallets = state.db.list_wallets(&user_id)?;

    state.db.log_audit(
        &user_id,
        "list",
        Some("wallet"),
        None,
        Some(&format!("count={}", wallets.len())),
    )?;

    Ok(Json(wallets))
}

/// POST /api/wallets - Create a wallet
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Wallet>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let req: CreateWalletRequest = read_json(request).await?;

    let wallet_id = state.db.upsert_wallet(&user_id, &req.name)?;

    state.db.log_audit(
        &user_id,
        "create",
        Some("wallet"),
        Some(wallet_id),
        Some(&format!("name={}", req.name.trim())),
    )?;

    let wallet = state
        .db
        .get_wallet(&user_id, wallet_id)?
        .ok_or_else(|| AppError::internal("Wallet not found after creation"))?;

    Ok(Json(wallet))
}

/// GET /api/wallets/:id/transactions - Entries within a period
pub async fn list_wallet_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(period): Query<PeriodQuery>,
    request: Request,
) -> Result<Json<Vec<WalletTransaction>>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let (start, end) = period.resolve(chrono::Local::now().date_naive());

    let transactions = state
        .db
        .list_wallet_transactions(&user_id, id, start, end)?;

    state.db.log_audit(
        &user_id,
        "list",
        Some("wallet_transaction"),
        Some(id),
        Some(&format!("start={}, end={}, count={}", start, end, transactions.len())),
    )?;

    Ok(Json(transactions))
}

/// POST /api/wallets/:id/transactions - Record an income or expense entry
pub async fn add_wallet_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<WalletTransaction>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let tx: NewWalletTransaction = read_json(request).await?;

    let created = state.db.add_wallet_transaction(&user_id, id, &tx)?;

    state.db.log_audit(
        &user_id,
        "create",
        Some("wallet_transaction"),
        Some(created.id),
        Some(&format!("wallet={}, amount={}", id, created.amount)),
    )?;

    Ok(Json(created))
}

/// GET /api/wallets/:id/stats - Totals within a period
pub async fn wallet_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(period): Query<PeriodQuery>,
    request: Request,
) -> Result<Json<WalletStats>, AppError> {
    let user_id = get_user_id(request.headers())?;
    let (start, end) = period.resolve(chrono::Local::now().date_naive());

    let stats = state.db.wallet_stats(&user_id, id, start, end)?;

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_period_defaults_to_current_month() {
        let period = PeriodQuery::default();
        assert_eq!(
            period.resolve(day("2026-03-17")),
            (day("2026-03-01"), day("2026-03-17"))
        );
    }

    #[test]
    fn test_period_keeps_given_bounds() {
        let period = PeriodQuery {
            start: Some(day("2025-12-01")),
            end: None,
        };
        assert_eq!(
            period.resolve(day("2026-03-17")),
            (day("2025-12-01"), day("2026-03-17"))
        );
    }
}
