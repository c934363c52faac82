//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tesorin_core::db::Database;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: false,
        ..Default::default()
    };
    create_router(db, None, config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, user: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(USER_HEADER, user)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(USER_HEADER, user)
        .body(Body::empty())
        .unwrap()
}

fn india_snapshot() -> serde_json::Value {
    serde_json::json!({
        "country": "IN",
        "monthly_income": 50000.0,
        "monthly_expenses": 30000.0,
        "current_savings": 10000.0,
        "current_debt": 0.0,
        "has_high_interest_debt": false
    })
}

// ========== Health & Auth Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_auth_required_without_key() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        api_keys: vec!["secret-key".to_string()],
        ..Default::default()
    };
    let app = create_router(db, None, config);

    let response = app
        .clone()
        .oneshot(get_request("/api/goals", "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Health is always reachable
    let response = app
        .clone()
        .oneshot(get_request("/api/health", "alice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/goals")
                .header("authorization", "Bearer secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_api_key_rejected() {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        require_auth: true,
        api_keys: vec!["secret-key".to_string()],
        ..Default::default()
    };
    let app = create_router(db, None, config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .header("authorization", "Bearer secret-kez")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_validate_api_key() {
    let keys = vec!["abc".to_string(), "longer-key".to_string()];
    assert!(validate_api_key("abc", &keys));
    assert!(validate_api_key("longer-key", &keys));
    assert!(!validate_api_key("abcd", &keys));
    assert!(!validate_api_key("", &keys));
    assert!(!validate_api_key("abc", &[]));
}

#[test]
fn test_parse_api_keys() {
    assert_eq!(
        ServerConfig::parse_api_keys(" one, ,two ,"),
        vec!["one".to_string(), "two".to_string()]
    );
    assert!(ServerConfig::parse_api_keys("").is_empty());
}

#[test]
fn test_get_user_id() {
    let mut headers = HeaderMap::new();
    assert_eq!(get_user_id(&headers).unwrap(), "local");

    headers.insert(USER_HEADER, HeaderValue::from_static("  "));
    assert_eq!(get_user_id(&headers).unwrap(), "local");

    headers.insert(USER_HEADER, HeaderValue::from_static("priya@example.com"));
    assert_eq!(get_user_id(&headers).unwrap(), "priya@example.com");

    headers.insert(USER_HEADER, HeaderValue::from_static("bad user/id"));
    let err = get_user_id(&headers).unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_core_errors_map_to_status() {
    let err = AppError::from(tesorin_core::Error::InvalidData("nope".to_string()));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = AppError::from(tesorin_core::Error::NotFound("gone".to_string()));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = AppError::from(tesorin_core::Error::Config("broken".to_string()));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ========== Planning API Tests ==========

#[tokio::test]
async fn test_plan_scenario() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/plan", "local", india_snapshot()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["cashflow"], 20000.0);
    assert_eq!(json["cashflow_status"], "surplus");
    assert_eq!(json["emergency_fund_target"], 90000.0);
    assert_eq!(json["savings_rate_target"], serde_json::json!([15.0, 25.0]));

    let plan = &json["plan"];
    let close = |v: &serde_json::Value, expected: f64| {
        (v.as_f64().unwrap() - expected).abs() < 1e-6
    };
    assert!(close(&plan["recommended_saving"], 10000.0));
    assert!(close(&plan["investing_share_amount"], 6000.0));
    assert!(close(&plan["emergency_share_amount"], 4000.0));
    assert!(close(&plan["debt_share_amount"], 0.0));
}

#[tokio::test]
async fn test_plan_rejects_negative_amounts() {
    let app = setup_test_app();

    let mut snapshot = india_snapshot();
    snapshot["monthly_expenses"] = serde_json::json!(-5.0);

    let response = app
        .oneshot(json_request("POST", "/api/plan", "local", snapshot))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("monthly_expenses"));
}

#[tokio::test]
async fn test_plan_rejects_malformed_json() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/plan")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_next_step_with_tracking() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "snapshot": india_snapshot(),
        "answers": { "kind": "emergency_fund", "why": "Peace of mind" },
        "track": true
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/plan/next-step", "priya", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["goal_name"], "Emergency fund");
    assert_eq!(json["target_amount"], 90000.0);
    assert_eq!(json["emergency_gap"], 80000.0);
    let goal_id = json["tracked_goal_id"].as_i64().unwrap();

    let response = app
        .oneshot(get_request(&format!("/api/goals/{}", goal_id), "priya"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["kind"], "emergency_fund");
    assert_eq!(json["why"], "Peace of mind");
}

#[tokio::test]
async fn test_goal_contribution_estimate() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "target_amount": 24000.0,
        "target_year": 2030,
        "current_year": 2028
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/goals/contribution", "local", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["monthly"], 1000.0);
    assert_eq!(json["years"], 2);

    // Past years still spread over at least twelve months
    let body = serde_json::json!({
        "target_amount": 1200.0,
        "target_year": 2020,
        "current_year": 2028
    });
    let response = app
        .oneshot(json_request("POST", "/api/goals/contribution", "local", body))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["monthly"], 100.0);
}

#[tokio::test]
async fn test_goal_contribution_extreme_years() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "target_amount": 1200.0,
        "target_year": i32::MIN,
        "current_year": i32::MAX
    });
    let response = app
        .oneshot(json_request("POST", "/api/goals/contribution", "local", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["monthly"], 100.0);
    assert_eq!(json["years"], 1);
}

// ========== Profile API Tests ==========

#[tokio::test]
async fn test_profile_defaults_then_saved() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get_request("/api/profile", "sam"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["stored"], false);
    assert_eq!(json["age"], 25);

    let profile = serde_json::json!({
        "country": "CA",
        "monthly_income": 4000.0,
        "monthly_expenses": 2500.0,
        "current_savings": 1500.0,
        "current_debt": 0.0,
        "has_high_interest_debt": false,
        "age": 31,
        "employment_status": "full_time",
        "household_size": 2,
        "dependents": 0,
        "primary_focus": "emergency_fund",
        "risk_comfort": 4,
        "money_feeling": "okay",
        "goals": ["Travel", "House", "Car", "Boat"]
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/profile", "sam", profile))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/api/profile", "sam"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["stored"], true);
    assert_eq!(json["country"], "CA");
    assert_eq!(json["age"], 31);

    let response = app
        .oneshot(get_request("/api/profile/plan", "sam"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["cashflow"], 1500.0);
    assert_eq!(json["emergency_fund_target"], 7500.0);
    assert_eq!(json["dashboard_goals"].as_array().unwrap().len(), 3);
    assert!(json["emergency_goal"].is_null());
}

#[tokio::test]
async fn test_profile_invalid_age_rejected() {
    let app = setup_test_app();

    let profile = serde_json::json!({
        "country": "IN",
        "monthly_income": 1000.0,
        "monthly_expenses": 500.0,
        "current_savings": 0.0,
        "current_debt": 0.0,
        "age": 90,
        "employment_status": "full_time",
        "household_size": 1,
        "dependents": 0,
        "primary_focus": "emergency_fund",
        "risk_comfort": 3,
        "money_feeling": "okay"
    });
    let response = app
        .oneshot(json_request("PUT", "/api/profile", "sam", profile))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_missing_profile_is_not_found() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/profile")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Goal API Tests ==========

#[tokio::test]
async fn test_goal_lifecycle() {
    let app = setup_test_app();

    let goal = serde_json::json!({
        "name": "New laptop",
        "kind": "specific_purchase",
        "target_amount": 1200.0,
        "target_year": 2027
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/goals", "alice", goal))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let id = json["id"].as_i64().unwrap();
    assert_eq!(json["amount_saved"], 0.0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/goals/{}/contribute", id),
            "alice",
            serde_json::json!({ "amount": 300.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["amount_saved"], 300.0);

    // Negative contributions are rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/goals/{}/contribute", id),
            "alice",
            serde_json::json!({ "amount": -10.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Other users cannot see it
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/goals/{}", id), "bob"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/goals/{}", id))
                .header(USER_HEADER, "alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/goals", "alice"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_contribute_to_missing_goal() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/goals/999/contribute",
            "alice",
            serde_json::json!({ "amount": 10.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Wallet API Tests ==========

#[tokio::test]
async fn test_wallet_transactions_and_stats() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(get_request("/api/wallets", "alice"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let wallets = json.as_array().unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0]["name"], "Main wallet");
    let wallet_id = wallets[0]["id"].as_i64().unwrap();

    let entries = [
        ("2026-04-01", 3000.0, "Salary"),
        ("2026-04-05", -1200.0, "Rent"),
        ("2026-04-10", -300.0, "Groceries"),
        ("2026-05-02", -50.0, "Phone"),
    ];
    for (date, amount, category) in entries {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/wallets/{}/transactions", wallet_id),
                "alice",
                serde_json::json!({ "date": date, "amount": amount, "category": category }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request(
            &format!(
                "/api/wallets/{}/transactions?start=2026-04-01&end=2026-04-30",
                wallet_id
            ),
            "alice",
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 3);

    let response = app
        .oneshot(get_request(
            &format!(
                "/api/wallets/{}/stats?start=2026-04-01&end=2026-04-30",
                wallet_id
            ),
            "alice",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["income"], 3000.0);
    assert_eq!(json["expenses"], 1500.0);
    assert_eq!(json["balance"], 1500.0);
    assert_eq!(json["transaction_count"], 3);
}

#[tokio::test]
async fn test_wallet_of_other_user_not_found() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/wallets",
            "alice",
            serde_json::json!({ "name": "Travel" }),
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let wallet_id = json["id"].as_i64().unwrap();

    let response = app
        .oneshot(get_request(
            &format!("/api/wallets/{}/stats", wallet_id),
            "bob",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Audit & Reset Tests ==========

#[tokio::test]
async fn test_audit_and_reset() {
    let app = setup_test_app();

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/goals",
            "alice",
            serde_json::json!({ "name": "Car", "target_amount": 9000.0 }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/api/audit?limit=5", "alice"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries[0]["action"], "upsert");
    assert_eq!(entries[0]["entity_type"], "goal");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/reset", "alice", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/goals", "alice"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}
