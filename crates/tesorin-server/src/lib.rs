//! Tesorin Web Server
//!
//! Axum-based REST API for the Tesorin first-step money planner.
//!
//! Security features:
//! - API key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Input validation (body size limits, user id checks, pagination limits)
//! - Audit logging for profile, goal and wallet access
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use tesorin_core::{Database, Planner};

mod handlers;

/// Maximum JSON request body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Header carrying the caller's user id
pub const USER_HEADER: &str = "x-tesorin-user";

/// User id used when the header is absent
pub const DEFAULT_USER: &str = "local";

/// Environment variable holding comma-separated API keys
pub const API_KEYS_ENV: &str = "TESORIN_API_KEYS";

/// Longest accepted user id
const MAX_USER_ID_LEN: usize = 64;

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys accepted as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

impl ServerConfig {
    /// Parse a comma-separated key list, skipping blanks
    pub fn parse_api_keys(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Read API keys from `TESORIN_API_KEYS`
    pub fn api_keys_from_env() -> Vec<String> {
        std::env::var(API_KEYS_ENV)
            .map(|v| Self::parse_api_keys(&v))
            .unwrap_or_default()
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub planner: Planner<'static>,
    pub config: ServerConfig,
}

/// Authentication middleware - validates API keys
///
/// `/api/health` is always reachable. Keys are compared in constant time.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth || request.uri().path() == "/api/health" {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid API key");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Extract the caller's user id from request headers
///
/// Falls back to `"local"` when the header is missing or blank. Ids are limited
/// to ASCII letters, digits and `-_.@`.
pub fn get_user_id(headers: &HeaderMap) -> Result<String, AppError> {
    let raw = match headers.get(USER_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::bad_request("Invalid user header"))?
            .trim(),
        None => return Ok(DEFAULT_USER.to_string()),
    };

    if raw.is_empty() {
        return Ok(DEFAULT_USER.to_string());
    }

    let valid = raw.len() <= MAX_USER_ID_LEN
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'));
    if !valid {
        return Err(AppError::bad_request("Invalid user id"));
    }

    Ok(raw.to_string())
}

/// Read and parse a JSON request body
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router with the built-in planning policy
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_options(db, Planner::default(), static_dir, config)
}

/// Create the application router with an explicit planner
pub fn create_router_with_options(
    db: Database,
    planner: Planner<'static>,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    let cors = build_cors(&config.allowed_origins);

    let state = Arc::new(AppState {
        db,
        planner,
        config,
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Stateless planning
        .route("/plan", post(handlers::plan))
        .route("/plan/next-step", post(handlers::next_step))
        .route("/goals/contribution", post(handlers::goal_contribution))
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile)
                .put(handlers::save_profile)
                .delete(handlers::delete_profile),
        )
        .route("/profile/plan", get(handlers::profile_plan))
        // Tracked goals
        .route(
            "/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/goals/:id",
            get(handlers::get_goal).delete(handlers::delete_goal),
        )
        .route("/goals/:id/contribute", post(handlers::contribute_to_goal))
        // Wallets
        .route(
            "/wallets",
            get(handlers::list_wallets).post(handlers::create_wallet),
        )
        .route(
            "/wallets/:id/transactions",
            get(handlers::list_wallet_transactions).post(handlers::add_wallet_transaction),
        )
        .route("/wallets/:id/stats", get(handlers::wallet_stats))
        // Audit and reset
        .route("/audit", get(handlers::list_audit_log))
        .route("/reset", post(handlers::reset_user_data));

    // CSP: restrict scripts to same-origin, allow inline styles
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        header::HeaderName::from_static(USER_HEADER),
    ];

    let cors = CorsLayer::new().allow_methods(methods).allow_headers(headers);
    if allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        return cors;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(origins)
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    planner: Planner<'static>,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        anyhow::bail!(
            "Authentication is required but no API keys are configured (set {} or use --no-auth)",
            API_KEYS_ENV
        );
    } else {
        info!(keys = config.api_keys.len(), "API key authentication enabled");
    }

    let app = create_router_with_options(db, planner, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Validation and lookup failures are safe to show to the client
        match err.downcast_ref::<tesorin_core::Error>() {
            Some(tesorin_core::Error::InvalidData(msg)) => return Self::bad_request(msg),
            Some(tesorin_core::Error::NotFound(msg)) => return Self::not_found(msg),
            _ => {}
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
