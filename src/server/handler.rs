//! HTTP authorization handler
//!
//! Exposes the authorizer to reverse proxies and other hosts. A request names
//! the path and the caller's groups; the response carries the decision as JSON
//! and mirrors it in the status code (`200` allowed, `403` otherwise), so it can
//! back an `auth_request`-style sub-request directly.

use crate::access_control::{AccessDecision, AuthorizeOptions, UriAuthorizer, resolve_base};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Header carrying comma-separated caller groups, merged with the `groups` query parameter
pub const GROUPS_HEADER: &str = "x-auth-groups";

/// Shared state for handlers
#[derive(Clone)]
pub struct AuthorizerState {
    pub authorizer: Arc<UriAuthorizer>,
}

/// Query parameters for `/authorize`
#[derive(Debug, Default, Deserialize)]
pub struct AuthorizeQuery {
    /// Resource path to check
    pub path: Option<String>,
    /// Comma-separated caller groups
    #[serde(default)]
    pub groups: Option<String>,
    /// Per-request base depth override
    pub base_depth: Option<usize>,
}

/// Decision returned by `/authorize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    pub path: String,
    pub base: String,
    pub allowed: bool,
    pub groups: Vec<String>,
    pub outcome: String,
    pub rule: Option<String>,
}

impl AuthorizeResponse {
    pub fn new(path: &str, base: String, decision: AccessDecision) -> Self {
        let allowed = decision.is_allowed();
        let outcome = decision.outcome().to_string();
        let rule = decision.rule().map(str::to_string);
        Self {
            path: path.to_string(),
            base,
            allowed,
            groups: decision.into_groups(),
            outcome,
            rule,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the HTTP router
pub fn router(authorizer: Arc<UriAuthorizer>) -> Router {
    let state = AuthorizerState { authorizer };

    Router::new()
        .route("/authorize", get(authorize))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Split a comma-separated group list, dropping empty entries
pub fn parse_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Authorization endpoint
async fn authorize(
    State(state): State<AuthorizerState>,
    headers: HeaderMap,
    Query(query): Query<AuthorizeQuery>,
) -> Response {
    let Some(path) = query.path.filter(|p| !p.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "missing 'path' query parameter".to_string(),
            }),
        )
            .into_response();
    };

    let mut groups = query.groups.as_deref().map(parse_groups).unwrap_or_default();
    for value in headers.get_all(GROUPS_HEADER) {
        if let Ok(raw) = value.to_str() {
            groups.extend(parse_groups(raw));
        }
    }

    let options = query
        .base_depth
        .map(|base_depth| AuthorizeOptions { base_depth })
        .unwrap_or_else(|| state.authorizer.options());

    let decision = state.authorizer.evaluate_with(&path, &groups, &options);
    let base = resolve_base(&path, options.base_depth);

    info!(
        path = %path,
        base = %base,
        outcome = decision.outcome(),
        rule = ?decision.rule(),
        "Authorization decided"
    );

    let status = if decision.is_allowed() {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };

    (status, Json(AuthorizeResponse::new(&path, base, decision))).into_response()
}

/// Liveness probe
async fn health() -> impl IntoResponse {
    debug!("Health check");
    Json(serde_json::json!({ "status": "ok" }))
}
