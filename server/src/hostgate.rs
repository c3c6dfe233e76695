// Host allow-list gate for the admin route group
//
// The operator panel talks to a control service that only exists on the
// box the dashboard runs on, so the whole group is limited to requests
// addressed to a local hostname. This is access control for an internal
// surface, not a security boundary.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub async fn require_allowed_host(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if state
        .config
        .admin_allowed_hosts
        .iter()
        .any(|allowed| *allowed == host)
    {
        return next.run(request).await;
    }

    warn!(target: "hostgate", host = %host, "Rejected admin request from non-local host");
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "detail": "the admin panel is only reachable from the host machine" })),
    )
        .into_response()
}
