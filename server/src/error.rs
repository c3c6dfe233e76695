// HTTP mapping for core errors
//
// Backend errors pass through with their original status and detail;
// everything else maps onto the closest gateway-side status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use guilddeck_core::DeckError;
use serde_json::json;

pub struct ApiFailure(pub DeckError);

impl From<DeckError> for ApiFailure {
    fn from(e: DeckError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            DeckError::Api { status, detail } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                detail.clone(),
            ),
            DeckError::InvalidSettings(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DeckError::Transport(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            DeckError::Serialization(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            DeckError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
