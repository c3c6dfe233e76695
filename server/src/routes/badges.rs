// Badge management routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use guilddeck_core::model::{Badge, NewBadge};

use crate::error::ApiFailure;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Path(guild): Path<String>,
) -> Result<Json<Vec<Badge>>, ApiFailure> {
    Ok(Json(state.dashboard.api.list_badges(&guild).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Path(guild): Path<String>,
    Json(badge): Json<NewBadge>,
) -> Result<(StatusCode, Json<Badge>), ApiFailure> {
    let created = state.dashboard.api.create_badge(&guild, &badge).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((guild, badge_id)): Path<(String, String)>,
    Json(mut badge): Json<Badge>,
) -> Result<StatusCode, ApiFailure> {
    // The path owns the identity.
    badge.id = badge_id;
    state.dashboard.api.update_badge(&guild, &badge).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<AppState>,
    Path((guild, badge_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiFailure> {
    state.dashboard.api.delete_badge(&guild, &badge_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
