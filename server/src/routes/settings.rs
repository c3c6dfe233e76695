// Guild settings proxy routes
//
// Payloads are validated against the feature's schema before anything is
// forwarded; the backend never sees a document this crate cannot parse.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use guilddeck_core::{FeatureKey, FeatureSettings};

use crate::error::ApiFailure;
use crate::AppState;

pub async fn get_settings(
    State(state): State<AppState>,
    Path((guild, key)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let key: FeatureKey = key.parse()?;
    let settings = state.dashboard.api.get_settings(&guild, key).await?;
    Ok(Json(settings.to_value()?))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Path((guild, key)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<StatusCode, ApiFailure> {
    let key: FeatureKey = key.parse()?;
    let settings = FeatureSettings::validate(key, body)?;
    state.dashboard.api.put_settings(&guild, &settings).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_settings(
    State(state): State<AppState>,
    Path((guild, key)): Path<(String, String)>,
) -> Result<StatusCode, ApiFailure> {
    let key: FeatureKey = key.parse()?;
    state.dashboard.api.delete_settings(&guild, key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Merged multi-feature save, the shape a dashboard save produces.
pub async fn save_merged(
    State(state): State<AppState>,
    Path(guild): Path<String>,
    Json(body): Json<HashMap<String, serde_json::Value>>,
) -> Result<StatusCode, ApiFailure> {
    let mut payload = HashMap::new();
    for (key, value) in body {
        let key: FeatureKey = key.parse()?;
        payload.insert(key, FeatureSettings::validate(key, value)?);
    }

    state.dashboard.api.save_settings(&guild, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
