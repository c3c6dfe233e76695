// Operator panel routes, proxied from the internal control service.
// Reachable only through the host gate.

use axum::extract::State;
use axum::Json;

use guilddeck_core::model::{CommandInfo, DetailedStats};

use crate::error::ApiFailure;
use crate::AppState;

pub async fn commands(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommandInfo>>, ApiFailure> {
    Ok(Json(state.dashboard.control.all_commands().await?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<DetailedStats>, ApiFailure> {
    Ok(Json(state.dashboard.control.detailed_stats().await?))
}
