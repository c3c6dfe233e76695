// Guild entity routes, used by channel/role selectors

use axum::extract::{Path, State};
use axum::Json;

use guilddeck_core::model::{GuildChannel, GuildRole};

use crate::error::ApiFailure;
use crate::AppState;

pub async fn channels(
    State(state): State<AppState>,
    Path(guild): Path<String>,
) -> Result<Json<Vec<GuildChannel>>, ApiFailure> {
    Ok(Json(state.dashboard.api.guild_channels(&guild).await?))
}

pub async fn roles(
    State(state): State<AppState>,
    Path(guild): Path<String>,
) -> Result<Json<Vec<GuildRole>>, ApiFailure> {
    Ok(Json(state.dashboard.api.guild_roles(&guild).await?))
}
