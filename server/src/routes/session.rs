// Dashboard session routes
//
// The HTTP face of the settings-store protocol. This process hosts one
// interactive session: navigating mounts the page's editor on the bus and
// replaces whatever was mounted before; save/revert/reset drive the store.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use guilddeck_core::{DeckError, FeatureEditor, FeatureKey, FeatureSettings, SettingsEditor};

use crate::error::ApiFailure;
use crate::AppState;

#[derive(Deserialize)]
pub struct NavigateRequest {
    pub guild: String,
    pub page: String,
}

#[derive(Deserialize)]
pub struct EditRequest {
    pub feature: String,
    pub settings: serde_json::Value,
}

pub async fn navigate(
    State(state): State<AppState>,
    Json(body): Json<NavigateRequest>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let key: FeatureKey = body.page.parse()?;
    let store = &state.dashboard.store;

    let mut slot = state.session.lock().await;
    // Unmount whatever page was active; dropping the guard unregisters it.
    slot.guard.take();
    slot.editor.take();

    store
        .set_context(Some(body.guild.clone()), Some(body.page.clone()))
        .await;

    let editor = FeatureEditor::new(
        key,
        body.guild.as_str(),
        state.dashboard.api.clone(),
        state.dashboard.notifier.clone(),
        store.dirty_flag(),
    );
    editor.load().await;
    let guard = store.register_editor(editor.clone());

    let settings = editor.current().await.to_value()?;
    slot.editor = Some(editor);
    slot.guard = Some(guard);

    Ok(Json(json!({
        "guild": body.guild,
        "page": body.page,
        "settings": settings,
    })))
}

pub async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (guild, page) = state.dashboard.store.context().await;
    Json(json!({
        "guild": guild,
        "page": page,
        "dirty": state.dashboard.store.has_changes(),
    }))
}

pub async fn settings(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let slot = state.session.lock().await;
    let editor = slot.editor.as_ref().ok_or_else(no_page_mounted)?;
    Ok(Json(json!({
        "feature": editor.feature().as_str(),
        "settings": editor.current().await.to_value()?,
        "dirty": editor.is_dirty().await,
    })))
}

pub async fn edit(
    State(state): State<AppState>,
    Json(body): Json<EditRequest>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let key: FeatureKey = body.feature.parse()?;
    let settings = FeatureSettings::validate(key, body.settings)?;

    let slot = state.session.lock().await;
    let editor = slot.editor.as_ref().ok_or_else(no_page_mounted)?;
    if editor.feature() != key {
        return Err(ApiFailure(DeckError::InvalidSettings(format!(
            "the mounted page edits {}, not {}",
            editor.feature(),
            key
        ))));
    }

    editor.edit(settings).await;
    Ok(Json(json!({ "dirty": state.dashboard.store.has_changes() })))
}

pub async fn save(State(state): State<AppState>) -> Json<serde_json::Value> {
    let saved = state.dashboard.store.save_changes().await;
    Json(json!({
        "saved": saved,
        "dirty": state.dashboard.store.has_changes(),
    }))
}

pub async fn revert(State(state): State<AppState>) -> Json<serde_json::Value> {
    let reverted = state.dashboard.store.revert_changes().await;
    Json(json!({
        "reverted": reverted,
        "dirty": state.dashboard.store.has_changes(),
    }))
}

pub async fn reset(State(state): State<AppState>) -> Json<serde_json::Value> {
    let reset = state.dashboard.store.reset_to_defaults().await;
    Json(json!({
        "reset": reset,
        "dirty": state.dashboard.store.has_changes(),
    }))
}

fn no_page_mounted() -> ApiFailure {
    ApiFailure(DeckError::InvalidSettings(
        "no settings page is mounted".into(),
    ))
}
