// Layout descriptor routes
//
// All three go through the store's single-flight cache; a failed backend
// fetch surfaces as an empty descriptor plus a notice, never as an error.

use axum::extract::{Path, State};
use axum::Json;

use guilddeck_core::{LayoutDescriptor, SidebarDescriptor};

use crate::AppState;

pub async fn sidebar(State(state): State<AppState>) -> Json<SidebarDescriptor> {
    Json(state.dashboard.store.fetch_sidebar().await)
}

pub async fn server_sidebar(State(state): State<AppState>) -> Json<SidebarDescriptor> {
    Json(state.dashboard.store.fetch_server_sidebar().await)
}

pub async fn page_layout(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Json<LayoutDescriptor> {
    Json(state.dashboard.store.fetch_page_layout(&page).await)
}
