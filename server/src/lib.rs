// Guilddeck dashboard server
//
// HTTP face of the dashboard: proxy routes over the bot backend's REST API,
// the session surface driving the settings store, an SSE notice stream, and
// the host-gated operator panel.

pub mod error;
pub mod hostgate;
pub mod routes;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use guilddeck_core::bus::EditorGuard;
use guilddeck_core::{Config, Dashboard, FeatureEditor};

/// The one interactive dashboard session this process hosts: whichever
/// settings page is currently mounted, plus its registration on the bus.
#[derive(Default)]
pub struct SessionSlot {
    pub editor: Option<Arc<FeatureEditor>>,
    pub guard: Option<EditorGuard>,
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub config: Config,
    pub session: Arc<Mutex<SessionSlot>>,
}

impl AppState {
    pub fn new(dashboard: Arc<Dashboard>, config: Config) -> Self {
        Self {
            dashboard,
            config,
            session: Arc::new(Mutex::new(SessionSlot::default())),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Operator panel; every route behind the host gate.
    let admin = Router::new()
        .route("/commands", get(routes::admin::commands))
        .route("/stats", get(routes::admin::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            hostgate::require_allowed_host,
        ));

    Router::new()
        .route("/api/layout/sidebar", get(routes::layout::sidebar))
        .route(
            "/api/layout/server-sidebar",
            get(routes::layout::server_sidebar),
        )
        .route("/api/layout/server/:page", get(routes::layout::page_layout))
        .route(
            "/api/session",
            put(routes::session::navigate).get(routes::session::info),
        )
        .route("/api/session/settings", get(routes::session::settings))
        .route("/api/session/edit", post(routes::session::edit))
        .route("/api/session/save", post(routes::session::save))
        .route("/api/session/revert", post(routes::session::revert))
        .route("/api/session/reset", post(routes::session::reset))
        .route(
            "/api/guilds/:guild/settings",
            post(routes::settings::save_merged),
        )
        .route(
            "/api/guilds/:guild/settings/:key",
            get(routes::settings::get_settings)
                .put(routes::settings::put_settings)
                .delete(routes::settings::delete_settings),
        )
        .route("/api/guilds/:guild/channels", get(routes::guild::channels))
        .route("/api/guilds/:guild/roles", get(routes::guild::roles))
        .route(
            "/api/guilds/:guild/badges",
            get(routes::badges::list).post(routes::badges::create),
        )
        .route(
            "/api/guilds/:guild/badges/:badge",
            put(routes::badges::update).delete(routes::badges::remove),
        )
        .route("/api/notices/stream", get(routes::notices::stream))
        .nest("/admin", admin)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
