// Store protocol coverage against an in-process stub backend.
//
// The stub speaks just enough of the backend REST surface for the store,
// editors, and layout cache to run end to end over a real socket.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use guilddeck_core::model::TempVoiceSettings;
use guilddeck_core::{
    ApiClient, Config, FeatureEditor, FeatureKey, FeatureSettings, Notifier, NoticeLevel,
    SettingsStore,
};

#[derive(Clone, Default)]
struct Backend {
    settings: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    save_calls: Arc<AtomicUsize>,
    layout_calls: Arc<AtomicUsize>,
    sidebar_calls: Arc<AtomicUsize>,
}

async fn get_settings(
    State(backend): State<Backend>,
    Path((guild, key)): Path<(String, String)>,
) -> Response {
    let map = backend.settings.read().await;
    match map.get(&format!("{}/{}", guild, key)) {
        Some(value) => Json(value.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_settings(
    State(backend): State<Backend>,
    Path((guild, key)): Path<(String, String)>,
) -> StatusCode {
    backend
        .settings
        .write()
        .await
        .remove(&format!("{}/{}", guild, key));
    StatusCode::OK
}

async fn save_settings(
    State(backend): State<Backend>,
    Path(guild): Path<String>,
    Json(body): Json<HashMap<String, serde_json::Value>>,
) -> StatusCode {
    backend.save_calls.fetch_add(1, Ordering::SeqCst);
    // Slow enough that a test can interleave an edit with the request.
    tokio::time::sleep(Duration::from_millis(30)).await;
    let mut map = backend.settings.write().await;
    for (key, value) in body {
        map.insert(format!("{}/{}", guild, key), value);
    }
    StatusCode::OK
}

async fn page_layout(State(backend): State<Backend>, Path(page): Path<String>) -> Response {
    backend.layout_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(20)).await;
    if page == "broken" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"detail": "layout store offline"})),
        )
            .into_response();
    }
    Json(serde_json::json!({
        "blocks": [{"type": "header", "title": page}]
    }))
    .into_response()
}

async fn sidebar(State(backend): State<Backend>) -> Response {
    backend.sidebar_calls.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({
        "sections": [
            {"name": "General", "entries": [{"label": "Overview", "path": "/overview"}]}
        ]
    }))
    .into_response()
}

async fn spawn_backend() -> (Backend, Config) {
    let backend = Backend::default();
    let app = Router::new()
        .route(
            "/api/v1/guilds/:guild/settings/:key",
            get(get_settings).delete(delete_settings),
        )
        .route("/api/v1/guilds/:guild/settings", post(save_settings))
        .route("/api/v1/layout/settings/sidebar", get(sidebar))
        .route("/api/v1/layout/settings/server/:page", get(page_layout))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config {
        api_base_url: format!("http://{}/api/v1", addr),
        ..Config::default()
    };
    (backend, config)
}

fn temp_voice(category: &str) -> FeatureSettings {
    FeatureSettings::TempVoice(TempVoiceSettings {
        category_id: Some(category.into()),
        ..TempVoiceSettings::default()
    })
}

struct Harness {
    backend: Backend,
    api: Arc<ApiClient>,
    notifier: Notifier,
    store: Arc<SettingsStore>,
}

async fn harness() -> Harness {
    let (backend, config) = spawn_backend().await;
    let api = Arc::new(ApiClient::new(&config).unwrap());
    let notifier = Notifier::default();
    let store = Arc::new(SettingsStore::new(api.clone(), notifier.clone()));
    Harness {
        backend,
        api,
        notifier,
        store,
    }
}

impl Harness {
    fn editor(&self, feature: FeatureKey, guild: &str) -> Arc<FeatureEditor> {
        FeatureEditor::new(
            feature,
            guild,
            self.api.clone(),
            self.notifier.clone(),
            self.store.dirty_flag(),
        )
    }
}

#[tokio::test]
async fn test_save_persists_and_clears_dirty() {
    let h = harness().await;
    h.store
        .set_context(Some("42".into()), Some("temp-voice".into()))
        .await;

    let editor = h.editor(FeatureKey::TempVoice, "42");
    let _guard = h.store.register_editor(editor.clone());
    editor.load().await;
    assert!(!h.store.has_changes());

    editor.edit(temp_voice("123")).await;
    assert!(h.store.has_changes());

    assert!(h.store.save_changes().await);
    assert!(!h.store.has_changes());
    assert!(!editor.is_dirty().await);
    assert_eq!(h.backend.save_calls.load(Ordering::SeqCst), 1);

    let stored = h.backend.settings.read().await;
    assert_eq!(stored["42/temp-voice"]["categoryID"], "123");
}

#[tokio::test]
async fn test_save_guards_issue_no_request() {
    let h = harness().await;
    let editor = h.editor(FeatureKey::TempVoice, "42");
    let _guard = h.store.register_editor(editor.clone());
    editor.load().await;

    // Clean store with full context: nothing to save.
    h.store
        .set_context(Some("42".into()), Some("temp-voice".into()))
        .await;
    assert!(!h.store.save_changes().await);

    // Dirty but the guild/page context is gone.
    editor.edit(temp_voice("123")).await;
    h.store.set_context(None, None).await;
    assert!(!h.store.save_changes().await);

    h.store.set_context(Some("42".into()), None).await;
    assert!(!h.store.save_changes().await);

    assert_eq!(h.backend.save_calls.load(Ordering::SeqCst), 0);
    assert!(h.store.has_changes());
}

#[tokio::test]
async fn test_revert_restores_pre_edit_value() {
    let h = harness().await;
    h.backend.settings.write().await.insert(
        "42/temp-voice".into(),
        serde_json::json!({"categoryID": "orig"}),
    );
    h.store
        .set_context(Some("42".into()), Some("temp-voice".into()))
        .await;

    let editor = h.editor(FeatureKey::TempVoice, "42");
    let _guard = h.store.register_editor(editor.clone());
    editor.load().await;

    editor.edit(temp_voice("123")).await;
    assert!(h.store.has_changes());

    assert!(h.store.revert_changes().await);
    assert_eq!(editor.current().await, temp_voice("orig"));
    assert!(!h.store.has_changes());
    assert_eq!(h.backend.save_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reset_refetches_post_reset_values() {
    let h = harness().await;
    h.backend.settings.write().await.insert(
        "42/temp-voice".into(),
        serde_json::json!({"categoryID": "old"}),
    );
    h.store
        .set_context(Some("42".into()), Some("temp-voice".into()))
        .await;

    let editor = h.editor(FeatureKey::TempVoice, "42");
    let _guard = h.store.register_editor(editor.clone());
    editor.load().await;
    editor.edit(temp_voice("unsaved")).await;

    assert!(h.store.reset_to_defaults().await);

    // The backend no longer stores the document and the editor shows the
    // freshly fetched defaults.
    assert!(!h
        .backend
        .settings
        .read()
        .await
        .contains_key("42/temp-voice"));
    assert_eq!(
        editor.current().await,
        FeatureSettings::default_for(FeatureKey::TempVoice)
    );
    assert!(!h.store.has_changes());
}

#[tokio::test]
async fn test_concurrent_layout_fetches_share_one_request() {
    let h = harness().await;

    let (a, b) = tokio::join!(
        h.store.fetch_page_layout("temp-voice"),
        h.store.fetch_page_layout("temp-voice"),
    );

    assert_eq!(a, b);
    assert!(!a.is_empty());
    assert_eq!(h.backend.layout_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_layout_failure_caches_empty_and_notifies() {
    let h = harness().await;
    let mut notices = h.notifier.subscribe();

    let layout = h.store.fetch_page_layout("broken").await;
    assert!(layout.is_empty());

    let notice = notices.recv().await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("layout store offline"));

    // The empty layout is cached; the backend is not asked again.
    let layout = h.store.fetch_page_layout("broken").await;
    assert!(layout.is_empty());
    assert_eq!(h.backend.layout_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sidebar_fetched_once_per_session() {
    let h = harness().await;

    let first = h.store.fetch_sidebar().await;
    let second = h.store.fetch_sidebar().await;

    assert_eq!(first, second);
    assert_eq!(first.sections[0].name, "General");
    assert_eq!(h.backend.sidebar_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_edit_during_save_stays_unsaved() {
    let h = harness().await;
    h.store
        .set_context(Some("42".into()), Some("temp-voice".into()))
        .await;

    let voice = h.editor(FeatureKey::TempVoice, "42");
    let badges = h.editor(FeatureKey::Badges, "42");
    let _g1 = h.store.register_editor(voice.clone());
    let _g2 = h.store.register_editor(badges.clone());
    voice.load().await;
    badges.load().await;

    voice.edit(temp_voice("123")).await;

    // Toggle the badge feed while the save request is in flight.
    let store = h.store.clone();
    let save = tokio::spawn(async move { store.save_changes().await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    badges
        .edit(FeatureSettings::validate(
            FeatureKey::Badges,
            serde_json::json!({"enabled": true}),
        )
        .unwrap())
        .await;

    assert!(save.await.unwrap());

    // The save carried only the payload collected when it started; the
    // concurrent badge edit is still unsaved and untouched.
    let stored = h.backend.settings.read().await;
    assert_eq!(stored["42/temp-voice"]["categoryID"], "123");
    assert!(!stored.contains_key("42/badges"));
    drop(stored);

    assert!(!voice.is_dirty().await);
    assert!(badges.is_dirty().await);
}
