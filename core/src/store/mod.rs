// Settings store
//
// The store coordinates everything a settings page needs: cached layout and
// sidebar descriptors, the session-wide dirty flag, and the save / revert /
// reset protocol dispatched to registered editors. Every operation catches
// its own failures and reports them as notices; nothing here returns an
// error to the caller.

mod cache;

pub use cache::SingleFlight;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::bus::{EditorGuard, EditorRegistry};
use crate::editor::SettingsEditor;
use crate::model::{FeatureKey, LayoutDescriptor, SidebarDescriptor};
use crate::notify::Notifier;

const SIDEBAR_KEY: &str = "sidebar";
const SERVER_SIDEBAR_KEY: &str = "server/sidebar";

/// Shared handle to the store's dirty flag. Editors recompute it on every
/// edit; the store clears it when a save or revert completes.
#[derive(Clone, Default)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
struct PageContext {
    guild: Option<String>,
    page: Option<String>,
}

pub struct SettingsStore {
    api: Arc<ApiClient>,
    notifier: Notifier,
    registry: EditorRegistry,
    dirty: DirtyFlag,
    context: RwLock<PageContext>,
    layouts: SingleFlight<LayoutDescriptor>,
    sidebars: SingleFlight<SidebarDescriptor>,
}

impl SettingsStore {
    pub fn new(api: Arc<ApiClient>, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            registry: EditorRegistry::new(),
            dirty: DirtyFlag::default(),
            context: RwLock::new(PageContext::default()),
            layouts: SingleFlight::new(),
            sidebars: SingleFlight::new(),
        }
    }

    // ---- context & dirty flag ----

    pub async fn set_context(&self, guild: Option<String>, page: Option<String>) {
        let mut context = self.context.write().await;
        context.guild = guild;
        context.page = page;
    }

    pub async fn context(&self) -> (Option<String>, Option<String>) {
        let context = self.context.read().await;
        (context.guild.clone(), context.page.clone())
    }

    /// Record the dirty state. No validation; editors call this through
    /// their flag handle on every edit.
    pub fn set_has_changes(&self, value: bool) {
        self.dirty.set(value);
    }

    pub fn has_changes(&self) -> bool {
        self.dirty.get()
    }

    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    // ---- editor registration ----

    pub fn register_editor(&self, editor: Arc<dyn SettingsEditor>) -> EditorGuard {
        self.registry.register(editor)
    }

    pub fn registry(&self) -> &EditorRegistry {
        &self.registry
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    // ---- cached descriptors ----

    /// Layout for one settings page. Cached for the store's lifetime; a
    /// failed fetch caches the empty layout and reports a notice instead of
    /// surfacing an error.
    pub async fn fetch_page_layout(&self, page: &str) -> LayoutDescriptor {
        let api = self.api.clone();
        let notifier = self.notifier.clone();
        let page_key = page.to_string();
        self.layouts
            .get_or_load(page, move || async move {
                match api.page_layout(&page_key).await {
                    Ok(layout) => layout,
                    Err(e) => {
                        notifier.error(format!("Failed to load layout for {}: {}", page_key, e));
                        LayoutDescriptor::default()
                    }
                }
            })
            .await
    }

    /// Main navigation sidebar, fetched at most once per store lifetime.
    pub async fn fetch_sidebar(&self) -> SidebarDescriptor {
        let api = self.api.clone();
        let notifier = self.notifier.clone();
        self.sidebars
            .get_or_load(SIDEBAR_KEY, move || async move {
                match api.sidebar().await {
                    Ok(sidebar) => sidebar,
                    Err(e) => {
                        notifier.error(format!("Failed to load sidebar: {}", e));
                        SidebarDescriptor::default()
                    }
                }
            })
            .await
    }

    /// Per-guild settings sidebar, same caching rules as `fetch_sidebar`.
    pub async fn fetch_server_sidebar(&self) -> SidebarDescriptor {
        let api = self.api.clone();
        let notifier = self.notifier.clone();
        self.sidebars
            .get_or_load(SERVER_SIDEBAR_KEY, move || async move {
                match api.server_sidebar().await {
                    Ok(sidebar) => sidebar,
                    Err(e) => {
                        notifier.error(format!("Failed to load server sidebar: {}", e));
                        SidebarDescriptor::default()
                    }
                }
            })
            .await
    }

    // ---- save / revert / reset protocol ----

    /// Collect unsaved settings from registered editors and persist them as
    /// one payload. A no-op unless the dirty flag is set and both guild and
    /// page context are known. Returns whether a save went through.
    pub async fn save_changes(&self) -> bool {
        if !self.dirty.get() {
            debug!(target: "store", "Save skipped; no unsaved changes");
            return false;
        }
        let (guild, page) = self.context().await;
        let (Some(guild), Some(_page)) = (guild, page) else {
            debug!(target: "store", "Save skipped; guild or page context unset");
            return false;
        };

        let payload = self.registry.collect_unsaved().await;
        if payload.is_empty() {
            warn!(target: "store", "Dirty flag set but no editor reported unsaved settings");
            self.notifier.error("Nothing to save");
            return false;
        }

        match self.api.save_settings(&guild, &payload).await {
            Ok(()) => {
                self.registry.commit_saved().await;
                self.dirty.set(false);
                self.notifier.info("Settings saved");
                true
            }
            Err(e) => {
                // No rollback; editors keep their unsaved state.
                self.registry.save_failed().await;
                self.notifier
                    .error(format!("Failed to save settings: {}", e));
                false
            }
        }
    }

    /// Ask editors to restore their snapshots. The dirty flag is cleared
    /// only when at least one editor actually reverted; a revert nobody
    /// handles keeps the flag so displayed state and flag cannot drift
    /// apart.
    pub async fn revert_changes(&self) -> bool {
        if !self.dirty.get() {
            return false;
        }

        let reverted = self.registry.revert_all().await;
        if reverted > 0 {
            self.dirty.set(false);
            debug!(target: "store", reverted, "Reverted unsaved changes");
            true
        } else {
            warn!(
                target: "store",
                "Revert requested but no registered editor had unsaved edits; keeping the dirty flag"
            );
            false
        }
    }

    /// Delete the stored settings for the current page and tell editors to
    /// refetch. The dirty flag is left alone; it gets recomputed when the
    /// refetch lands.
    pub async fn reset_to_defaults(&self) -> bool {
        let (guild, page) = self.context().await;
        let (Some(guild), Some(page)) = (guild, page) else {
            debug!(target: "store", "Reset skipped; guild or page context unset");
            return false;
        };

        let key = match page.parse::<FeatureKey>() {
            Ok(key) => key,
            Err(e) => {
                self.notifier.error(format!("Cannot reset {}: {}", page, e));
                return false;
            }
        };

        match self.api.delete_settings(&guild, key).await {
            Ok(()) => {
                self.registry.notify_reset().await;
                self.notifier
                    .info(format!("{} settings reset to defaults", key));
                true
            }
            Err(e) => {
                self.notifier
                    .error(format!("Failed to reset settings: {}", e));
                false
            }
        }
    }
}
