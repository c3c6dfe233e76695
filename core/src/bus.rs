// Editor command bus
//
// Settings pages register themselves here while mounted and receive the
// store's commands through direct trait calls. Registration order is
// preserved; on a feature-key collision during collection the latest
// registration wins and the collision is logged.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::editor::SettingsEditor;
use crate::model::{FeatureKey, FeatureSettings};

type EditorMap = Arc<DashMap<u64, Arc<dyn SettingsEditor>>>;

/// Registry of currently mounted settings editors.
pub struct EditorRegistry {
    editors: EditorMap,
    next_id: AtomicU64,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self {
            editors: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register an editor. The returned guard unregisters it on drop.
    pub fn register(&self, editor: Arc<dyn SettingsEditor>) -> EditorGuard {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!(target: "bus", id, feature = %editor.feature(), "Editor registered");
        self.editors.insert(id, editor);
        EditorGuard {
            editors: self.editors.clone(),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Collect unsaved settings from every editor, merged into one payload.
    pub async fn collect_unsaved(&self) -> HashMap<FeatureKey, FeatureSettings> {
        let mut payload = HashMap::new();
        for (id, editor) in self.snapshot() {
            if let Some(settings) = editor.unsaved().await {
                let key = settings.key();
                if payload.insert(key, settings).is_some() {
                    warn!(
                        target: "bus",
                        id,
                        feature = %key,
                        "Multiple editors hold unsaved settings for the same feature; keeping the latest registration"
                    );
                }
            }
        }
        payload
    }

    /// Ask every editor to restore its original snapshot. Returns how many
    /// actually had unsaved edits to discard.
    pub async fn revert_all(&self) -> usize {
        let mut reverted = 0;
        for (_, editor) in self.snapshot() {
            if editor.revert().await {
                reverted += 1;
            }
        }
        reverted
    }

    /// Promote working copies to snapshots after a successful save.
    pub async fn commit_saved(&self) {
        for (_, editor) in self.snapshot() {
            editor.commit_saved().await;
        }
    }

    /// Return editors that were mid-save to their dirty state.
    pub async fn save_failed(&self) {
        for (_, editor) in self.snapshot() {
            editor.save_failed().await;
        }
    }

    /// Tell every editor that server-side settings were reset; each one
    /// refetches and re-enters its loading state.
    pub async fn notify_reset(&self) {
        for (_, editor) in self.snapshot() {
            editor.reload().await;
        }
    }

    // Dispatch iterates a point-in-time snapshot in registration order, so
    // an editor dropped mid-dispatch cannot invalidate the iteration.
    fn snapshot(&self) -> Vec<(u64, Arc<dyn SettingsEditor>)> {
        let mut entries: Vec<_> = self
            .editors
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

impl Default for EditorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps an editor registered for as long as the page is mounted.
pub struct EditorGuard {
    editors: EditorMap,
    id: u64,
}

impl Drop for EditorGuard {
    fn drop(&mut self) {
        self.editors.remove(&self.id);
        debug!(target: "bus", id = self.id, "Editor unregistered");
    }
}
