// Settings editors
//
// Each settings page owns its own working copy of a feature's settings plus
// the snapshot taken at fetch time. The dirty flag is always derived as a
// structural comparison against that snapshot; there is no per-field
// tracking.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::api::ApiClient;
use crate::model::{FeatureKey, FeatureSettings};
use crate::notify::Notifier;
use crate::store::DirtyFlag;

/// Commands an editor answers while registered on the bus.
#[async_trait]
pub trait SettingsEditor: Send + Sync {
    fn feature(&self) -> FeatureKey;

    /// Hand over the current settings if they differ from the snapshot.
    /// An editor that reports a payload enters its saving state until the
    /// store dispatches `commit_saved` or `save_failed`.
    async fn unsaved(&self) -> Option<FeatureSettings>;

    /// Restore the snapshot. Returns whether there was anything to revert.
    async fn revert(&self) -> bool;

    /// A save including this editor's payload succeeded; the working copy
    /// becomes the new snapshot.
    async fn commit_saved(&self);

    /// The save request failed; nothing is rolled back.
    async fn save_failed(&self);

    /// Server-side settings were reset; refetch and start over.
    async fn reload(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Saving,
}

/// Per-page editing state machine:
/// `Loading -> Ready(clean) <-> Ready(dirty) -> Saving -> Ready(clean)`,
/// with revert collapsing dirty back to clean and reset returning to
/// `Loading` from anywhere.
#[derive(Debug, Clone)]
pub struct EditorSession {
    feature: FeatureKey,
    state: SessionState,
    current: FeatureSettings,
    original: FeatureSettings,
}

impl EditorSession {
    pub fn new(feature: FeatureKey) -> Self {
        let defaults = FeatureSettings::default_for(feature);
        Self {
            feature,
            state: SessionState::Loading,
            current: defaults.clone(),
            original: defaults,
        }
    }

    pub fn feature(&self) -> FeatureKey {
        self.feature
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> &FeatureSettings {
        &self.current
    }

    pub fn original(&self) -> &FeatureSettings {
        &self.original
    }

    pub fn dirty(&self) -> bool {
        self.current != self.original
    }

    /// Install freshly fetched settings as both the working copy and the
    /// snapshot.
    pub fn install(&mut self, settings: FeatureSettings) {
        self.current = settings.clone();
        self.original = settings;
        self.state = SessionState::Ready;
    }

    /// Replace the working copy. Editing while a save is in flight is
    /// allowed; the last completed request wins. Returns the new dirty
    /// state.
    pub fn edit(&mut self, settings: FeatureSettings) -> bool {
        self.current = settings;
        self.state = SessionState::Ready;
        self.dirty()
    }

    /// Restore the snapshot. Returns whether there were edits to discard.
    pub fn revert(&mut self) -> bool {
        if !self.dirty() {
            return false;
        }
        self.current = self.original.clone();
        self.state = SessionState::Ready;
        true
    }

    pub fn begin_save(&mut self) {
        if self.state == SessionState::Ready && self.dirty() {
            self.state = SessionState::Saving;
        }
    }

    pub fn commit(&mut self) {
        self.original = self.current.clone();
        self.state = SessionState::Ready;
    }

    pub fn fail_save(&mut self) {
        if self.state == SessionState::Saving {
            self.state = SessionState::Ready;
        }
    }

    pub fn reset(&mut self) {
        self.state = SessionState::Loading;
    }
}

/// An editor bound to one feature of one guild, backed by the REST API.
pub struct FeatureEditor {
    feature: FeatureKey,
    guild: String,
    api: Arc<ApiClient>,
    notifier: Notifier,
    dirty: DirtyFlag,
    session: Mutex<EditorSession>,
}

impl FeatureEditor {
    pub fn new(
        feature: FeatureKey,
        guild: impl Into<String>,
        api: Arc<ApiClient>,
        notifier: Notifier,
        dirty: DirtyFlag,
    ) -> Arc<Self> {
        Arc::new(Self {
            feature,
            guild: guild.into(),
            api,
            notifier,
            dirty,
            session: Mutex::new(EditorSession::new(feature)),
        })
    }

    /// Fetch the stored settings and install them. A failed fetch reports a
    /// notice and leaves the defaults in place so the page still renders.
    pub async fn load(&self) {
        let settings = match self.api.get_settings(&self.guild, self.feature).await {
            Ok(settings) => settings,
            Err(e) => {
                self.notifier
                    .error(format!("Failed to load {} settings: {}", self.feature, e));
                FeatureSettings::default_for(self.feature)
            }
        };

        let mut session = self.session.lock().await;
        session.install(settings);
        self.dirty.set(session.dirty());
    }

    /// Apply a local edit and recompute the dirty flag.
    pub async fn edit(&self, settings: FeatureSettings) {
        if settings.key() != self.feature {
            warn!(
                target: "editor",
                expected = %self.feature,
                got = %settings.key(),
                "Ignoring edit for a different feature"
            );
            return;
        }
        let mut session = self.session.lock().await;
        let dirty = session.edit(settings);
        self.dirty.set(dirty);
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    pub async fn current(&self) -> FeatureSettings {
        self.session.lock().await.current().clone()
    }

    pub async fn is_dirty(&self) -> bool {
        self.session.lock().await.dirty()
    }
}

#[async_trait]
impl SettingsEditor for FeatureEditor {
    fn feature(&self) -> FeatureKey {
        self.feature
    }

    async fn unsaved(&self) -> Option<FeatureSettings> {
        let mut session = self.session.lock().await;
        if session.dirty() {
            session.begin_save();
            Some(session.current().clone())
        } else {
            None
        }
    }

    async fn revert(&self) -> bool {
        let mut session = self.session.lock().await;
        let reverted = session.revert();
        if reverted {
            self.dirty.set(session.dirty());
        }
        reverted
    }

    async fn commit_saved(&self) {
        let mut session = self.session.lock().await;
        // Only promote a snapshot this editor actually handed over; an edit
        // made while the save was in flight stays unsaved.
        if session.state() == SessionState::Saving {
            session.commit();
            self.dirty.set(session.dirty());
        }
    }

    async fn save_failed(&self) {
        self.session.lock().await.fail_save();
    }

    async fn reload(&self) {
        self.session.lock().await.reset();
        self.load().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TempVoiceSettings;

    fn with_category(category: &str) -> FeatureSettings {
        FeatureSettings::TempVoice(TempVoiceSettings {
            category_id: Some(category.into()),
            ..TempVoiceSettings::default()
        })
    }

    #[test]
    fn test_dirty_iff_structurally_unequal() {
        let mut session = EditorSession::new(FeatureKey::TempVoice);
        session.install(with_category("a"));
        assert!(!session.dirty());

        session.edit(with_category("b"));
        assert!(session.dirty());

        // Editing back to the snapshot value makes the session clean again.
        session.edit(with_category("a"));
        assert!(!session.dirty());
    }

    #[test]
    fn test_revert_restores_pre_edit_value() {
        let mut session = EditorSession::new(FeatureKey::TempVoice);
        session.install(with_category("original"));

        session.edit(with_category("123"));
        assert!(session.dirty());

        assert!(session.revert());
        assert_eq!(session.current(), &with_category("original"));
        assert!(!session.dirty());

        // A second revert has nothing to do.
        assert!(!session.revert());
    }

    #[test]
    fn test_save_cycle_returns_to_clean() {
        let mut session = EditorSession::new(FeatureKey::TempVoice);
        session.install(with_category("a"));
        session.edit(with_category("b"));

        session.begin_save();
        assert_eq!(session.state(), SessionState::Saving);

        session.commit();
        assert_eq!(session.state(), SessionState::Ready);
        assert!(!session.dirty());
        assert_eq!(session.original(), &with_category("b"));
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let mut session = EditorSession::new(FeatureKey::TempVoice);
        session.install(with_category("a"));
        session.edit(with_category("b"));

        session.begin_save();
        session.fail_save();

        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.dirty());
        assert_eq!(session.current(), &with_category("b"));
    }

    #[test]
    fn test_begin_save_requires_dirty() {
        let mut session = EditorSession::new(FeatureKey::TempVoice);
        session.install(with_category("a"));

        session.begin_save();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_reset_reenters_loading() {
        let mut session = EditorSession::new(FeatureKey::TempVoice);
        session.install(with_category("a"));
        session.edit(with_category("b"));

        session.reset();
        assert_eq!(session.state(), SessionState::Loading);
    }
}
