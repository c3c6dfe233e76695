// Guilddeck Core Library
// Settings engine and backend API client for the bot dashboard

pub mod api;
pub mod bus;
pub mod config;
pub mod editor;
pub mod model;
pub mod notify;
pub mod store;

// Export core types
pub use api::{ApiClient, ControlClient};
pub use bus::{EditorGuard, EditorRegistry};
pub use config::Config;
pub use editor::{EditorSession, FeatureEditor, SessionState, SettingsEditor};
pub use model::{FeatureKey, FeatureSettings, LayoutDescriptor, SidebarDescriptor};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use store::SettingsStore;

use std::sync::Arc;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("invalid settings payload: {0}")]
    InvalidSettings(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
pub type Result<T> = std::result::Result<T, DeckError>;

/// Dashboard runtime: backend clients, notification fan-out, settings store.
pub struct Dashboard {
    pub api: Arc<ApiClient>,
    pub control: Arc<ControlClient>,
    pub notifier: Notifier,
    pub store: Arc<SettingsStore>,
}

impl Dashboard {
    pub fn new(config: &Config) -> Result<Self> {
        let api = Arc::new(ApiClient::new(config)?);
        let control = Arc::new(ControlClient::new(config)?);
        let notifier = Notifier::default();
        let store = Arc::new(SettingsStore::new(api.clone(), notifier.clone()));

        Ok(Self {
            api,
            control,
            notifier,
            store,
        })
    }
}
