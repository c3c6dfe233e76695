// Feature settings
//
// Settings travel to the backend as one JSON document per (guild, feature)
// pair. Each feature key has its own schema; payloads are validated against
// it before anything is forwarded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{DeckError, Result};

/// Known settings namespaces. The string form is the wire path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKey {
    TempVoice,
    Badges,
    Welcome,
    Layout,
}

impl FeatureKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::TempVoice => "temp-voice",
            FeatureKey::Badges => "badges",
            FeatureKey::Welcome => "welcome",
            FeatureKey::Layout => "layout",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "temp-voice" => Ok(FeatureKey::TempVoice),
            "badges" => Ok(FeatureKey::Badges),
            "welcome" => Ok(FeatureKey::Welcome),
            "layout" => Ok(FeatureKey::Layout),
            other => Err(DeckError::InvalidSettings(format!(
                "unknown feature key: {}",
                other
            ))),
        }
    }
}

/// Temporary voice channel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TempVoiceSettings {
    /// Category the bot creates temporary channels under
    #[serde(rename = "categoryID", default)]
    pub category_id: Option<String>,
    #[serde(rename = "nameTemplate", default = "default_name_template")]
    pub name_template: String,
    #[serde(rename = "userLimit", default)]
    pub user_limit: u16,
}

fn default_name_template() -> String {
    "{user}'s channel".to_string()
}

impl Default for TempVoiceSettings {
    fn default() -> Self {
        Self {
            category_id: None,
            name_template: default_name_template(),
            user_limit: 0,
        }
    }
}

/// Badge announcement configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BadgeFeedSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "channelID", default)]
    pub channel_id: Option<String>,
}

/// Welcome message configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WelcomeSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "channelID", default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Per-guild dashboard layout preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    #[serde(rename = "compactSidebar", default)]
    pub compact_sidebar: bool,
    #[serde(rename = "accentColor", default)]
    pub accent_color: Option<String>,
}

/// A validated settings document, tagged by feature key.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureSettings {
    TempVoice(TempVoiceSettings),
    Badges(BadgeFeedSettings),
    Welcome(WelcomeSettings),
    Layout(LayoutSettings),
}

impl FeatureSettings {
    pub fn key(&self) -> FeatureKey {
        match self {
            FeatureSettings::TempVoice(_) => FeatureKey::TempVoice,
            FeatureSettings::Badges(_) => FeatureKey::Badges,
            FeatureSettings::Welcome(_) => FeatureKey::Welcome,
            FeatureSettings::Layout(_) => FeatureKey::Layout,
        }
    }

    /// Parse an opaque JSON blob against the schema for `key`.
    pub fn validate(key: FeatureKey, value: serde_json::Value) -> Result<Self> {
        let parsed = match key {
            FeatureKey::TempVoice => {
                serde_json::from_value::<TempVoiceSettings>(value).map(FeatureSettings::TempVoice)
            }
            FeatureKey::Badges => {
                serde_json::from_value::<BadgeFeedSettings>(value).map(FeatureSettings::Badges)
            }
            FeatureKey::Welcome => {
                serde_json::from_value::<WelcomeSettings>(value).map(FeatureSettings::Welcome)
            }
            FeatureKey::Layout => {
                serde_json::from_value::<LayoutSettings>(value).map(FeatureSettings::Layout)
            }
        };
        parsed.map_err(|e| DeckError::InvalidSettings(format!("{}: {}", key, e)))
    }

    /// Default document for `key`, used when the backend has nothing stored.
    pub fn default_for(key: FeatureKey) -> Self {
        match key {
            FeatureKey::TempVoice => FeatureSettings::TempVoice(TempVoiceSettings::default()),
            FeatureKey::Badges => FeatureSettings::Badges(BadgeFeedSettings::default()),
            FeatureKey::Welcome => FeatureSettings::Welcome(WelcomeSettings::default()),
            FeatureKey::Layout => FeatureSettings::Layout(LayoutSettings::default()),
        }
    }

    /// Wire form: the bare per-feature document, no tag.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        let value = match self {
            FeatureSettings::TempVoice(s) => serde_json::to_value(s)?,
            FeatureSettings::Badges(s) => serde_json::to_value(s)?,
            FeatureSettings::Welcome(s) => serde_json::to_value(s)?,
            FeatureSettings::Layout(s) => serde_json::to_value(s)?,
        };
        Ok(value)
    }
}
