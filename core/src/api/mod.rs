// Backend REST API client
//
// The dashboard owns no data; every operation is a thin call against the
// bot backend's `/api/v1` surface. Non-2xx responses carry a JSON `detail`
// message which is surfaced verbatim. No retries; one timeout from config.

mod control;

pub use control::ControlClient;

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{Badge, FeatureKey, FeatureSettings, GuildChannel, GuildRole, NewBadge};
use crate::model::{LayoutDescriptor, SidebarDescriptor};
use crate::{DeckError, Result};

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http: build_client(config)?,
        })
    }

    // ---- guild settings ----

    /// Fetch the settings document for one feature. A 404 means nothing is
    /// stored yet and yields the feature's defaults.
    pub async fn get_settings(&self, guild: &str, key: FeatureKey) -> Result<FeatureSettings> {
        let url = format!("{}/guilds/{}/settings/{}", self.base_url, guild, key);
        debug!(target: "api", url = %url, "Fetching settings");

        let response = send(self.http.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(FeatureSettings::default_for(key));
        }
        let value: serde_json::Value = read_json(response).await?;
        FeatureSettings::validate(key, value)
    }

    pub async fn put_settings(&self, guild: &str, settings: &FeatureSettings) -> Result<()> {
        let url = format!(
            "{}/guilds/{}/settings/{}",
            self.base_url,
            guild,
            settings.key()
        );
        let body = settings.to_value()?;
        let response = send(self.http.put(&url).json(&body)).await?;
        expect_success(response).await
    }

    /// Persist a merged multi-feature payload in one request, as produced by
    /// a dashboard save.
    pub async fn save_settings(
        &self,
        guild: &str,
        payload: &HashMap<FeatureKey, FeatureSettings>,
    ) -> Result<()> {
        let url = format!("{}/guilds/{}/settings", self.base_url, guild);

        let mut body = serde_json::Map::new();
        for (key, settings) in payload {
            body.insert(key.as_str().to_string(), settings.to_value()?);
        }

        let response = send(self.http.post(&url).json(&serde_json::Value::Object(body))).await?;
        expect_success(response).await
    }

    /// Delete the stored settings for one feature. Deleting settings that
    /// were never stored is not an error.
    pub async fn delete_settings(&self, guild: &str, key: FeatureKey) -> Result<()> {
        let url = format!("{}/guilds/{}/settings/{}", self.base_url, guild, key);
        let response = send(self.http.delete(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        expect_success(response).await
    }

    // ---- guild entities ----

    pub async fn guild_channels(&self, guild: &str) -> Result<Vec<GuildChannel>> {
        let url = format!("{}/guilds/{}/channels", self.base_url, guild);
        self.get_list(&url).await
    }

    pub async fn guild_roles(&self, guild: &str) -> Result<Vec<GuildRole>> {
        let url = format!("{}/guilds/{}/roles", self.base_url, guild);
        self.get_list(&url).await
    }

    // ---- badges ----

    pub async fn list_badges(&self, guild: &str) -> Result<Vec<Badge>> {
        let url = format!("{}/guilds/{}/badges", self.base_url, guild);
        self.get_list(&url).await
    }

    pub async fn create_badge(&self, guild: &str, badge: &NewBadge) -> Result<Badge> {
        let url = format!("{}/guilds/{}/badges", self.base_url, guild);
        let response = send(self.http.post(&url).json(badge)).await?;
        read_json(response).await
    }

    pub async fn update_badge(&self, guild: &str, badge: &Badge) -> Result<()> {
        let url = format!("{}/guilds/{}/badges/{}", self.base_url, guild, badge.id);
        let response = send(self.http.put(&url).json(badge)).await?;
        expect_success(response).await
    }

    pub async fn delete_badge(&self, guild: &str, badge_id: &str) -> Result<()> {
        let url = format!("{}/guilds/{}/badges/{}", self.base_url, guild, badge_id);
        let response = send(self.http.delete(&url)).await?;
        expect_success(response).await
    }

    // ---- layout ----

    pub async fn sidebar(&self) -> Result<SidebarDescriptor> {
        let url = format!("{}/layout/settings/sidebar", self.base_url);
        let response = send(self.http.get(&url)).await?;
        read_json(response).await
    }

    pub async fn server_sidebar(&self) -> Result<SidebarDescriptor> {
        let url = format!("{}/layout/settings/server/sidebar", self.base_url);
        let response = send(self.http.get(&url)).await?;
        read_json(response).await
    }

    pub async fn page_layout(&self, page: &str) -> Result<LayoutDescriptor> {
        let url = format!("{}/layout/settings/server/{}", self.base_url, page);
        let response = send(self.http.get(&url)).await?;
        read_json(response).await
    }

    /// Entity lists degrade to empty on a malformed body instead of failing
    /// the whole page.
    async fn get_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = send(self.http.get(url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from(status, response).await);
        }
        match response.json::<Vec<T>>().await {
            Ok(list) => Ok(list),
            Err(e) => {
                warn!(target: "api", url = %url, error = %e, "Malformed list payload; defaulting to empty");
                Ok(Vec::new())
            }
        }
    }
}

// ---- shared plumbing ----

pub(crate) fn build_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| DeckError::Transport(format!("failed to build HTTP client: {}", e)))
}

pub(crate) async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
    request.send().await.map_err(|e| {
        warn!(target: "api", error = %e, "Request failed");
        DeckError::Transport(format!("request failed: {}", e))
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from(status, response).await);
    }
    response
        .json()
        .await
        .map_err(|e| DeckError::Transport(format!("failed to parse response: {}", e)))
}

pub(crate) async fn expect_success(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(error_from(status, response).await)
    }
}

async fn error_from(status: StatusCode, response: reqwest::Response) -> DeckError {
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(|d| d.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);
    warn!(target: "api", status = %status, detail = %detail, "Backend returned error");
    DeckError::Api {
        status: status.as_u16(),
        detail,
    }
}
