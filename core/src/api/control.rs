// Internal control service proxy client
//
// The bot process exposes a small control endpoint on a fixed local
// host/port for the operator panel. It is reachable only from the machine
// the dashboard runs on; the host gate on the admin routes enforces that.

use tracing::debug;

use super::{build_client, read_json, send};
use crate::config::Config;
use crate::model::{CommandInfo, DetailedStats};
use crate::Result;

pub struct ControlClient {
    base_url: String,
    http: reqwest::Client,
}

impl ControlClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.control_base_url(),
            http: build_client(config)?,
        })
    }

    pub async fn all_commands(&self) -> Result<Vec<CommandInfo>> {
        let url = format!("{}/getAllCommands", self.base_url);
        debug!(target: "control", url = %url, "Fetching command list");
        let response = send(self.http.get(&url)).await?;
        read_json(response).await
    }

    pub async fn detailed_stats(&self) -> Result<DetailedStats> {
        let url = format!("{}/getDetailedStats", self.base_url);
        debug!(target: "control", url = %url, "Fetching detailed stats");
        let response = send(self.http.get(&url)).await?;
        read_json(response).await
    }
}
