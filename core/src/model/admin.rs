// Operator panel payloads, proxied from the internal control service

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailedStats {
    #[serde(default)]
    pub guild_count: u64,
    #[serde(default)]
    pub member_count: u64,
    #[serde(default)]
    pub shard_count: u32,
    #[serde(default)]
    pub uptime_secs: u64,
    #[serde(default)]
    pub commands_run: u64,
    #[serde(default)]
    pub memory_mb: f64,
}
