use std::env;
use std::fs;
use std::path::Path;

/// Runtime configuration for the dashboard service.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bind address for the dashboard HTTP server
    pub host: String,
    pub port: u16,
    /// Base URL of the bot backend REST API (the `/api/v1` service)
    pub api_base_url: String,
    /// Internal bot control service, reachable on the local network only
    pub control_host: String,
    pub control_port: u16,
    /// Timeout applied to every outbound request, in milliseconds
    pub request_timeout_ms: u64,
    pub user_agent: String,
    /// Hosts allowed to reach the admin route group
    pub admin_allowed_hosts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: env::var("GUILDDECK_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("GUILDDECK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3040),
            api_base_url: env::var("GUILDDECK_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://127.0.0.1:8020/api/v1".to_string()),
            control_host: env::var("GUILDDECK_CONTROL_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            control_port: env::var("GUILDDECK_CONTROL_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7600),
            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10_000),
            user_agent: "guilddeck/0.1".to_string(),
            admin_allowed_hosts: env::var("GUILDDECK_ADMIN_HOSTS")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.split(',').map(|h| h.trim().to_lowercase()).collect())
                .unwrap_or_else(|| vec!["localhost".to_string(), "127.0.0.1".to_string()]),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file (path via GUILDDECK_CONFIG or ./guilddeck.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = env::var("GUILDDECK_CONFIG").unwrap_or_else(|_| "guilddeck.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target: "config", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<ConfigToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target: "config", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target: "config", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }

    /// Address string for the internal control service.
    pub fn control_base_url(&self) -> String {
        format!("http://{}:{}", self.control_host, self.control_port)
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ConfigToml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_base_url: Option<String>,
    pub control_host: Option<String>,
    pub control_port: Option<u16>,
    pub request_timeout_ms: Option<u64>,
    pub admin_allowed_hosts: Option<Vec<String>>,
}

impl ConfigToml {
    fn overlay(self, mut base: Config) -> Config {
        if let Some(v) = self.host {
            base.host = v;
        }
        if let Some(v) = self.port {
            base.port = v;
        }
        if let Some(v) = self.api_base_url {
            base.api_base_url = v;
        }
        if let Some(v) = self.control_host {
            base.control_host = v;
        }
        if let Some(v) = self.control_port {
            base.control_port = v;
        }
        if let Some(v) = self.request_timeout_ms {
            base.request_timeout_ms = v;
        }
        if let Some(v) = self.admin_allowed_hosts {
            base.admin_allowed_hosts = v.into_iter().map(|h| h.to_lowercase()).collect();
        }
        base
    }
}
