use crate::application::polling_controller::PollTiming;
use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "config/server";
const ENV_PREFIX: &str = "POWER_CONSOLE";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub enabled: bool,
    pub source_url: String,
    pub poll_interval_ms: u64,
    pub uptime_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub random_seed: Option<u64>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            source_url: "http://127.0.0.1:8080/api/data".to_string(),
            poll_interval_ms: 2000,
            uptime_interval_ms: 1000,
            request_timeout_ms: 1500,
            random_seed: None,
        }
    }
}

impl DashboardSettings {
    pub fn timing(&self) -> PollTiming {
        PollTiming {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            uptime_interval: Duration::from_millis(self.uptime_interval_ms.max(1)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Load `config/server.*` if present, then apply `POWER_CONSOLE_*` overrides,
/// e.g. `POWER_CONSOLE_DASHBOARD__POLL_INTERVAL_MS=500`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
