use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use config::{Environment, File, FileFormat};

use crate::error::Result;

/// Settings file read when `MONITOR_CONFIG` is not set. The extension is
/// optional, `config` probes the supported formats.
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings";

/// Interval between sweeps when the settings leave it out.
pub const DEFAULT_INTERVAL_MS: i64 = 5_000;

const ENV_PREFIX: &str = "MONITOR";
const ENV_SEPARATOR: &str = "__";

/// Hosts to probe and the pause between two full sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfiguration {
    #[serde(default, alias = "Hosts")]
    pub hosts: Vec<String>,
    #[serde(
        default = "default_interval_ms",
        alias = "Intervalo",
        alias = "intervalo"
    )]
    pub interval_ms: i64,
}

fn default_interval_ms() -> i64 {
    DEFAULT_INTERVAL_MS
}

impl Default for ServiceConfiguration {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl ServiceConfiguration {
    /// Pause between sweeps. Zero and negative values mean back-to-back sweeps.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(0) as u64)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        default,
        alias = "ServiceConfigurations",
        alias = "serviceconfigurations"
    )]
    pub service: ServiceConfiguration,
}

impl Config {
    /// Loads the settings file named by `MONITOR_CONFIG` (or `appsettings`)
    /// and layers `MONITOR__*` environment variables on top.
    pub fn load() -> Result<Self> {
        let path = env::var("MONITOR_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());

        let cfg = config::Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(environment());

        Ok(cfg.build()?.try_deserialize()?)
    }

    /// Parses settings from an in-memory document, without touching the environment.
    pub fn parse(contents: &str, format: FileFormat) -> Result<Self> {
        let cfg = config::Config::builder().add_source(File::from_str(contents, format));

        Ok(cfg.build()?.try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("service.hosts")
}
