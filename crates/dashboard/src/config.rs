//! Dashboard configuration

use agro_lib::DATA_FILE;
use anyhow::Result;
use serde::Deserialize;

/// Dashboard configuration
///
/// Every field is optional; the defaults reproduce the fixed behaviour
/// (read `dados_agricolas.csv` from the working directory, listen on
/// 127.0.0.1:8501).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Path of the CSV dataset
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Name attached to every structured log record
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
}

fn default_data_path() -> String {
    DATA_FILE.to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_instance_name() -> String {
    "agro-dashboard".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            bind_address: default_bind_address(),
            port: default_port(),
            instance_name: default_instance_name(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `AGRO_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_env(config::Environment::with_prefix("AGRO"))
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Socket address for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
