use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub database: DatabaseConfig,
    pub otlp_endpoint: Option<String>,
}

/// Store connection settings. Either may be absent; the service then runs
/// against the unavailable store and reports it from `/test`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: Option<String>,
}

impl DatabaseConfig {
    pub fn url_is_set(&self) -> bool {
        self.url.is_some()
    }

    pub fn name_is_set(&self) -> bool {
        self.name.is_some()
    }
}

impl SiteConfig {
    pub fn load() -> Result<Self, AppError> {
        // Loads .env and APP__* overrides
        let mut common = core_config::Config::load()?;

        if let Some(port) = non_empty_env("PORT") {
            common.port = port.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid PORT '{}': {}", port, e))
            })?;
        }

        Ok(SiteConfig {
            common,
            database: DatabaseConfig {
                url: non_empty_env("DATABASE_URL"),
                name: non_empty_env("DATABASE_NAME"),
            },
            otlp_endpoint: non_empty_env("OTLP_ENDPOINT"),
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
