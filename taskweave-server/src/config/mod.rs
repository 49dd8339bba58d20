//! Configuration loading for taskweave-server.
//!
//! The TOML file, CLI overrides, and the API token from the environment are
//! resolved once at boot. Anything wrong here is startup-fatal: the process
//! must not accept traffic with a broken configuration.

pub mod file;

use crate::config::file::FileConfig;
use std::net::SocketAddr;
use std::path::Path;
use taskweave_core::config::{
    AutomationConfig, ChannelConfig, FieldIds, ShoppingConfig, TypeIds,
};
use thiserror::Error;
use url::Url;

/// Environment variable carrying the task-service API token.
pub const API_TOKEN_ENV: &str = "TASKWEAVE_API_TOKEN";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("{API_TOKEN_ENV} environment variable not set")]
    MissingApiToken,
}

/// Fully loaded and validated configuration.
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub webhook_route: String,
    pub base_url: Url,
    pub automation: AutomationConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read the TOML file, apply CLI overrides, validate, and build the
    /// immutable runtime configuration.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        self.validate(&file_config)?;

        Ok(build_loaded_config(file_config))
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.channels.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one webhook channel must be configured".to_owned(),
            ));
        }
        let with_secret = config.channels.iter().filter(|c| c.secret.is_some()).count();
        if with_secret != 0 && with_secret != config.channels.len() {
            return Err(ConfigError::ValidationError(
                "channel secrets must be set for all channels or for none".to_owned(),
            ));
        }
        if !config.server.webhook_route.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "webhook_route must start with '/': {}",
                config.server.webhook_route
            )));
        }
        Ok(())
    }
}

/// Read the task-service API token from the environment.
pub fn get_api_token() -> Result<String, ConfigError> {
    std::env::var(API_TOKEN_ENV).map_err(|_| ConfigError::MissingApiToken)
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let automation = AutomationConfig {
        channels: file_config
            .channels
            .into_iter()
            .map(|c| ChannelConfig {
                id: c.id,
                secret: c.secret,
            })
            .collect(),
        types: TypeIds {
            event: file_config.types.event,
            log: file_config.types.log,
            meeting: file_config.types.meeting,
        },
        fields: FieldIds {
            start_time: file_config.fields.start_time,
            end_time: file_config.fields.end_time,
            relevance_date: file_config.fields.relevance_date,
            relevance_num: file_config.fields.relevance_num,
            relevance_unit: file_config.fields.relevance_unit,
            pre_meeting_tasks: file_config.fields.pre_meeting_tasks,
            logged_at: file_config.fields.logged_at,
        },
        shopping: ShoppingConfig {
            list_id: file_config.shopping.list_id,
            purchase_tag: file_config.shopping.purchase_tag,
        },
    };

    LoadedConfig {
        listen: file_config.server.listen,
        webhook_route: file_config.server.webhook_route,
        base_url: file_config.gateway.base_url,
        automation,
    }
}
