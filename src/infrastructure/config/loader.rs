use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid buffer_days: {0}. Must be at least 1")]
    InvalidBufferDays(i64),

    #[error("Duplicate service config for '{0}'")]
    DuplicateServiceConfig(String),

    #[error("Duplicate instance config for '{0}'")]
    DuplicateInstanceConfig(String),

    #[error("Service '{service}' references unknown instance '{instance}'")]
    UnknownInstance { service: String, instance: String },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. rollcall.yaml (project config)
    /// 3. Environment variables (ROLLCALL_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("rollcall.yaml"))
            .merge(Env::prefixed("ROLLCALL_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("ROLLCALL_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.scoring.buffer_days < 1 {
            return Err(ConfigError::InvalidBufferDays(config.scoring.buffer_days));
        }

        let mut seen_services = std::collections::HashSet::new();
        for service in &config.services {
            if !seen_services.insert(service.service.as_str()) {
                return Err(ConfigError::DuplicateServiceConfig(service.service.clone()));
            }
        }
        let mut seen_instances = std::collections::HashSet::new();
        for instance in &config.instances {
            if !seen_instances.insert(instance.name.as_str()) {
                return Err(ConfigError::DuplicateInstanceConfig(instance.name.clone()));
            }
        }
        for service in &config.services {
            if !seen_instances.contains(service.instance.as_str()) {
                return Err(ConfigError::UnknownInstance {
                    service: service.service.clone(),
                    instance: service.instance.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{PlatformInstanceConfig, ServiceConfig, WeightConfig};

    fn instance(name: &str) -> PlatformInstanceConfig {
        PlatformInstanceConfig {
            name: name.to_string(),
            base_url: "https://platform.example.test".to_string(),
            vault_uri: "https://vault.example.test".to_string(),
            pat_secret_name: "platform-pat".to_string(),
        }
    }

    fn service(name: &str, instance: &str) -> ServiceConfig {
        ServiceConfig {
            service: name.to_string(),
            instance: instance.to_string(),
            weights: WeightConfig::default(),
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(ConfigLoader::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_zero_buffer() {
        let mut config = Config::default();
        config.scoring.buffer_days = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBufferDays(0))
        ));
    }

    #[test]
    fn test_rejects_service_with_unknown_instance() {
        let mut config = Config::default();
        config.services.push(service("arcade", "dnceng"));
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::UnknownInstance { .. })
        ));

        config.instances.push(instance("dnceng"));
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_service_entries() {
        let mut config = Config::default();
        config.instances.push(instance("dnceng"));
        config.services.push(service("arcade", "dnceng"));
        config.services.push(service("arcade", "dnceng"));
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::DuplicateServiceConfig(_))
        ));
    }
}
