//! Dependency-injected lookup tables for service and instance configs.

use std::collections::HashMap;

use crate::domain::models::config::{Config, PlatformInstanceConfig, ServiceConfig};
use crate::domain::ports::config_provider::ConfigProvider;

/// In-memory lookup tables built once from the loaded configuration and
/// passed into the scoring driver.
pub struct ConfigCatalog {
    services: HashMap<String, ServiceConfig>,
    instances: HashMap<String, PlatformInstanceConfig>,
}

impl ConfigCatalog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            services: config
                .services
                .iter()
                .map(|s| (s.service.clone(), s.clone()))
                .collect(),
            instances: config
                .instances
                .iter()
                .map(|i| (i.name.clone(), i.clone()))
                .collect(),
        }
    }
}

impl ConfigProvider for ConfigCatalog {
    fn service_config(&self, service: &str) -> Option<ServiceConfig> {
        self.services.get(service).cloned()
    }

    fn instance_config(&self, name: &str) -> Option<PlatformInstanceConfig> {
        self.instances.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::WeightConfig;

    #[test]
    fn test_lookups_resolve_and_miss() {
        let mut config = Config::default();
        config.instances.push(PlatformInstanceConfig {
            name: "dnceng".to_string(),
            base_url: "https://platform.example.test".to_string(),
            vault_uri: "https://vault.example.test".to_string(),
            pat_secret_name: "platform-pat".to_string(),
        });
        config.services.push(ServiceConfig {
            service: "arcade".to_string(),
            instance: "dnceng".to_string(),
            weights: WeightConfig::default(),
        });

        let catalog = ConfigCatalog::from_config(&config);
        assert!(catalog.service_config("arcade").is_some());
        assert!(catalog.service_config("unknown").is_none());
        assert!(catalog.instance_config("dnceng").is_some());
        assert!(catalog.instance_config("other").is_none());
    }
}
