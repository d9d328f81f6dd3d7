//! Port for static scoring configuration lookup.

use crate::domain::models::config::{PlatformInstanceConfig, ServiceConfig};

/// Resolves service and platform instance configurations.
///
/// Resolution failure surfaces as `None`; the scoring driver treats a missing
/// entry for a required lookup as fatal to the cycle.
pub trait ConfigProvider: Send + Sync {
    /// Look up the scoring configuration for a service.
    fn service_config(&self, service: &str) -> Option<ServiceConfig>;

    /// Look up a platform instance configuration by name.
    fn instance_config(&self, name: &str) -> Option<PlatformInstanceConfig>;
}
