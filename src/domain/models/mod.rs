//! Domain models.

pub mod config;
pub mod deployment;
pub mod scorecard;

pub use config::{
    Config, DatabaseConfig, Environment, LoggingConfig, PlatformInstanceConfig, PublishConfig,
    ScoringConfig, ServiceConfig, WeightConfig,
};
pub use deployment::{Closure, DeploymentRecord};
pub use scorecard::{Scorecard, ScorecardRecord};
