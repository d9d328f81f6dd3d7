//! Configuration structures for rollcall.

use serde::{Deserialize, Serialize};

/// Deployment environment the engine runs in. Outside production the
/// publisher skips its review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    Staging,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
        }
    }

    /// Whether publication should skip the review step.
    pub fn skip_review(&self) -> bool {
        *self != Self::Production
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Staging
    }
}

/// Main configuration structure for rollcall.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Deployment environment (production or staging)
    #[serde(default)]
    pub environment: Environment,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scoring window configuration
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Publication configuration
    #[serde(default)]
    pub publish: PublishConfig,

    /// Per-service scoring configurations
    #[serde(default)]
    pub services: Vec<ServiceConfig>,

    /// Deployment platform instance configurations
    #[serde(default)]
    pub instances: Vec<PlatformInstanceConfig>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".rollcall/rollcall.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Scoring window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringConfig {
    /// Days to wait after a rollout ends before it is eligible for scoring
    #[serde(default = "default_buffer_days")]
    pub buffer_days: i64,
}

const fn default_buffer_days() -> i64 {
    2
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            buffer_days: default_buffer_days(),
        }
    }
}

impl ScoringConfig {
    /// Buffer that must elapse after a rollout's end before scoring.
    pub fn buffer(&self) -> chrono::Duration {
        chrono::Duration::days(self.buffer_days)
    }

    /// Age of a start time beyond which an open rollout is considered stuck.
    pub fn stuck_threshold(&self) -> chrono::Duration {
        chrono::Duration::days(self.buffer_days + 1)
    }
}

/// Publication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PublishConfig {
    /// Endpoint the rendered scorecard summary is submitted to for review
    #[serde(default)]
    pub review_url: Option<String>,

    /// Vault holding the publish token
    #[serde(default)]
    pub token_vault: String,

    /// Secret name of the publish token
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
}

fn default_token_secret() -> String {
    "publish-token".to_string()
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            review_url: None,
            token_vault: String::new(),
            token_secret: default_token_secret(),
        }
    }
}

/// Scoring weight configuration for one service.
///
/// Points charged per unit of each telemetry category; higher totals mean a
/// rougher rollout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WeightConfig {
    /// Points per hour of rollout duration
    #[serde(default = "default_rollout_time_weight")]
    pub rollout_time: f64,

    /// Points per hotfix shipped during the rollout
    #[serde(default = "default_hotfix_weight")]
    pub hotfix: f64,

    /// Points per rollback
    #[serde(default = "default_rollback_weight")]
    pub rollback: f64,

    /// Points per hour of downtime
    #[serde(default = "default_downtime_weight")]
    pub downtime: f64,

    /// Points charged when the rollout failed to deploy
    #[serde(default = "default_failure_weight")]
    pub failure: f64,
}

const fn default_rollout_time_weight() -> f64 {
    1.0
}

const fn default_hotfix_weight() -> f64 {
    5.0
}

const fn default_rollback_weight() -> f64 {
    10.0
}

const fn default_downtime_weight() -> f64 {
    10.0
}

const fn default_failure_weight() -> f64 {
    50.0
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            rollout_time: default_rollout_time_weight(),
            hotfix: default_hotfix_weight(),
            rollback: default_rollback_weight(),
            downtime: default_downtime_weight(),
            failure: default_failure_weight(),
        }
    }
}

/// Static scoring configuration for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceConfig {
    /// Service identifier (repository name)
    pub service: String,

    /// Name of the platform instance the service deploys through
    pub instance: String,

    /// Scoring weights
    #[serde(default)]
    pub weights: WeightConfig,
}

/// Static configuration for one deployment platform instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlatformInstanceConfig {
    /// Instance name referenced by service configs
    pub name: String,

    /// Base URL of the platform API
    pub base_url: String,

    /// Vault holding the instance's access token
    pub vault_uri: String,

    /// Secret name of the access token
    pub pat_secret_name: String,
}
