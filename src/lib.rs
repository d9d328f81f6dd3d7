//! Rollcall - Rollout Audit Engine
//!
//! Rollcall periodically evaluates a history of service deployment records,
//! scores rollouts that have stabilized, and publishes the resulting
//! scorecards for engineering review.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors, and ports
//! - **Service Layer** (`services`): The scoring-eligibility and
//!   orchestration engine
//! - **Adapters** (`adapters`): SQLite record store and deployment-platform
//!   integrations
//! - **Infrastructure Layer** (`infrastructure`): Configuration and
//!   credentials
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{EngineError, EngineResult};
pub use domain::models::{
    Closure, Config, DeploymentRecord, Environment, PlatformInstanceConfig, Scorecard,
    ScorecardRecord, ServiceConfig, WeightConfig,
};
pub use domain::ports::{
    ConfigProvider, CredentialProvider, DeploymentRepository, Publisher, ScorecardRepository,
    ScoreRequest, Scorer,
};
pub use infrastructure::config::{ConfigCatalog, ConfigError, ConfigLoader};
pub use services::{CycleDecision, CycleReport, Decision, GroupOutcome, ScoringCycle};
