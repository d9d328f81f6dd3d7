//! Ports (interfaces) to external collaborators.

pub mod config_provider;
pub mod credential_provider;
pub mod deployment_repository;
pub mod publisher;
pub mod scorecard_repository;
pub mod scorer;

pub use config_provider::ConfigProvider;
pub use credential_provider::CredentialProvider;
pub use deployment_repository::DeploymentRepository;
pub use publisher::Publisher;
pub use scorecard_repository::ScorecardRepository;
pub use scorer::{ScoreRequest, Scorer};
