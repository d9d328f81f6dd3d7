//! Infrastructure layer: configuration and credentials.

pub mod config;
pub mod credentials;
