//! Configuration loading and lookup.

pub mod catalog;
pub mod loader;

pub use catalog::ConfigCatalog;
pub use loader::{ConfigError, ConfigLoader};
