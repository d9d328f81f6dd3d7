//! Adapters implementing the domain ports.

pub mod platform;
pub mod sqlite;
