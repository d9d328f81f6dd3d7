//! Port for secret retrieval.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;

/// Retrieves secrets (access tokens) from a vault.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch the named secret from the given vault.
    async fn get_secret(&self, vault_uri: &str, secret_name: &str) -> EngineResult<String>;
}
