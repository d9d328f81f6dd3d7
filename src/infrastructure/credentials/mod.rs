//! Credential retrieval.
//!
//! The scheduled runner receives its secrets through the environment; this
//! provider maps a (vault, secret name) pair onto a `ROLLCALL_SECRET_*`
//! variable. A vault-backed provider can replace it behind the same port.

use async_trait::async_trait;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::ports::credential_provider::CredentialProvider;

const ENV_PREFIX: &str = "ROLLCALL_SECRET_";

/// Environment-variable name for a secret, e.g. `platform-pat` becomes
/// `ROLLCALL_SECRET_PLATFORM_PAT`.
pub fn secret_env_var(secret_name: &str) -> String {
    let suffix: String = secret_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", ENV_PREFIX, suffix)
}

pub struct EnvCredentialProvider;

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_secret(&self, _vault_uri: &str, secret_name: &str) -> EngineResult<String> {
        let var = secret_env_var(secret_name);
        std::env::var(&var).map_err(|_| EngineError::Credential {
            name: secret_name.to_string(),
            detail: format!("environment variable {} is not set", var),
        })
    }
}
