use std::sync::Arc;

use crate::{Config, Credential};
use async_trait::async_trait;
use tossign_core::{Context, ProvideCredential, Result};

/// ConfigCredentialProvider loads credentials from a [`Config`].
///
/// Fields left unset in the config are filled from the environment first.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new ConfigCredentialProvider
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.as_ref().clone().from_env(ctx);

        if let (Some(ak), Some(sk)) = (&config.access_key_id, &config.secret_access_key) {
            let cred = Credential::new(ak.clone(), sk.clone(), config.security_token.clone());
            return Ok(Some(cred));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use std::collections::HashMap;
    use tossign_core::StaticEnv;

    #[tokio::test]
    async fn test_config_credential_provider() -> anyhow::Result<()> {
        let config = Config::new()
            .with_access_key_id("config_access_key")
            .with_secret_access_key("config_secret_key");
        let provider = ConfigCredentialProvider::new(Arc::new(config));

        let cred = provider
            .provide_credential(&Context::new())
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "config_access_key");
        assert_eq!(cred.secret_access_key, "config_secret_key");
        Ok(())
    }

    #[tokio::test]
    async fn test_config_credential_provider_with_env() -> anyhow::Result<()> {
        let ctx = Context::new().with_env(StaticEnv {
            envs: HashMap::from_iter([
                (TOS_ACCESS_KEY.to_string(), "env_access_key".to_string()),
                (TOS_SECRET_KEY.to_string(), "env_secret_key".to_string()),
                (TOS_SECURITY_TOKEN.to_string(), "env_security_token".to_string()),
            ]),
        });
        let config = Config::new().with_access_key_id("config_access_key");
        let provider = ConfigCredentialProvider::new(Arc::new(config));

        let cred = provider
            .provide_credential(&ctx)
            .await?
            .expect("credential must be loaded");
        assert_eq!(cred.access_key_id, "config_access_key");
        assert_eq!(cred.secret_access_key, "env_secret_key");
        assert_eq!(cred.security_token.as_deref(), Some("env_security_token"));
        Ok(())
    }

    #[tokio::test]
    async fn test_config_credential_provider_incomplete() -> anyhow::Result<()> {
        let config = Config::new().with_access_key_id("config_access_key");
        let provider = ConfigCredentialProvider::new(Arc::new(config));

        assert!(provider.provide_credential(&Context::new()).await?.is_none());
        Ok(())
    }
}
